// src/extract/markup.rs
//
// Structured strategy: the results table.
//
//   <table id="resultats">
//     <tr class="impair|pair">
//       <td>COTE - Titre. (dates)</td> <td>NB_NOTICES</td> <td><a href="/archive/fonds/FRAD013_…">…</a></td>
//     </tr>
//
// The first cell fuses identifier, title and dates; see `split_combined`.

use std::sync::LazyLock;

use regex::Regex;

use super::{Parsed, Unit};
use crate::config::consts::BASE_URL;
use crate::core::html::{self, Scan, cell_text, cells, open_tag};
use crate::core::sanitize::{clean_title, digits_or_zero, normalize_entities, normalize_ws};
use crate::model::Record;

const TABLE_ID: &str = "resultats";
const ROW_CLASS: &str = "pair"; // also matches "impair"
const DETAIL_HREF: &str = "/archive/fonds/FRAD013";

// "14 B - Tribunal de commerce de La Ciotat. (1790-1858)"
static WITH_PARENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s*-\s*(.+?)(?:\.\s*)?\(([^)]+)\)$").expect("static regex")
});
// "65 J - René Egger (architecte). 1948-1990"
static TRAILING_YEARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s*-\s*(.+?)(?:\.\s*)?(\d{4}\s*-\s*\d{4}|\d{4})$").expect("static regex")
});

pub fn parse(unit: &Unit) -> Parsed {
    let mut out = Parsed::default();
    let doc = unit.raw();

    let Some(table) = Scan::new(doc).find_block_with_attr("table", "id", TABLE_ID) else {
        return out;
    };

    for tr in Scan::new(table).blocks("tr") {
        // Only result rows; the header row has no row class
        let is_result = html::attr_value(open_tag(tr), "class")
            .is_some_and(|c| c.to_ascii_lowercase().contains(ROW_CLASS));
        if !is_result { continue; }

        let tds = cells(tr, "td");
        if tds.len() < 3 {
            out.skipped += 1;
            continue;
        }

        let info = cell_text(&tds[0]);
        let record_count = digits_or_zero(&cell_text(&tds[1]));
        let link = detail_link(&tds[2]).unwrap_or_default();

        let (identifier, title, dates) = split_combined(&info);
        if identifier.is_empty() {
            out.skipped += 1;
            continue;
        }
        out.records.push(Record::new(&identifier, &title, &dates, record_count).with_link(link));
    }
    out
}

/// Split the fused first cell into `(identifier, title, dates)`.
///
/// Tries `ID - TITLE (DATES)`, then `ID - TITLE YYYY-YYYY`; otherwise splits once
/// on `" - "` with empty dates. Without any separator the whole text is used
/// as both identifier and title.
pub fn split_combined(info: &str) -> (String, String, String) {
    let info = normalize_ws(info);

    for re in [&*WITH_PARENS, &*TRAILING_YEARS] {
        if let Some(c) = re.captures(&info) {
            return (normalize_ws(&c[1]), clean_title(&c[2]), normalize_ws(&c[3]));
        }
    }

    match info.split_once(" - ") {
        Some((id, title)) => (normalize_ws(id), clean_title(title), s!()),
        None => (info.clone(), info, s!()),
    }
}

/// Absolute URL of the fonds detail page linked from the cell, if any.
fn detail_link(cell: &str) -> Option<String> {
    for a in Scan::new(cell).blocks("a") {
        let Some(href) = html::attr_value(open_tag(a), "href") else { continue };
        let href = normalize_entities(&href);
        if !href.contains(DETAIL_HREF) { continue; }

        return Some(if href.starts_with("http") {
            href
        } else if href.starts_with('/') {
            join!(BASE_URL, &href)
        } else {
            join!(BASE_URL, "/", &href)
        });
    }
    None
}
