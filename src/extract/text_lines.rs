// src/extract/text_lines.rs
//
// Flat-text strategy: one fonds per visible line,
//   "COTE - Titre. (dates) NB_NOTICES"
// with dates and count optional. The identifier must start with digits
// ("14 B", "3 ETP", "2404 W", "6 U 2").

use std::sync::LazyLock;

use regex::Regex;

use super::{Parsed, Unit};
use crate::core::sanitize::{clean_title, normalize_ws};
use crate::model::Record;

static LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+\s*[A-Z]+(?:\s*\d+)?)\s*-\s*(.+?)(?:\.\s*)?(?:\(([^)]+)\))?\s*(\d+)?$")
        .expect("static regex")
});

/// Lines that introduce each result's link; not data, not counted as skipped.
const SECTION_HEADERS: &[&str] = &["Détail des fonds", "Detail des fonds"];

pub fn parse(unit: &Unit) -> Parsed {
    let mut out = Parsed::default();

    for line in unit.text().lines() {
        let line = line.trim();
        if line.is_empty() || is_section_header(line) {
            continue;
        }
        match parse_line(line) {
            Some(r) => out.records.push(r),
            None => out.skipped += 1,
        }
    }
    out
}

pub fn parse_line(line: &str) -> Option<Record> {
    let c = LINE.captures(line.trim())?;
    let identifier = normalize_ws(&c[1]);
    let title = clean_title(&c[2]);
    let dates = c.get(3).map(|m| normalize_ws(m.as_str())).unwrap_or_default();
    let count = c.get(4).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
    Some(Record::new(&identifier, &title, &dates, count))
}

fn is_section_header(line: &str) -> bool {
    SECTION_HEADERS.iter().any(|h| line.contains(h))
}
