// src/extract/loose.rs
//
// Last resort: "ID - title (dates) count" anywhere in the visible text.
// Only used when the structured and line strategies found nothing; favours
// recall, so candidates must at least carry a recognisable series token.

use std::sync::LazyLock;

use regex::Regex;

use super::{Parsed, Unit};
use crate::core::sanitize::{clean_title, normalize_ws};
use crate::model::Record;
use crate::series::series_of;

static LOOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z0-9 \t]+(?:\s[A-Z]+)?)\s*-\s*([^(\n]+)\s*\(([^)\n]+)\)\s*(\d+)")
        .expect("static regex")
});

pub fn parse(unit: &Unit) -> Parsed {
    let mut out = Parsed::default();

    for c in LOOSE.captures_iter(unit.text()) {
        let identifier = normalize_ws(&c[1]);
        let title = clean_title(&c[2]);
        if identifier.is_empty() || title.is_empty() || series_of(&identifier).is_other() {
            out.skipped += 1;
            continue;
        }
        let count = c[4].parse().unwrap_or(0);
        out.records.push(Record::new(&identifier, &title, &normalize_ws(&c[3]), count));
    }
    out
}
