// src/model.rs
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::sanitize;

static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}").expect("static regex"));

/// One archival fonds entry as extracted from a source.
///
/// Serialized with the interchange field names (`identifier`, `title`, `dates`,
/// `record_count`, `link`); the legacy snapshot keys are accepted on input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    #[serde(alias = "cote")]
    pub identifier: String,
    #[serde(alias = "titre")]
    pub title: String,
    #[serde(rename = "dates", alias = "date_range")]
    pub date_range: String,
    #[serde(alias = "nb_notices", deserialize_with = "crate::document::lenient_count")]
    pub record_count: u64,
    #[serde(rename = "link", alias = "url", alias = "source_link")]
    pub source_link: String,
}

impl Record {
    pub fn new(identifier: &str, title: &str, date_range: &str, record_count: u64) -> Self {
        Self {
            identifier: sanitize::normalize_ws(identifier),
            title: s!(title),
            date_range: s!(date_range),
            record_count,
            source_link: s!(),
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.source_link = link.into();
        self
    }

    /// A record without an identifier is dropped, never defaulted.
    pub fn is_valid(&self) -> bool {
        !self.identifier.trim().is_empty()
    }

    /// Identity used when several sources describe the same fonds: the detail
    /// link when there is one, else identifier and title together. Distinct
    /// fonds share codes such as a bare `E`.
    pub fn key(&self) -> String {
        let link = self.source_link.trim();
        if link.is_empty() {
            join!(&sanitize::key(&self.identifier), "|", &sanitize::key(&self.title))
        } else {
            join!("link:", link)
        }
    }
}

/// First four-digit run in a free-form date range.
pub fn first_year(dates: &str) -> Option<u32> {
    YEAR.find(dates).and_then(|m| m.as_str().parse().ok())
}

/// `(start, end)` of a `"1790-1858"`-style range: first year of the first part,
/// first year of the last part. `None` when there is no `-` or either side lacks a year.
pub fn year_span(dates: &str) -> Option<(u32, u32)> {
    if !dates.contains('-') {
        return None;
    }
    let mut parts = dates.split('-');
    let first = first_year(parts.next()?)?;
    let last = first_year(parts.last()?)?;
    Some((first, last))
}

/// Keep the first record seen for each [`Record::key`]; invalid records are dropped.
pub fn dedup_records(records: Vec<Record>) -> Vec<Record> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| r.is_valid() && seen.insert(r.key()))
        .collect()
}
