// src/extract/mod.rs
//! # Record extraction
//!
//! Turns one raw unit (a results page, or a text dump of one) into candidate
//! [`Record`]s. There is no single reliable layout, so extraction is an ordered
//! cascade of strategies; the first one that yields at least one valid record
//! wins for that unit.
//!
//! | order | strategy | reads |
//! |---|---|---|
//! | 1 | [`Strategy::Markup`] | the `<table id="resultats">` rows |
//! | 2 | [`Strategy::FlatText`] | visible text, one fonds per line |
//! | 3 | [`Strategy::Loose`] | visible text, pattern anywhere (recall over precision) |
//!
//! Nothing here fails: unparseable rows and lines are skipped and counted.
//! A unit yielding zero records is the pagination driver's end-of-data signal.

use std::cell::OnceCell;
use std::fmt;

use crate::core::{html, text};
use crate::model::Record;

pub mod loose;
pub mod markup;
pub mod text_lines;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    Markup,
    FlatText,
    Loose,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Markup => "markup",
            Strategy::FlatText => "flat-text",
            Strategy::Loose => "loose",
        })
    }
}

/// One raw unit with its visible text computed on first use.
pub struct Unit<'a> {
    raw: &'a str,
    text: OnceCell<String>,
}

impl<'a> Unit<'a> {
    pub fn new(raw: &'a str) -> Self { Self { raw, text: OnceCell::new() } }
    pub fn raw(&self) -> &'a str { self.raw }
    pub fn text(&self) -> &str { self.text.get_or_init(|| text::visible_text(self.raw)) }
}

/// What a single strategy produced.
#[derive(Debug, Default)]
pub struct Parsed {
    pub records: Vec<Record>,
    pub skipped: usize,
}

/// Outcome of the cascade for one unit.
#[derive(Debug, Default)]
pub struct Extraction {
    /// `None` when no strategy yielded anything.
    pub strategy: Option<Strategy>,
    pub records: Vec<Record>,
    /// Rows/lines seen but not turned into records, over every strategy tried.
    pub skipped: usize,
}

impl Extraction {
    pub fn is_empty(&self) -> bool { self.records.is_empty() }
}

type StrategyFn = fn(&Unit) -> Parsed;

/// Priority order is the table order.
const CASCADE: &[(Strategy, StrategyFn)] = &[
    (Strategy::Markup, markup::parse),
    (Strategy::FlatText, text_lines::parse),
    (Strategy::Loose, loose::parse),
];

pub fn extract(raw: &str) -> Extraction {
    let unit = Unit::new(raw);
    let mut skipped = 0usize;

    for &(strategy, run) in CASCADE {
        let parsed = run(&unit);
        let before = parsed.records.len();
        let records: Vec<Record> = parsed.records.into_iter().filter(Record::is_valid).collect();
        skipped += parsed.skipped + (before - records.len());

        if !records.is_empty() {
            logd!("extract: {} wins with {} record(s), {} skipped", strategy, records.len(), skipped);
            return Extraction { strategy: Some(strategy), records, skipped };
        }
    }
    logd!("extract: no strategy matched ({} skipped)", skipped);
    Extraction { strategy: None, records: Vec::new(), skipped }
}

/// Records only; see [`extract`] for the strategy and skip count.
pub fn extract_records(raw: &str) -> Vec<Record> {
    extract(raw).records
}

/// True when the unit links to a following page (an anchor whose text is `>`).
pub fn has_next_page(raw: &str) -> bool {
    html::Scan::new(raw)
        .blocks("a")
        .into_iter()
        .any(|a| html::cell_text(&html::inner_after_open_tag(a)) == ">")
}
