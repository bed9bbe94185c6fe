// src/classify.rs
//! Classifier: record → exactly one [`Category`].
//!
//! Series letters are reused across categories, so evaluation order is part of
//! the contract. Rules live in [`RULES`], evaluated top-down, first match wins;
//! a new rule goes in at its priority position, never at the end. If nothing
//! matches the record lands in modern and contemporary archives, so
//! classification is total.
//!
//! Letter sets come from the [`Taxonomy`] table; only the markers and the
//! year threshold are fixed here.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::consts::ANCIENT_YEAR_THRESHOLD;
use crate::model::{first_year, Record};
use crate::series::{series_of, Series};
use crate::taxonomy::{Category, Taxonomy};

/// Ancient letter that is also used for civil-status registers.
const AMBIGUOUS_SERIES: &str = "E";
const DEPOSIT_MARKER: &str = "DEP";
const ESTABLISHMENT_MARKER: &str = "ETP";
const ICONOGRAPHIC_MARKER: &str = "FI";
const HOSPITAL_MARKERS: &[&str] = &["H DEP", "HDEP"];
const COMMUNAL_MARKERS: &[&str] = &["E DEP", "EDEP"];
const FALLBACK: Category = Category::ModernContemporary;

// large sequential deposit numbers: "1000 W", "2404W"
static NUMBERED_DEPOSIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\s*W").expect("static regex"));

/// What the rules look at.
pub struct Subject<'a> {
    /// Trimmed, upper-cased identifier.
    pub code: String,
    pub series: Series,
    pub date_range: &'a str,
}

impl<'a> Subject<'a> {
    pub fn new(identifier: &str, date_range: &'a str) -> Self {
        Self {
            code: identifier.trim().to_uppercase(),
            series: series_of(identifier),
            date_range,
        }
    }

    fn series_in(&self, set: &[String]) -> bool {
        set.iter().any(|s| s == self.series.as_str())
    }

    fn code_has(&self, needle: &str) -> bool {
        self.code.contains(needle)
    }

    fn code_has_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.code.contains(n))
    }
}

pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&Classifier, &Subject) -> Option<Category>,
}

pub const RULES: &[Rule] = &[
    Rule { name: "composite-deposit", apply: composite_deposit },
    Rule { name: "private", apply: private },
    Rule { name: "ancient", apply: ancient },
    Rule { name: "ancient-or-civil-status", apply: ancient_or_civil_status },
    Rule { name: "revolutionary", apply: revolutionary },
    Rule { name: "deposit-marker", apply: deposit_marker },
    Rule { name: "iconographic", apply: iconographic },
    Rule { name: "public-establishment", apply: public_establishment },
    Rule { name: "modern-series", apply: modern_series },
    Rule { name: "numbered-deposit", apply: numbered_deposit },
    Rule { name: "library", apply: library },
];

pub const FALLBACK_RULE: &str = "fallback";

#[derive(Clone, Debug)]
pub struct Classifier {
    private: Vec<String>,
    ancient: Vec<String>,
    revolutionary: Vec<String>,
    iconographic: Vec<String>,
    modern: Vec<String>,
    hospital: Vec<String>,
    communal: Vec<String>,
    library: Vec<String>,
    year_threshold: u32,
}

impl Classifier {
    pub fn new(taxonomy: &Taxonomy) -> Self {
        let set = |c: Category| taxonomy.series(c).to_vec();
        let mut ancient = set(Category::Ancient);
        ancient.retain(|s| s != AMBIGUOUS_SERIES);

        Self {
            private: set(Category::Private),
            ancient,
            revolutionary: set(Category::Revolutionary),
            iconographic: set(Category::Iconographic),
            modern: set(Category::ModernContemporary),
            hospital: set(Category::Hospital),
            communal: set(Category::CommunalDeposits),
            library: set(Category::Library),
            year_threshold: ANCIENT_YEAR_THRESHOLD,
        }
    }

    pub fn classify(&self, record: &Record) -> Category {
        self.classify_parts(&record.identifier, &record.date_range)
    }

    pub fn classify_parts(&self, identifier: &str, date_range: &str) -> Category {
        self.explain(identifier, date_range).1
    }

    /// Category plus the name of the rule that decided it.
    pub fn explain(&self, identifier: &str, date_range: &str) -> (&'static str, Category) {
        let subject = Subject::new(identifier, date_range);
        RULES
            .iter()
            .find_map(|rule| (rule.apply)(self, &subject).map(|cat| (rule.name, cat)))
            .unwrap_or((FALLBACK_RULE, FALLBACK))
    }
}

/* ---------- rules, in priority order ---------- */

fn composite_deposit(c: &Classifier, s: &Subject) -> Option<Category> {
    if s.series_in(&c.hospital) {
        Some(Category::Hospital)
    } else if s.series_in(&c.communal) {
        Some(Category::CommunalDeposits)
    } else {
        None
    }
}

fn private(c: &Classifier, s: &Subject) -> Option<Category> {
    s.series_in(&c.private).then_some(Category::Private)
}

fn ancient(c: &Classifier, s: &Subject) -> Option<Category> {
    (s.series_in(&c.ancient) && !s.code_has(DEPOSIT_MARKER)).then_some(Category::Ancient)
}

fn ancient_or_civil_status(c: &Classifier, s: &Subject) -> Option<Category> {
    if s.series.as_str() != AMBIGUOUS_SERIES
        || s.code_has(DEPOSIT_MARKER)
        || s.code_has(ESTABLISHMENT_MARKER)
    {
        return None;
    }
    match first_year(s.date_range) {
        Some(year) if year < c.year_threshold => Some(Category::Ancient),
        _ => Some(Category::CivilStatus),
    }
}

fn revolutionary(c: &Classifier, s: &Subject) -> Option<Category> {
    s.series_in(&c.revolutionary).then_some(Category::Revolutionary)
}

fn deposit_marker(_: &Classifier, s: &Subject) -> Option<Category> {
    if s.code_has_any(HOSPITAL_MARKERS) {
        Some(Category::Hospital)
    } else if s.code_has_any(COMMUNAL_MARKERS) {
        Some(Category::CommunalDeposits)
    } else {
        None
    }
}

fn iconographic(c: &Classifier, s: &Subject) -> Option<Category> {
    (s.series_in(&c.iconographic) || s.code_has(ICONOGRAPHIC_MARKER)).then_some(Category::Iconographic)
}

fn public_establishment(_: &Classifier, s: &Subject) -> Option<Category> {
    s.code_has(ESTABLISHMENT_MARKER).then_some(Category::ModernContemporary)
}

fn modern_series(c: &Classifier, s: &Subject) -> Option<Category> {
    s.series_in(&c.modern).then_some(Category::ModernContemporary)
}

fn numbered_deposit(_: &Classifier, s: &Subject) -> Option<Category> {
    NUMBERED_DEPOSIT.is_match(&s.code).then_some(Category::ModernContemporary)
}

fn library(c: &Classifier, s: &Subject) -> Option<Category> {
    c.library.iter().any(|m| s.code_has(m)).then_some(Category::Library)
}
