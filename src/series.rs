// src/series.rs
//
// Identifier parser: raw catalog code → series token.
// Extractor, classifier, aggregator and merger all key on this, so it must
// stay a pure function of the identifier.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::consts::OTHER_SERIES;

/// Composite tokens checked before the general rule, which would split them
/// (`"3 HDEP 12"` must not become `H`).
const PRIORITY: &[(&str, &str)] = &[
    ("TRIBUNAL", "TRIBUNAL"),
    ("ETP", "ETP"),
    ("HDEP", "HDEP"),
    ("EDEP", "EDEP"),
];

// optional leading digits/blanks, then the letter run
static LEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s]*([A-Z]+)").expect("static regex"));
static ANY_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]+").expect("static regex"));

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series(String);

impl Series {
    pub fn new(token: impl Into<String>) -> Self { Self(token.into()) }
    pub fn other() -> Self { Self(s!(OTHER_SERIES)) }

    pub fn as_str(&self) -> &str { &self.0 }
    pub fn is_other(&self) -> bool { self.0 == OTHER_SERIES }

    /// `"Serie B"` for short letter codes, the bare token for composites.
    pub fn display_name(&self) -> String {
        if self.0.chars().count() <= 3 {
            join!("Serie ", &self.0)
        } else {
            self.0.clone()
        }
    }

    /// Inverse of `display_name`, tolerant of the accented spelling.
    pub fn from_display_name(name: &str) -> Self {
        // older exports append a label: "Serie B - Cours et juridictions"
        let t = name.split(" - ").next().unwrap_or(name).trim();
        let token = ["Serie ", "Série ", "SERIE ", "SÉRIE "]
            .iter()
            .find_map(|p| t.strip_prefix(p))
            .unwrap_or(t);
        Self(token.trim().to_uppercase())
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn series_of(identifier: &str) -> Series {
    let code = identifier.trim().to_uppercase();

    if let Some((_, token)) = PRIORITY.iter().find(|(needle, _)| code.contains(needle)) {
        return Series::new(*token);
    }
    if let Some(c) = LEADING.captures(&code) {
        return Series::new(&c[1]);
    }
    match ANY_RUN.find(&code) {
        Some(m) => Series::new(m.as_str()),
        None => Series::other(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_rule() {
        assert_eq!(series_of("14 B").as_str(), "B");
        assert_eq!(series_of("2404 W").as_str(), "W");
        assert_eq!(series_of("6 U 2").as_str(), "U");
        assert_eq!(series_of("  26 j ").as_str(), "J");
        assert_eq!(series_of("1 FI 250").as_str(), "FI");
        assert_eq!(series_of("E").as_str(), "E");
    }

    #[test]
    fn composites_win_over_general_rule() {
        assert_eq!(series_of("3 HDEP 12").as_str(), "HDEP");
        assert_eq!(series_of("102 EDEP").as_str(), "EDEP");
        assert_eq!(series_of("3 ETP 4").as_str(), "ETP");
    }

    #[test]
    fn unanchored_and_missing_letters() {
        assert_eq!(series_of("(12) ZA").as_str(), "ZA");
        assert!(series_of("1234").is_other());
        assert!(series_of("").is_other());
    }

    #[test]
    fn deterministic() {
        for id in ["14 B", "6 U 2", "3 HDEP", "???"] {
            assert_eq!(series_of(id), series_of(id));
        }
    }

    #[test]
    fn display_name_round_trip() {
        for t in ["B", "FI", "ETP", "HDEP", "TRIBUNAL"] {
            let s = Series::new(t);
            assert_eq!(Series::from_display_name(&s.display_name()), s);
        }
        assert_eq!(Series::new("HDEP").display_name(), "HDEP");
        assert_eq!(Series::from_display_name("Série b"), Series::new("B"));
        assert_eq!(Series::from_display_name("Serie B - Cours et juridictions"), Series::new("B"));
    }
}
