// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AppOptions {
    pub scrape: ScrapeOptions,
    pub input: InputOptions,
    pub merge: MergeOptions,
    pub output: OutputOptions,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Fetch the live catalog.
    pub enabled: bool,
    pub results_url: String,
    pub per_page: u32,
    pub max_pages: u32,
    /// Pause between two successive units.
    pub pause: Duration,
    /// The catalog host has served broken certificate chains before.
    pub accept_invalid_certs: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            results_url: s!(RESULTS_URL),
            per_page: ITEMS_PER_PAGE,
            max_pages: MAX_PAGES,
            pause: Duration::from_millis(REQUEST_PAUSE_MS),
            accept_invalid_certs: false,
        }
    }
}

/// Prior flat-record snapshots folded in alongside (or instead of) a live scrape.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct InputOptions {
    pub snapshots: Vec<PathBuf>,
}

/// Skeleton documents: JSON files, or sheet directories.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct MergeOptions {
    pub skeletons: Vec<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputOptions {
    pub document: PathBuf,
    pub snapshot: Option<PathBuf>,
    pub sheets_dir: Option<PathBuf>,
    pub source_label: String,
    /// Stamped into metadata as-is; empty keeps output reproducible.
    pub extracted_at: String,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            document: PathBuf::from(DEFAULT_OUT_DIR).join(DEFAULT_DOCUMENT_FILE),
            snapshot: None,
            sheets_dir: None,
            source_label: s!(DEFAULT_SOURCE_LABEL),
            extracted_at: s!(),
        }
    }
}

impl AppOptions {
    /// At least one record source must be configured.
    pub fn has_record_source(&self) -> bool {
        self.scrape.enabled || !self.input.snapshots.is_empty()
    }
}
