// src/config/consts.rs

// Net config
pub const BASE_URL: &str = "https://www.archives13.fr";
pub const SEARCH_URL: &str = "https://www.archives13.fr/archive/recherche/fonds/n:93";
pub const RESULTS_URL: &str = "https://www.archives13.fr/archive/resultats/fonds/fonds/n:93";
pub const USER_AGENT: &str = concat!("fonds_scrape/", env!("CARGO_PKG_VERSION"));
pub const HTTP_TIMEOUT_SECS: u64 = 30;

// Pagination
pub const ITEMS_PER_PAGE: u32 = 100; // site maximum
pub const MAX_PAGES: u32 = 50;       // hard stop even without an end-of-data signal
pub const REQUEST_PAUSE_MS: u64 = 1_000; // be polite

// Classification
pub const ANCIENT_YEAR_THRESHOLD: u32 = 1792;
pub const OTHER_SERIES: &str = "OTHER";

// Aggregation
pub const TOP_RECORDS_PER_CATEGORY: usize = 5;

// Output
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_DOCUMENT_FILE: &str = "archives.json";
pub const DEFAULT_SOURCE_LABEL: &str = BASE_URL;
