// src/source.rs
//
// Raw-unit suppliers. The pipeline core never fetches anything itself; it
// pulls pages from a `UnitSource` until the source or the driver says stop.

use std::{fs, path::Path};

use reqwest::blocking::Client;

use crate::config::options::ScrapeOptions;
use crate::core::net;
use crate::error::{Error, Result};
use crate::extract;

pub trait UnitSource {
    /// Shown in logs and stamped into snapshot metadata.
    fn label(&self) -> String;

    /// Page `n` (1-based). `Ok(None)` means there is nothing more.
    fn fetch(&mut self, page: u32) -> Result<Option<String>>;

    /// Whether another page is worth requesting after `unit`.
    fn has_more(&self, _page: u32, _unit: &str) -> bool {
        true
    }
}

/// The live catalog, one results page per unit.
pub struct HttpSource {
    client: Client,
    results_url: String,
    per_page: u32,
}

impl HttpSource {
    pub fn new(opts: &ScrapeOptions) -> Result<Self> {
        Ok(Self {
            client: net::client(opts.accept_invalid_certs)?,
            results_url: opts.results_url.trim_end_matches('/').to_string(),
            per_page: opts.per_page,
        })
    }

    pub fn page_url(&self, page: u32) -> String {
        format!(
            "{}/page:{page}/pagination:{}?Rech_mode=and&type=fonds",
            self.results_url, self.per_page
        )
    }
}

impl UnitSource for HttpSource {
    fn label(&self) -> String {
        self.results_url.clone()
    }

    fn fetch(&mut self, page: u32) -> Result<Option<String>> {
        let url = self.page_url(page);
        logd!("GET {url}");
        net::http_get(&self.client, &url).map(Some)
    }

    fn has_more(&self, _page: u32, unit: &str) -> bool {
        extract::has_next_page(unit)
    }
}

/// Pre-captured units, served in order. Used for offline runs and tests.
pub struct FixtureSource {
    label: String,
    units: Vec<String>,
}

impl FixtureSource {
    pub fn new(units: Vec<String>) -> Self {
        Self { label: s!("fixtures"), units }
    }

    /// Every regular file in `dir`, sorted by file name.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::input_missing(dir));
        }
        let mut paths: Vec<_> = fs::read_dir(dir)?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect();
        paths.sort();

        let units = paths
            .iter()
            .map(fs::read_to_string)
            .collect::<std::io::Result<Vec<_>>>()?;
        logd!("fixtures: {} units from {}", units.len(), dir.display());
        Ok(Self { label: dir.display().to_string(), units })
    }
}

impl UnitSource for FixtureSource {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn fetch(&mut self, page: u32) -> Result<Option<String>> {
        let idx = (page as usize).checked_sub(1);
        Ok(idx.and_then(|i| self.units.get(i).cloned()))
    }

    fn has_more(&self, page: u32, _unit: &str) -> bool {
        (page as usize) < self.units.len()
    }
}
