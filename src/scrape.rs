// src/scrape.rs
//
// Pagination driver: pull units from a source, extract, stop on the first
// end-of-data signal. Bounded by `max_pages` whatever the source does.

use std::{fmt, thread};

use crate::{
    config::options::ScrapeOptions,
    extract,
    model::Record,
    progress::Progress,
    source::UnitSource,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The source had no unit for the next page.
    Exhausted,
    /// A unit produced no records under any strategy.
    EmptyUnit,
    /// The unit carried no next-page signal.
    LastPage,
    /// The source errored; treated as "no more units".
    SupplierFailed,
    PageLimit,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::Exhausted => "source exhausted",
            StopReason::EmptyUnit => "empty page",
            StopReason::LastPage => "last page",
            StopReason::SupplierFailed => "fetch failed",
            StopReason::PageLimit => "page limit",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOutcome {
    pub records: Vec<Record>,
    /// Units that contributed records.
    pub pages: u32,
    pub skipped_lines: usize,
    pub stop: StopReason,
}

pub fn collect_records(
    source: &mut dyn UnitSource,
    opts: &ScrapeOptions,
    mut progress: Option<&mut dyn Progress>,
) -> ScrapeOutcome {
    if let Some(p) = progress.as_deref_mut() {
        p.begin(opts.max_pages as usize);
        p.log(&format!("Fetching {}…", source.label()));
    }

    let mut out = ScrapeOutcome {
        records: Vec::new(),
        pages: 0,
        skipped_lines: 0,
        stop: StopReason::PageLimit,
    };

    for page in 1..=opts.max_pages {
        if page > 1 && !opts.pause.is_zero() {
            thread::sleep(opts.pause); // be polite
        }

        let unit = match source.fetch(page) {
            Ok(Some(u)) => u,
            Ok(None) => {
                out.stop = StopReason::Exhausted;
                break;
            }
            Err(e) => {
                loge!("page {page}: {e}; stopping");
                if let Some(p) = progress.as_deref_mut() {
                    p.log(&format!("Page {page}: {e}"));
                }
                out.stop = StopReason::SupplierFailed;
                break;
            }
        };

        let ex = extract::extract(&unit);
        if ex.is_empty() {
            out.stop = StopReason::EmptyUnit;
            break;
        }

        let n = ex.records.len();
        logf!("page {page}: {n} fonds ({} skipped)", ex.skipped);
        out.pages += 1;
        out.skipped_lines += ex.skipped;
        out.records.extend(ex.records);
        if let Some(p) = progress.as_deref_mut() {
            p.item_done(page, n);
        }

        if !source.has_more(page, &unit) {
            out.stop = StopReason::LastPage;
            break;
        }
    }

    logf!("scrape: {} fonds over {} pages, stopped on {}", out.records.len(), out.pages, out.stop);
    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    out
}
