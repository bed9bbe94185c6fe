// src/runner.rs
//
// End-to-end run: gather records → aggregate → merge skeletons → write.
// Every input is read and every transformation done before the first write,
// so a failing run leaves no partial output behind.

use std::path::{Path, PathBuf};

use crate::{
    aggregate::{aggregate, Provenance},
    classify::Classifier,
    config::options::AppOptions,
    document::Document,
    error::{Error, Result},
    merge::merge,
    model::{dedup_records, Record},
    progress::Progress,
    scrape::{collect_records, StopReason},
    sheets,
    source::{HttpSource, UnitSource},
    store::{self, Snapshot, SnapshotMeta, SnapshotRecord},
    taxonomy::Taxonomy,
};

/// Summary of what was produced.
#[derive(Debug)]
pub struct RunSummary {
    pub document: Document,
    /// Distinct fonds fed to the aggregator.
    pub records: usize,
    pub pages: u32,
    pub skipped_lines: usize,
    /// `None` when nothing was scraped.
    pub stop: Option<StopReason>,
    pub files_written: Vec<PathBuf>,
}

/// Run with the live catalog as source when `opts.scrape.enabled`.
pub fn run(
    opts: &AppOptions,
    taxonomy: &Taxonomy,
    progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    if opts.scrape.enabled {
        check_inputs(opts)?;
        let mut http = HttpSource::new(&opts.scrape)?;
        run_with_source(opts, taxonomy, Some(&mut http), progress)
    } else {
        run_with_source(opts, taxonomy, None, progress)
    }
}

/// Same as [`run`], with the caller choosing the unit source.
pub fn run_with_source(
    opts: &AppOptions,
    taxonomy: &Taxonomy,
    source: Option<&mut dyn UnitSource>,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    if source.is_none() && opts.input.snapshots.is_empty() {
        return Err(Error::InvalidArgument(s!(
            "no record source: enable scraping or pass at least one snapshot"
        )));
    }
    check_inputs(opts)?;

    /* ---------- gather ---------- */
    let mut records: Vec<Record> = Vec::new();
    let (mut pages, mut skipped_lines, mut stop) = (0, 0, None);

    if let Some(src) = source {
        let out = collect_records(src, &opts.scrape, progress.as_deref_mut().map(|p| p as &mut dyn Progress));
        pages = out.pages;
        skipped_lines = out.skipped_lines;
        stop = Some(out.stop);
        records.extend(out.records);
    }
    for path in &opts.input.snapshots {
        let snap = store::load_snapshot(path)?;
        if let Some(p) = progress.as_deref_mut() {
            p.log(&format!("Snapshot {}: {} fonds", path.display(), snap.records.len()));
        }
        records.extend(snap.into_records());
    }

    let before = records.len();
    let records = dedup_records(records);
    if before != records.len() {
        logd!("runner: {} duplicate or blank records dropped", before - records.len());
    }

    /* ---------- build ---------- */
    let provenance = Provenance::new(&opts.output.source_label, &opts.output.extracted_at);
    let primary = aggregate(&records, taxonomy, &provenance);

    let skeletons = opts
        .merge
        .skeletons
        .iter()
        .map(|p| store::load_skeleton(p))
        .collect::<Result<Vec<_>>>()?;
    let document = if skeletons.is_empty() { primary } else { merge(&primary, &skeletons) };

    /* ---------- write ---------- */
    let mut files_written = Vec::new();

    store::save_document(&opts.output.document, &document)?;
    files_written.push(opts.output.document.clone());

    if let Some(path) = &opts.output.snapshot {
        let snap = snapshot_of(&records, taxonomy, &provenance);
        store::save_snapshot(path, &snap)?;
        files_written.push(path.clone());
    }
    if let Some(dir) = &opts.output.sheets_dir {
        sheets::write_sheets(dir, &document)?;
        files_written.push(dir.clone());
    }

    logf!(
        "run: {} fonds, {} notices, {} categories",
        document.metadata.total_items,
        document.metadata.total_records,
        document.categories.len()
    );

    Ok(RunSummary {
        document,
        records: records.len(),
        pages,
        skipped_lines,
        stop,
        files_written,
    })
}

/// Fail fast on missing inputs, before any network traffic.
fn check_inputs(opts: &AppOptions) -> Result<()> {
    let missing = |p: &Path| !p.exists();
    if let Some(p) = opts.input.snapshots.iter().find(|p| missing(p)) {
        return Err(Error::input_missing(p));
    }
    if let Some(p) = opts.merge.skeletons.iter().find(|p| missing(p)) {
        return Err(Error::input_missing(p));
    }
    Ok(())
}

fn snapshot_of(records: &[Record], taxonomy: &Taxonomy, provenance: &Provenance) -> Snapshot {
    let classifier = Classifier::new(taxonomy);
    Snapshot {
        metadata: SnapshotMeta {
            source: provenance.source.clone(),
            extracted_at: provenance.extracted_at.clone(),
            total: records.len() as u64,
        },
        records: records
            .iter()
            .map(|r| SnapshotRecord {
                category: s!(classifier.classify(r).name()),
                record: r.clone(),
            })
            .collect(),
    }
}
