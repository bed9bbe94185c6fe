// src/sheets.rs
//
// Spreadsheet-form interchange: one CSV file per sheet in a directory.
//
//   categories.csv  groups.csv  records.csv  [producers.csv]
//
// Columns are named after the document fields. Missing columns or blank
// cells read as "" / 0; counts written by spreadsheet tools as "12.0" are
// accepted.

use std::{fs, path::Path};

use csv::StringRecord;

use crate::document::{CategoryEntry, Document, GroupEntry, ProducerEntry};
use crate::error::{Error, Result};
use crate::model::Record;
use crate::series::Series;
use crate::taxonomy::name_key;

pub const CATEGORIES_SHEET: &str = "categories.csv";
pub const GROUPS_SHEET: &str = "groups.csv";
pub const RECORDS_SHEET: &str = "records.csv";
pub const PRODUCERS_SHEET: &str = "producers.csv";

const CATEGORY_COLS: &[&str] = &[
    "name", "description", "link", "search_link",
    "online_item_count", "online_record_count", "order", "entry_count",
];
const GROUP_COLS: &[&str] = &[
    "series", "series_name", "category_name", "description",
    "item_count", "record_count", "date_extreme",
];
const RECORD_COLS: &[&str] = &[
    "category_name", "series_name", "identifier", "title", "dates", "record_count", "link",
];
const PRODUCER_COLS: &[&str] = &["name", "description", "date_extreme", "group_name"];

/// Header-addressed view of one row.
struct Row<'a> {
    headers: &'a StringRecord,
    cells: &'a StringRecord,
}

impl Row<'_> {
    fn text(&self, col: &str) -> String {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(col))
            .and_then(|i| self.cells.get(i))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    fn num(&self, col: &str) -> u64 {
        parse_count(&self.text(col))
    }
}

/// "12" → 12, "12.0" → 12, anything else → 0.
pub fn parse_count(cell: &str) -> u64 {
    let cell = cell.trim();
    if let Ok(n) = cell.parse::<u64>() {
        return n;
    }
    match cell.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 => f as u64,
        _ => 0,
    }
}

fn read_rows(path: &Path) -> Result<(StringRecord, Vec<StringRecord>)> {
    if !path.is_file() {
        return Err(Error::input_missing(path));
    }
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let mut headers = rdr.headers()?.clone();
    // spreadsheet exports sometimes lead with a BOM
    if let Some(first) = headers.get(0) {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            let mut fixed = StringRecord::new();
            fixed.push_field(stripped);
            headers.iter().skip(1).for_each(|h| fixed.push_field(h));
            headers = fixed;
        }
    }
    let rows = rdr.records().collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((headers, rows))
}

fn each_row<T>(path: &Path, mut f: impl FnMut(&Row) -> T) -> Result<Vec<T>> {
    let (headers, rows) = read_rows(path)?;
    Ok(rows.iter().map(|cells| f(&Row { headers: &headers, cells })).collect())
}

pub fn read_sheets(dir: &Path) -> Result<Document> {
    let categories = each_row(&dir.join(CATEGORIES_SHEET), |r| CategoryEntry {
        name: r.text("name"),
        description: r.text("description"),
        link: r.text("link"),
        search_link: r.text("search_link"),
        online_item_count: r.num("online_item_count"),
        online_record_count: r.num("online_record_count"),
        order: r.num("order") as u32,
        entry_count: r.num("entry_count"),
        top_records: Vec::new(),
    })?;

    let mut groups = each_row(&dir.join(GROUPS_SHEET), |r| {
        let series_name = r.text("series_name");
        let series = match r.text("series") {
            s if s.is_empty() => s!(Series::from_display_name(&series_name).as_str()),
            s => s,
        };
        GroupEntry {
            series,
            series_name,
            category_name: r.text("category_name"),
            description: r.text("description"),
            item_count: r.num("item_count"),
            record_count: r.num("record_count"),
            date_extreme: r.text("date_extreme"),
            records: Vec::new(),
        }
    })?;

    let records = each_row(&dir.join(RECORDS_SHEET), |r| {
        let key = (name_key(&r.text("category_name")), s!(Series::from_display_name(&r.text("series_name")).as_str()));
        let rec = Record::new(&r.text("identifier"), &r.text("title"), &r.text("dates"), r.num("record_count"))
            .with_link(r.text("link"));
        (key, rec)
    })?;

    for (key, rec) in records {
        if !rec.is_valid() {
            continue;
        }
        match groups.iter_mut().find(|g| g.key() == key) {
            Some(g) => g.records.push(rec),
            None => logw!("sheets: record {:?} has no group {:?}; skipped", rec.identifier, key),
        }
    }
    groups.iter_mut().for_each(GroupEntry::sort_records);

    let producers_path = dir.join(PRODUCERS_SHEET);
    let producers = if producers_path.is_file() {
        each_row(&producers_path, |r| ProducerEntry {
            name: r.text("name"),
            description: r.text("description"),
            date_extreme: r.text("date_extreme"),
            group_name: r.text("group_name"),
        })?
    } else {
        Vec::new()
    };

    let mut doc = Document { categories, groups, producers, ..Default::default() };
    doc.recompute_totals();
    logd!("sheets: read {} ({} categories, {} groups)", dir.display(), doc.categories.len(), doc.groups.len());
    Ok(doc)
}

fn write_sheet(path: &Path, cols: &[&str], rows: impl IntoIterator<Item = Vec<String>>) -> Result<()> {
    let mut w = csv::Writer::from_path(path)?;
    w.write_record(cols)?;
    for r in rows {
        w.write_record(&r)?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_sheets(dir: &Path, doc: &Document) -> Result<()> {
    fs::create_dir_all(dir)?;

    write_sheet(&dir.join(CATEGORIES_SHEET), CATEGORY_COLS, doc.categories.iter().map(|c| row![
        c.name.as_str(), c.description.as_str(), c.link.as_str(), c.search_link.as_str(),
        c.online_item_count.to_string(), c.online_record_count.to_string(),
        c.order.to_string(), c.entry_count.to_string(),
    ]))?;

    write_sheet(&dir.join(GROUPS_SHEET), GROUP_COLS, doc.groups.iter().map(|g| row![
        g.series.as_str(), g.series_name.as_str(), g.category_name.as_str(), g.description.as_str(),
        g.item_count.to_string(), g.record_count.to_string(), g.date_extreme.as_str(),
    ]))?;

    write_sheet(&dir.join(RECORDS_SHEET), RECORD_COLS, doc.groups.iter().flat_map(|g| {
        g.records.iter().map(move |r| row![
            g.category_name.as_str(), g.series_name.as_str(),
            r.identifier.as_str(), r.title.as_str(), r.date_range.as_str(),
            r.record_count.to_string(), r.source_link.as_str(),
        ])
    }))?;

    write_sheet(&dir.join(PRODUCERS_SHEET), PRODUCER_COLS, doc.producers.iter().map(|p| row![
        p.name.as_str(), p.description.as_str(), p.date_extreme.as_str(), p.group_name.as_str(),
    ]))?;

    logf!("wrote sheets to {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn counts_tolerate_float_cells() {
        assert_eq!(parse_count("12"), 12);
        assert_eq!(parse_count(" 12.0 "), 12);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("n/a"), 0);
        assert_eq!(parse_count("-3"), 0);
    }

    #[test]
    fn missing_columns_take_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CATEGORIES_SHEET), "name,online_item_count\nARCHIVES PRIVEES,3.0\n").unwrap();
        fs::write(dir.path().join(GROUPS_SHEET), "series_name,category_name\nSerie J,ARCHIVES PRIVEES\n").unwrap();
        fs::write(
            dir.path().join(RECORDS_SHEET),
            "category_name,series_name,identifier,record_count\n\
             ARCHIVES PRIVEES,Serie J,1 J,2\n\
             ARCHIVES PRIVEES,Serie J,2 J,9\n\
             ARCHIVES PRIVEES,Serie K,3 K,1\n",
        )
        .unwrap();

        let doc = read_sheets(dir.path()).unwrap();
        assert_eq!(doc.categories[0].online_item_count, 3);
        assert_eq!(doc.categories[0].description, "");
        let g = &doc.groups[0];
        assert_eq!(g.series, "J");
        assert_eq!(g.item_count, 0);
        let ids: Vec<_> = g.records.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, ["2 J", "1 J"]);
        assert!(doc.producers.is_empty());
        assert_eq!(doc.metadata.total_items, 3);
    }

    #[test]
    fn missing_required_sheet() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CATEGORIES_SHEET), "name\n").unwrap();
        let err = read_sheets(dir.path()).unwrap_err();
        assert!(matches!(err, Error::InputMissing { .. }));
    }
}
