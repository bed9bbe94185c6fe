// src/aggregate.rs
//
// Aggregator: flat records → HierarchicalDocument.
// Pure over (records, taxonomy); the same input always yields the same document.

use std::collections::{BTreeMap, HashMap};

use crate::classify::Classifier;
use crate::config::consts::TOP_RECORDS_PER_CATEGORY;
use crate::document::{CategoryEntry, Document, GroupEntry, Metadata};
use crate::model::{year_span, Record};
use crate::series::{series_of, Series};
use crate::taxonomy::{Category, Taxonomy};

/// Where the records came from; copied into the document metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Provenance {
    pub source: String,
    pub extracted_at: String,
}

impl Provenance {
    pub fn new(source: impl Into<String>, extracted_at: impl Into<String>) -> Self {
        Self { source: source.into(), extracted_at: extracted_at.into() }
    }
}

pub fn aggregate(records: &[Record], taxonomy: &Taxonomy, provenance: &Provenance) -> Document {
    let classifier = Classifier::new(taxonomy);

    // category → series → members, input order kept inside each bucket
    let mut buckets: HashMap<Category, BTreeMap<Series, Vec<Record>>> = HashMap::new();
    for r in records.iter().filter(|r| r.is_valid()) {
        buckets
            .entry(classifier.classify(r))
            .or_default()
            .entry(series_of(&r.identifier))
            .or_default()
            .push(r.clone());
    }

    let mut categories = Vec::with_capacity(taxonomy.entries().len());
    let mut groups = Vec::new();

    for info in taxonomy.entries() {
        let mut entry = CategoryEntry {
            name: s!(info.category.name()),
            description: info.description.clone(),
            link: info.link.clone(),
            search_link: s!(taxonomy.search_link()),
            order: info.order,
            ..Default::default()
        };

        let mut members: Vec<&Record> = Vec::new();
        if let Some(by_series) = buckets.get(&info.category) {
            for (series, recs) in by_series {
                let group = build_group(series, info.category, recs);
                entry.online_item_count += group.item_count;
                entry.online_record_count += group.record_count;
                members.extend(recs.iter());
                groups.push(group);
            }
        }

        entry.entry_count = entry.online_item_count;
        members.sort_by(|a, b| b.record_count.cmp(&a.record_count));
        entry.top_records = members
            .into_iter()
            .take(TOP_RECORDS_PER_CATEGORY)
            .cloned()
            .collect();

        logd!(
            "aggregate: {} → {} fonds, {} notices",
            entry.name, entry.online_item_count, entry.online_record_count
        );
        categories.push(entry);
    }

    let mut doc = Document {
        metadata: Metadata {
            source: provenance.source.clone(),
            extracted_at: provenance.extracted_at.clone(),
            ..Default::default()
        },
        categories,
        groups,
        producers: Vec::new(),
    };
    doc.recompute_totals();
    doc
}

fn build_group(series: &Series, category: Category, recs: &[Record]) -> GroupEntry {
    let mut group = GroupEntry {
        series: s!(series.as_str()),
        series_name: series.display_name(),
        category_name: s!(category.name()),
        description: format!("{} - {} inventaires en ligne", series.display_name(), recs.len()),
        item_count: recs.len() as u64,
        record_count: recs.iter().map(|r| r.record_count).sum(),
        date_extreme: date_extreme(recs),
        records: recs.to_vec(),
    };
    group.sort_records();
    group
}

/// `"MIN - MAX"` over members whose range parses; empty when none do.
pub fn date_extreme(recs: &[Record]) -> String {
    let spans: Vec<(u32, u32)> = recs.iter().filter_map(|r| year_span(&r.date_range)).collect();
    let min = spans.iter().map(|s| s.0).min();
    let max = spans.iter().map(|s| s.1).max();
    match (min, max) {
        (Some(lo), Some(hi)) => format!("{lo} - {hi}"),
        _ => s!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, dates: &str, n: u64) -> Record {
        Record::new(id, "t", dates, n)
    }

    fn sample() -> Vec<Record> {
        vec![
            rec("14 B", "1790-1858", 39),
            rec("12 B", "1700-1789", 120),
            rec("2404 W", "1940-1944", 7),
            rec("6 U 2", "", 0),
            rec("26 J", "1900", 4),
            rec("13 B", "", 39),
        ]
    }

    #[test]
    fn every_category_appears_once() {
        let t = Taxonomy::ad13();
        let doc = aggregate(&[], &t, &Provenance::default());

        assert_eq!(doc.categories.len(), Category::ALL.len());
        for (entry, info) in doc.categories.iter().zip(t.entries()) {
            assert_eq!(entry.name, info.category.name());
            assert_eq!(entry.online_item_count, 0);
            assert_eq!(entry.online_record_count, 0);
        }
        assert!(doc.groups.is_empty());
        assert_eq!(doc.metadata.total_items, 0);
    }

    #[test]
    fn groups_totals_and_ordering() {
        let t = Taxonomy::ad13();
        let doc = aggregate(&sample(), &t, &Provenance::new("AD13", "2024-01-01"));

        let b = doc.groups.iter().find(|g| g.series == "B").unwrap();
        assert_eq!(b.series_name, "Serie B");
        assert_eq!(b.category_name, "ARCHIVES ANCIENNES");
        assert_eq!(b.item_count, 3);
        assert_eq!(b.record_count, 198);
        assert_eq!(b.description, "Serie B - 3 inventaires en ligne");
        assert_eq!(b.date_extreme, "1700 - 1858");
        // descending, ties keep input order
        let ids: Vec<_> = b.records.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, ["12 B", "14 B", "13 B"]);

        let modern = doc.category("ARCHIVES MODERNES ET CONTEMPORAINES").unwrap();
        assert_eq!(modern.online_item_count, 2);
        assert_eq!(modern.online_record_count, 7);
        assert_eq!(modern.entry_count, 2);

        assert_eq!(doc.metadata.total_items, 6);
        assert_eq!(doc.metadata.total_records, 209);
        assert_eq!(doc.metadata.source, "AD13");
    }

    #[test]
    fn groups_follow_taxonomy_then_series_order() {
        let doc = aggregate(&sample(), &Taxonomy::ad13(), &Provenance::default());
        let keys: Vec<_> = doc.groups.iter().map(|g| g.series.as_str()).collect();
        assert_eq!(keys, ["B", "U", "W", "J"]);
    }

    #[test]
    fn top_records_capped_and_sorted() {
        let recs: Vec<_> = (1..=8).map(|i| rec(&format!("{i} J"), "", i)).collect();
        let doc = aggregate(&recs, &Taxonomy::ad13(), &Provenance::default());
        let private = doc.category("ARCHIVES PRIVEES").unwrap();
        let counts: Vec<_> = private.top_records.iter().map(|r| r.record_count).collect();
        assert_eq!(counts, [8, 7, 6, 5, 4]);
    }

    #[test]
    fn date_extreme_absent_when_nothing_parses() {
        assert_eq!(date_extreme(&[rec("1 J", "XIXe siècle", 1), rec("2 J", "1900", 1)]), "");
        assert_eq!(date_extreme(&[rec("1 J", "1850 - 1870", 1), rec("2 J", "s.d.-1901", 1)]), "1850 - 1870");
    }

    #[test]
    fn invalid_records_are_dropped() {
        let doc = aggregate(&[rec("  ", "", 5)], &Taxonomy::ad13(), &Provenance::default());
        assert_eq!(doc.metadata.total_items, 0);
    }
}
