// src/merge.rs
//
// Merger: fold skeleton documents into a freshly aggregated one.
//
// The primary document wins wherever it has a value; skeletons only fill
// blank descriptive text (descriptions, links, display names). Counts are
// never taken from a skeleton for an entry the primary already has, zero
// included. A skeleton group the primary lacks is appended whole and its
// counts flow into its category, so category totals stay the sum of their
// groups. Categories key on their folded name, groups on (category, series
// token), producers on their name, so re-applying a skeleton finds everything
// already in place. That makes `merge(merge(a, [b]), [b]) == merge(a, [b])`.

use crate::document::{CategoryEntry, Document, GroupEntry, PartialDocument, ProducerEntry};
use crate::taxonomy::name_key;

pub fn merge(primary: &Document, skeletons: &[PartialDocument]) -> Document {
    let mut out = primary.clone();
    for (i, sk) in skeletons.iter().enumerate() {
        logd!("merge: skeleton #{i}: {} categories, {} groups", sk.categories.len(), sk.groups.len());
        merge_metadata(&mut out, sk);
        merge_categories(&mut out, &sk.categories);
        merge_groups(&mut out, &sk.groups);
        merge_producers(&mut out, &sk.producers);
    }
    out.recompute_totals();
    out
}

fn fill_str(dst: &mut String, src: &str) {
    if dst.trim().is_empty() && !src.trim().is_empty() {
        *dst = s!(src);
    }
}

fn merge_metadata(out: &mut Document, sk: &PartialDocument) {
    fill_str(&mut out.metadata.source, &sk.metadata.source);
    fill_str(&mut out.metadata.extracted_at, &sk.metadata.extracted_at);
}

fn merge_categories(out: &mut Document, from: &[CategoryEntry]) {
    for sc in from {
        let key = sc.key();
        let Some(dc) = out.categories.iter_mut().find(|c| c.key() == key) else {
            logw!("merge: skeleton category {:?} is not in the taxonomy; dropped", sc.name);
            continue;
        };
        fill_str(&mut dc.description, &sc.description);
        fill_str(&mut dc.link, &sc.link);
        fill_str(&mut dc.search_link, &sc.search_link);
    }
}

fn merge_groups(out: &mut Document, from: &[GroupEntry]) {
    for sg in from {
        // groups hang off a category; an orphan would break the hierarchy
        let Some(category_name) = out.category(&sg.category_name).map(|c| c.name.clone()) else {
            logw!("merge: group {:?} references unknown category {:?}; dropped", sg.series_name, sg.category_name);
            continue;
        };

        let key = (name_key(&category_name), sg.series_token());
        match out.groups.iter_mut().find(|g| g.key() == key) {
            Some(dg) => {
                fill_str(&mut dg.series, &key.1);
                fill_str(&mut dg.series_name, &sg.series_name);
                fill_str(&mut dg.description, &sg.description);
                fill_str(&mut dg.date_extreme, &sg.date_extreme);
            }
            None => {
                let mut g = sg.clone();
                g.series = key.1;
                g.category_name = category_name;
                g.sort_records();
                if let Some(dc) = out.categories.iter_mut().find(|c| c.key() == key.0) {
                    dc.online_item_count += g.item_count;
                    dc.online_record_count += g.record_count;
                    dc.entry_count += g.item_count;
                }
                out.groups.push(g);
            }
        }
    }
}

fn merge_producers(out: &mut Document, from: &[ProducerEntry]) {
    for sp in from {
        let key = sp.key();
        if key.is_empty() {
            continue;
        }
        match out.producers.iter_mut().find(|p| p.key() == key) {
            Some(dp) => {
                fill_str(&mut dp.description, &sp.description);
                fill_str(&mut dp.date_extreme, &sp.date_extreme);
                fill_str(&mut dp.group_name, &sp.group_name);
            }
            None => out.producers.push(sp.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate, Provenance};
    use crate::model::Record;
    use crate::taxonomy::Taxonomy;

    fn primary() -> Document {
        let recs = vec![
            Record::new("14 B", "Tribunal", "1790-1858", 39),
            Record::new("2404 W", "Préfecture", "1940-1944", 7),
        ];
        let mut doc = aggregate(&recs, &Taxonomy::ad13(), &Provenance::new("live", ""));
        doc.categories.iter_mut().for_each(|c| c.description.clear());
        doc
    }

    fn skeleton() -> Document {
        Document {
            categories: vec![
                CategoryEntry {
                    name: s!("archives anciennes"),
                    description: s!("Fonds d'Ancien Régime"),
                    online_item_count: 500,
                    online_record_count: 9000,
                    ..Default::default()
                },
                CategoryEntry {
                    name: s!("Etat civil"),
                    description: s!("Registres"),
                    online_item_count: 12,
                    ..Default::default()
                },
                CategoryEntry { name: s!("ARCHIVES DU FUTUR"), online_item_count: 3, ..Default::default() },
            ],
            groups: vec![
                GroupEntry {
                    series_name: s!("Serie B"),
                    category_name: s!("ARCHIVES ANCIENNES"),
                    description: s!("Cours et juridictions"),
                    item_count: 800,
                    ..Default::default()
                },
                GroupEntry {
                    series_name: s!("Serie C"),
                    category_name: s!("ARCHIVES ANCIENNES"),
                    description: s!("Intendance"),
                    item_count: 40,
                    record_count: 600,
                    ..Default::default()
                },
                GroupEntry { series_name: s!("Serie X"), category_name: s!("NOPE"), ..Default::default() },
            ],
            producers: vec![ProducerEntry { name: s!("Cour des comptes"), ..Default::default() }],
            ..Default::default()
        }
    }

    #[test]
    fn primary_wins_skeleton_fills_blanks() {
        let merged = merge(&primary(), &[skeleton()]);

        let civil = merged.category("ETAT CIVIL").unwrap();
        assert_eq!(civil.online_item_count, 0);
        assert_eq!(civil.entry_count, 0);
        assert_eq!(civil.description, "Registres");

        let b = merged.groups.iter().find(|g| g.series == "B").unwrap();
        assert_eq!(b.item_count, 1);
        assert_eq!(b.record_count, 39);
        assert_eq!(b.description, "Serie B - 1 inventaires en ligne");
    }

    #[test]
    fn category_totals_are_the_sum_of_their_groups() {
        let merged = merge(&primary(), &[skeleton()]);

        let ancient = merged.category("ARCHIVES ANCIENNES").unwrap();
        assert_eq!(ancient.description, "Fonds d'Ancien Régime");
        // primary B (1 fonds, 39 notices) plus the appended C, never the skeleton's 500/9000
        assert_eq!(ancient.online_item_count, 1 + 40);
        assert_eq!(ancient.online_record_count, 39 + 600);
        assert_eq!(ancient.entry_count, 41);

        for c in &merged.categories {
            let groups = merged.groups.iter().filter(|g| name_key(&g.category_name) == c.key());
            let (items, recs) = groups.fold((0, 0), |(i, r), g| (i + g.item_count, r + g.record_count));
            assert_eq!((c.online_item_count, c.online_record_count), (items, recs), "{}", c.name);
        }
    }

    #[test]
    fn unknown_categories_and_orphans_are_dropped() {
        let merged = merge(&primary(), &[skeleton()]);
        assert_eq!(merged.categories.len(), 10);
        assert!(merged.category("ARCHIVES DU FUTUR").is_none());
        assert!(merged.groups.iter().all(|g| g.series != "X"));
    }

    #[test]
    fn absent_groups_are_appended_once() {
        let merged = merge(&primary(), &[skeleton(), skeleton()]);
        let c: Vec<_> = merged.groups.iter().filter(|g| g.series == "C").collect();
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].category_name, "ARCHIVES ANCIENNES");
        assert_eq!(c[0].item_count, 40);
        assert_eq!(merged.category("ARCHIVES ANCIENNES").unwrap().online_item_count, 41);
        assert_eq!(merged.producers.len(), 1);
    }

    #[test]
    fn metadata_totals_follow_categories() {
        let merged = merge(&primary(), &[skeleton()]);
        let items: u64 = merged.categories.iter().map(|c| c.online_item_count).sum();
        assert_eq!(merged.metadata.total_items, items);
        assert_eq!(merged.metadata.total_items, 1 + 1 + 40);
        assert_eq!(merged.metadata.total_records, 39 + 7 + 600);
        assert_eq!(merged.metadata.source, "live");
    }

    #[test]
    fn idempotent() {
        let a = primary();
        let b = skeleton();
        let once = merge(&a, std::slice::from_ref(&b));
        let twice = merge(&once, std::slice::from_ref(&b));
        assert_eq!(once, twice);
    }
}
