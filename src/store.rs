// src/store.rs
//
// JSON persistence: hierarchical documents and flat record snapshots.
// Writers create parent directories; readers report a missing file as
// `Error::InputMissing` so the runner can stop before writing anything.

use std::{fs, io, path::Path};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::document::{Document, PartialDocument};
use crate::error::{Error, Result};
use crate::model::Record;
use crate::sheets;

fn ensure_parent(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    let file = fs::File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    io::Write::flush(&mut writer)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.is_file() {
        return Err(Error::input_missing(path));
    }
    let text = fs::read_to_string(path)?;
    // tolerate a UTF-8 BOM from spreadsheet tools
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    Ok(serde_json::from_str(text)?)
}

pub fn save_document(path: &Path, doc: &Document) -> Result<()> {
    write_json(path, doc)?;
    logf!("wrote {} ({} categories, {} groups)", path.display(), doc.categories.len(), doc.groups.len());
    Ok(())
}

pub fn load_document(path: &Path) -> Result<Document> {
    read_json(path)
}

/// A skeleton is either a JSON document or a sheet directory.
pub fn load_skeleton(path: &Path) -> Result<PartialDocument> {
    if path.is_dir() {
        sheets::read_sheets(path)
    } else {
        load_document(path)
    }
}

/* ---------- flat snapshots ---------- */

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotMeta {
    pub source: String,
    pub extracted_at: String,
    pub total: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotRecord {
    #[serde(flatten)]
    pub record: Record,
    #[serde(alias = "categorie")]
    pub category: String,
}

/// Records as they came off the source, before aggregation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub metadata: SnapshotMeta,
    #[serde(alias = "fonds")]
    pub records: Vec<SnapshotRecord>,
}

impl Snapshot {
    pub fn into_records(self) -> Vec<Record> {
        self.records.into_iter().map(|r| r.record).collect()
    }
}

pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    write_json(path, snapshot)?;
    logf!("wrote snapshot {} ({} records)", path.display(), snapshot.records.len());
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let snap: Snapshot = read_json(path)?;
    logd!("loaded snapshot {} ({} records)", path.display(), snap.records.len());
    Ok(snap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_input_is_reported() {
        let dir = tempdir().unwrap();
        let err = load_document(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::InputMissing { .. }));
    }

    #[test]
    fn legacy_snapshot_shape() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("legacy.json");
        fs::write(
            &p,
            r#"{"metadata":{"source":"AD13","total":1},
                "fonds":[{"cote":"14 B","titre":"Tribunal","dates":"1790-1858",
                          "nb_notices":39,"url":"https://x","categorie":"ARCHIVES ANCIENNES"}]}"#,
        )
        .unwrap();

        let snap = load_snapshot(&p).unwrap();
        assert_eq!(snap.metadata.total, 1);
        assert_eq!(snap.records[0].category, "ARCHIVES ANCIENNES");
        let recs = snap.into_records();
        assert_eq!(recs[0].identifier, "14 B");
        assert_eq!(recs[0].record_count, 39);
        assert_eq!(recs[0].source_link, "https://x");
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("a/b/doc.json");
        save_document(&p, &Document::default()).unwrap();
        assert_eq!(load_document(&p).unwrap(), Document::default());
    }

    #[test]
    fn legacy_export_works_as_skeleton() {
        use crate::aggregate::{aggregate, Provenance};
        use crate::model::Record;
        use crate::taxonomy::Taxonomy;

        let dir = tempdir().unwrap();
        let path = dir.path().join("archives.json");
        fs::write(&path, r#"{
  "fonctions": [
    {"fonction": "Archives anciennes", "Description": "Fonds antérieurs à 1790", "nb_inventaires_en_ligne": 500.0},
    {"fonction": "ETAT CIVIL", "Description": "Registres paroissiaux et d'état civil"}
  ],
  "thematiques": [
    {"Thématique": "Serie B - Cours et juridictions", "Fonction": "ARCHIVES ANCIENNES",
     "Description": "Parlement de Provence", "nb_inventaires": 80.0, "nb_notices": 4000.0},
    {"Thématique": "Serie C - Intendance", "Fonction": "ARCHIVES ANCIENNES", "nb_inventaires": 5, "nb_notices": 50}
  ],
  "producteurs": [{"producteur": "Parlement de Provence", "Thematique": "Serie B"}]
}"#).unwrap();

        let skeleton = load_skeleton(&path).unwrap();
        assert_eq!(skeleton.categories.len(), 2);
        assert_eq!(skeleton.groups.len(), 2);

        let primary = aggregate(
            &[Record::new("14 B", "Tribunal", "1790-1858", 39)],
            &Taxonomy::ad13(),
            &Provenance::new("live", ""),
        );
        let merged = crate::merge::merge(&primary, &[skeleton]);

        let b = merged.groups.iter().find(|g| g.series == "B").unwrap();
        assert_eq!(b.item_count, 1);
        assert_eq!(b.record_count, 39);
        let c = merged.groups.iter().find(|g| g.series == "C").unwrap();
        assert_eq!(c.item_count, 5);

        let ancient = merged.category("ARCHIVES ANCIENNES").unwrap();
        assert_eq!(ancient.online_item_count, 1 + 5);
        assert_eq!(merged.producers[0].name, "Parlement de Provence");
        assert_eq!(merged.metadata.total_items, 6);
    }
}
