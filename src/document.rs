// src/document.rs
//! HierarchicalDocument: the interchange artifact.
//!
//! Every field is always present on output; on input a missing field takes its
//! default (`""` / `0`), never null. The French keys of older `archives.json`
//! exports are accepted on input, and counts may arrive as floats or strings.

use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

use crate::model::Record;
use crate::taxonomy::name_key;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    #[serde(alias = "inventaires_en_ligne")]
    pub metadata: Metadata,
    #[serde(alias = "fonctions")]
    pub categories: Vec<CategoryEntry>,
    #[serde(alias = "thematiques")]
    pub groups: Vec<GroupEntry>,
    #[serde(alias = "producteurs")]
    pub producers: Vec<ProducerEntry>,
}

/// A skeleton or prior snapshot read back for merging. Same shape, any subset
/// of fields may be filled.
pub type PartialDocument = Document;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub source: String,
    #[serde(alias = "date_extraction")]
    pub extracted_at: String,
    #[serde(alias = "total_notices", deserialize_with = "lenient_count")]
    pub total_records: u64,
    #[serde(alias = "total_inventaires", deserialize_with = "lenient_count")]
    pub total_items: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryEntry {
    #[serde(alias = "fonction")]
    pub name: String,
    #[serde(alias = "Description")]
    pub description: String,
    #[serde(alias = "url")]
    pub link: String,
    #[serde(alias = "url_recherche")]
    pub search_link: String,
    /// Number of fonds.
    #[serde(alias = "nb_inventaires_en_ligne", deserialize_with = "lenient_count")]
    pub online_item_count: u64,
    /// Sum of notices over those fonds.
    #[serde(alias = "nb_notices_en_ligne", deserialize_with = "lenient_count")]
    pub online_record_count: u64,
    #[serde(alias = "ordre", deserialize_with = "lenient_order")]
    pub order: u32,
    #[serde(alias = "Nombre d'entrée", deserialize_with = "lenient_count")]
    pub entry_count: u64,
    #[serde(alias = "inventaires_principaux")]
    pub top_records: Vec<Record>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupEntry {
    /// Bare series token (`B`, `HDEP`).
    pub series: String,
    /// Display form (`Serie B`, `HDEP`).
    #[serde(alias = "Thématique", alias = "thematique")]
    pub series_name: String,
    #[serde(alias = "Fonction", alias = "fonction")]
    pub category_name: String,
    #[serde(alias = "Description")]
    pub description: String,
    #[serde(alias = "nb_inventaires", deserialize_with = "lenient_count")]
    pub item_count: u64,
    #[serde(alias = "nb_notices", deserialize_with = "lenient_count")]
    pub record_count: u64,
    #[serde(alias = "date_extreme_thematique")]
    pub date_extreme: String,
    pub records: Vec<Record>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProducerEntry {
    #[serde(alias = "producteur", alias = "Producteur")]
    pub name: String,
    #[serde(alias = "Description")]
    pub description: String,
    #[serde(alias = "date_extreme_producteur")]
    pub date_extreme: String,
    #[serde(alias = "Thematique", alias = "Thématique")]
    pub group_name: String,
}

/// A count as older exports wrote it: integer, float (`12.0`), text or null.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseCount {
    Int(u64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

pub(crate) fn lenient_count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    Ok(match LooseCount::deserialize(d)? {
        LooseCount::Int(n) => n,
        LooseCount::Float(f) if f.is_finite() && f >= 0.0 => f as u64,
        LooseCount::Text(t) => crate::sheets::parse_count(&t),
        LooseCount::Float(_) | LooseCount::Other(_) => 0,
    })
}

fn lenient_order<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    lenient_count(d).map(|n| u32::try_from(n).unwrap_or(u32::MAX))
}

impl CategoryEntry {
    pub fn key(&self) -> String {
        name_key(&self.name)
    }
}

impl GroupEntry {
    /// Merge key: (category, series token).
    pub fn key(&self) -> (String, String) {
        (name_key(&self.category_name), self.series_token())
    }

    /// Token, recovered from the display name when a sheet only carried that.
    pub fn series_token(&self) -> String {
        if self.series.trim().is_empty() {
            crate::series::Series::from_display_name(&self.series_name).as_str().to_owned()
        } else {
            self.series.trim().to_uppercase()
        }
    }

    /// Descending by count, stable on ties.
    pub fn sort_records(&mut self) {
        self.records.sort_by(|a, b| b.record_count.cmp(&a.record_count));
    }
}

impl ProducerEntry {
    pub fn key(&self) -> String {
        crate::core::sanitize::key(&self.name)
    }
}

impl Document {
    pub fn category(&self, name: &str) -> Option<&CategoryEntry> {
        let k = name_key(name);
        self.categories.iter().find(|c| c.key() == k)
    }

    /// Metadata totals from the category totals.
    pub fn recompute_totals(&mut self) {
        self.metadata.total_items = self.categories.iter().map(|c| c.online_item_count).sum();
        self.metadata.total_records = self.categories.iter().map(|c| c.online_record_count).sum();
    }
}
