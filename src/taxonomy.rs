// src/taxonomy.rs
//! Fixed category taxonomy.
//!
//! `Category` is the closed set of top-level groups; `Taxonomy` is the static
//! table describing them (description, canonical link, series historically
//! filed under each). Built once and passed by reference to the classifier
//! and aggregator; nothing here is mutable after construction.

use std::fmt;

use crate::config::consts::{BASE_URL, SEARCH_URL};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Ancient,
    Revolutionary,
    ModernContemporary,
    Hospital,
    CommunalDeposits,
    Private,
    Iconographic,
    Library,
    CivilStatus,
    Notarial,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Ancient,
        Category::Revolutionary,
        Category::ModernContemporary,
        Category::Hospital,
        Category::CommunalDeposits,
        Category::Private,
        Category::Iconographic,
        Category::Library,
        Category::CivilStatus,
        Category::Notarial,
    ];

    /// Catalog name as published by the source; also the interchange key.
    pub fn name(self) -> &'static str {
        match self {
            Category::Ancient => "ARCHIVES ANCIENNES",
            Category::Revolutionary => "ARCHIVES REVOLUTIONNAIRES",
            Category::ModernContemporary => "ARCHIVES MODERNES ET CONTEMPORAINES",
            Category::Hospital => "ARCHIVES HOSPITALIERES",
            Category::CommunalDeposits => "ARCHIVES COMMUNALES ET INTERCOMMUNALES DEPOSEES",
            Category::Private => "ARCHIVES PRIVEES",
            Category::Iconographic => "FONDS ICONOGRAPHIQUES ET AUDIOVISUELS",
            Category::Library => "BIBLIOTHEQUE",
            Category::CivilStatus => "ETAT CIVIL",
            Category::Notarial => "ARCHIVES NOTARIALES",
        }
    }

    /// Lookup by name: case-insensitive, blanks collapsed, accents folded.
    pub fn from_name(name: &str) -> Option<Category> {
        let wanted = name_key(name);
        Category::ALL.into_iter().find(|c| c.name() == wanted)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comparable form of a category name (`"Archives  privées"` → `"ARCHIVES PRIVEES"`).
pub fn name_key(name: &str) -> String {
    let folded: String = name
        .chars()
        .map(|c| match c {
            'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'à' | 'â' | 'À' | 'Â' => 'A',
            'î' | 'ï' | 'Î' | 'Ï' => 'I',
            'ô' | 'Ô' => 'O',
            'ù' | 'û' | 'Ù' | 'Û' => 'U',
            'ç' | 'Ç' => 'C',
            other => other,
        })
        .collect();
    crate::core::sanitize::key(&folded)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryInfo {
    pub category: Category,
    pub description: String,
    pub link: String,
    /// Series tokens historically filed under this category, in catalog order.
    pub series: Vec<String>,
    pub order: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Taxonomy {
    entries: Vec<CategoryInfo>,
    search_link: String,
}

impl Taxonomy {
    /// Entries must cover every `Category` exactly once; missing ones are
    /// appended with empty descriptive fields so totality holds.
    pub fn new(mut entries: Vec<CategoryInfo>, search_link: impl Into<String>) -> Self {
        let mut seen = Vec::with_capacity(entries.len());
        entries.retain(|e| {
            let fresh = !seen.contains(&e.category);
            seen.push(e.category);
            fresh
        });
        for cat in Category::ALL {
            if !entries.iter().any(|e| e.category == cat) {
                let order = entries.len() as u32 + 1;
                entries.push(CategoryInfo {
                    category: cat,
                    description: s!(),
                    link: s!(),
                    series: Vec::new(),
                    order,
                });
            }
        }
        entries.sort_by_key(|e| e.order);
        Self { entries, search_link: search_link.into() }
    }

    /// The departmental archives catalog this crate was built against.
    pub fn ad13() -> Self {
        let entry = |category, order, slug: &str, description: &str, series: &[&str]| CategoryInfo {
            category,
            description: s!(description),
            link: format!("{BASE_URL}/n/{slug}/n:{}", 100 + order),
            series: series.iter().map(|s| s.to_string()).collect(),
            order,
        };

        let entries = vec![
            entry(Category::Ancient, 1, "archives-anciennes",
                "Les archives anciennes sont les archives des institutions d'Ancien Regime supprimees par la Revolution francaise. Elles couvrent une periode de pres de 1000 ans et forment les series A a H du cadre de classement.",
                &["A", "B", "C", "D", "E", "F", "G", "H"]),
            entry(Category::Revolutionary, 2, "archives-revolutionnaires",
                "Les archives revolutionnaires concernent la periode de 1789 a 1800, epoque de profonds bouleversements politiques et administratifs. Elles forment les series L et Q.",
                &["L", "Q"]),
            entry(Category::ModernContemporary, 3, "archives-modernes-et-contemporaines",
                "Les archives modernes et contemporaines sont les fonds produits par les administrations publiques du departement de 1800 a nos jours. Elles forment les series K a Z et W.",
                &["K", "M", "N", "O", "P", "R", "S", "T", "U", "V", "W", "Z", "ETP"]),
            entry(Category::Hospital, 4, "archives-hospitalieres",
                "Les archives hospitalieres regroupent les fonds des etablissements hospitaliers du departement.",
                &["HDEP"]),
            entry(Category::CommunalDeposits, 5, "archives-communales-et-intercommunales-deposees",
                "Les archives communales et intercommunales deposees proviennent des communes du departement ayant choisi de deposer leurs archives anciennes.",
                &["EDEP"]),
            entry(Category::Private, 6, "archives-privees",
                "Les archives privees rassemblent les fonds d'origine privee entres par don, legs, depot ou achat : archives de familles, d'entreprises, d'associations.",
                &["J"]),
            entry(Category::Iconographic, 7, "fonds-iconographiques-et-audiovisuels",
                "Les fonds iconographiques et audiovisuels comprennent les photographies, cartes postales, affiches, plans, films et enregistrements sonores.",
                &["FI", "PH", "AV"]),
            entry(Category::Library, 8, "bibliotheque",
                "La bibliotheque des Archives departementales conserve des ouvrages de reference, periodiques et journaux locaux.",
                &["BIB"]),
            entry(Category::CivilStatus, 9, "etat-civil",
                "L'etat civil comprend les registres paroissiaux et d'etat civil des communes du departement, consultables en ligne.",
                &[]),
            entry(Category::Notarial, 10, "archives-notariales",
                "Les archives notariales regroupent les minutes et repertoires des notaires du departement des origines a nos jours.",
                &[]),
        ];
        Self::new(entries, SEARCH_URL)
    }

    /// Entries in presentation order.
    pub fn entries(&self) -> &[CategoryInfo] { &self.entries }

    pub fn get(&self, category: Category) -> &CategoryInfo {
        // `new` guarantees one entry per category
        self.entries
            .iter()
            .find(|e| e.category == category)
            .unwrap_or_else(|| unreachable!("taxonomy missing {category}"))
    }

    pub fn series(&self, category: Category) -> &[String] { &self.get(category).series }

    pub fn search_link(&self) -> &str { &self.search_link }
}

impl Default for Taxonomy {
    fn default() -> Self { Self::ad13() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ad13_covers_every_category_once_in_order() {
        let t = Taxonomy::ad13();
        assert_eq!(t.entries().len(), Category::ALL.len());
        let cats: Vec<_> = t.entries().iter().map(|e| e.category).collect();
        assert_eq!(cats, Category::ALL.to_vec());
        assert!(t.get(Category::Private).link.ends_with("/n/archives-privees/n:106"));
    }

    #[test]
    fn name_lookup_is_forgiving() {
        assert_eq!(Category::from_name("archives  privées"), Some(Category::Private));
        assert_eq!(Category::from_name(" ETAT CIVIL "), Some(Category::CivilStatus));
        assert_eq!(Category::from_name("AUTRE"), None);
    }

    #[test]
    fn partial_table_is_completed() {
        let t = Taxonomy::new(Vec::new(), "s");
        assert_eq!(t.entries().len(), 10);
        assert!(t.series(Category::Notarial).is_empty());
    }
}
