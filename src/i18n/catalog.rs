//! Translation catalog: language -> section -> content.
//!
//! A section is either an ordered list of strings (matched to DOM nodes by
//! document order) or a keyed map (matched by page slug, fixed key, or a
//! marker attribute). The catalog is built once at startup and only read
//! afterwards. Missing languages, sections, or keys are never errors at
//! lookup time; callers treat them as "leave this field alone".

use crate::i18n::Language;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Well-known section names.
pub mod sections {
    pub const NAVIGATION: &str = "navigation";
    pub const BIOGRAPHY: &str = "biography";
    pub const TITLES: &str = "titles";
    pub const FOOTER: &str = "footer";
    pub const EXHIBITIONS: &str = "exhibitions";
    pub const MUSEUM_LOCATIONS: &str = "museum-locations";
}

/// Content of one catalog section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Section {
    /// Positional replacement, by document order
    Ordered(Vec<String>),
    /// Lookup replacement, by stable key
    Keyed(BTreeMap<String, String>),
}

impl Section {
    /// Ordered strings, if this is an ordered section.
    pub fn as_ordered(&self) -> Option<&[String]> {
        match self {
            Section::Ordered(items) => Some(items),
            Section::Keyed(_) => None,
        }
    }

    /// Keyed strings, if this is a keyed section.
    pub fn as_keyed(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Section::Keyed(map) => Some(map),
            Section::Ordered(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Section::Ordered(items) => items.len(),
            Section::Keyed(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// All sections for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageBundle {
    sections: BTreeMap<String, Section>,
}

impl LanguageBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a section.
    pub fn with_section(mut self, name: impl Into<String>, section: Section) -> Self {
        self.sections.insert(name.into(), section);
        self
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Iterate sections in name order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, section)| (name.as_str(), section))
    }
}

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Immutable mapping from language to its bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    bundles: BTreeMap<Language, LanguageBundle>,
}

impl Catalog {
    /// Build a catalog from per-language bundles.
    pub fn new(bundles: impl IntoIterator<Item = (Language, LanguageBundle)>) -> Self {
        Self {
            bundles: bundles.into_iter().collect(),
        }
    }

    /// Parse a catalog from JSON of the form
    /// `{ "<code>": { "<section>": [..] | { "<key>": ".." } } }`.
    ///
    /// Unknown language codes are rejected here, at load time.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON catalog file.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn bundle(&self, language: Language) -> Option<&LanguageBundle> {
        self.bundles.get(&language)
    }

    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.bundles.keys().copied()
    }

    pub fn section(&self, language: Language, name: &str) -> Option<&Section> {
        self.bundle(language)?.section(name)
    }

    /// Ordered strings of a section; `None` when missing or keyed.
    pub fn ordered(&self, language: Language, name: &str) -> Option<&[String]> {
        self.section(language, name)?.as_ordered()
    }

    /// One keyed string; `None` when the section or key is missing.
    pub fn keyed(&self, language: Language, name: &str, key: &str) -> Option<&str> {
        self.section(language, name)?
            .as_keyed()?
            .get(key)
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        let mut titles = BTreeMap::new();
        titles.insert("opere".to_string(), "Works".to_string());
        Catalog::new([(
            Language::English,
            LanguageBundle::new()
                .with_section(
                    sections::NAVIGATION,
                    Section::Ordered(vec!["Works".to_string(), "Museums".to_string()]),
                )
                .with_section(sections::TITLES, Section::Keyed(titles)),
        )])
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_ordered_lookup() {
        let catalog = sample();
        let nav = catalog
            .ordered(Language::English, sections::NAVIGATION)
            .unwrap();
        assert_eq!(nav, ["Works", "Museums"]);
    }

    #[test]
    fn test_keyed_lookup() {
        let catalog = sample();
        assert_eq!(
            catalog.keyed(Language::English, sections::TITLES, "opere"),
            Some("Works")
        );
    }

    #[test]
    fn test_missing_pieces_are_none() {
        let catalog = sample();
        assert!(catalog.bundle(Language::Italian).is_none());
        assert!(catalog.ordered(Language::Italian, sections::NAVIGATION).is_none());
        assert!(catalog.keyed(Language::English, sections::TITLES, "musei").is_none());
        assert!(catalog.keyed(Language::English, sections::FOOTER, "country").is_none());
    }

    #[test]
    fn test_kind_mismatch_is_none() {
        let catalog = sample();
        assert!(catalog.ordered(Language::English, sections::TITLES).is_none());
        assert!(catalog
            .keyed(Language::English, sections::NAVIGATION, "0")
            .is_none());
    }

    // ==================== JSON Tests ====================

    #[test]
    fn test_from_json() {
        let json = r#"{
            "en": {
                "navigation": ["Works", "Museums"],
                "footer": { "country": "Italy" }
            },
            "it": { "footer": { "country": "Italia" } }
        }"#;

        let catalog = Catalog::from_json(json).expect("valid catalog");
        assert_eq!(
            catalog.keyed(Language::Italian, sections::FOOTER, "country"),
            Some("Italia")
        );
        assert_eq!(
            catalog.ordered(Language::English, sections::NAVIGATION).unwrap().len(),
            2
        );
    }

    #[test]
    fn test_from_json_rejects_unknown_language() {
        let json = r#"{ "fr": { "footer": { "country": "Italie" } } }"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(err.to_string().contains("fr"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = Catalog::from_file(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
