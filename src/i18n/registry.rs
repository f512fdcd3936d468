//! Language registry: the closed set of languages the site is published in.
//!
//! The registry is immutable static data. It carries the metadata that the
//! rest of the crate needs about each language (codes, display names, and
//! which one is the source language of the markup).

use crate::i18n::Language;

/// Metadata for a supported language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    /// The language this entry describes
    pub language: Language,

    /// ISO 639-1 language code (e.g., "it", "en")
    pub code: &'static str,

    /// English name of the language (e.g., "Italian")
    pub name: &'static str,

    /// Native name of the language (e.g., "Italiano")
    pub native_name: &'static str,

    /// Whether the page markup is authored in this language (exactly one)
    pub is_default: bool,
}

/// Registry of every language the site supports.
pub struct LanguageRegistry {
    languages: &'static [LanguageConfig],
}

static LANGUAGES: [LanguageConfig; 2] = [
    LanguageConfig {
        language: Language::Italian,
        code: "it",
        name: "Italian",
        native_name: "Italiano",
        is_default: true,
    },
    LanguageConfig {
        language: Language::English,
        code: "en",
        name: "English",
        native_name: "English",
        is_default: false,
    },
];

static REGISTRY: LanguageRegistry = LanguageRegistry {
    languages: &LANGUAGES,
};

impl LanguageRegistry {
    /// Get the registry instance.
    pub fn get() -> &'static LanguageRegistry {
        &REGISTRY
    }

    /// Get a language configuration by its code.
    ///
    /// Matching is exact: `"EN"` or `" en"` are not supported codes.
    pub fn get_by_code(&self, code: &str) -> Option<&'static LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get the configuration for a language.
    pub fn get_by_language(&self, language: Language) -> &'static LanguageConfig {
        // Every `Language` variant has exactly one entry in LANGUAGES.
        match language {
            Language::Italian => &LANGUAGES[0],
            Language::English => &LANGUAGES[1],
        }
    }

    /// All languages, default first.
    pub fn list_all(&self) -> &'static [LanguageConfig] {
        self.languages
    }

    /// The language the page markup is written in.
    pub fn default_language(&self) -> &'static LanguageConfig {
        self.get_by_language(Language::Italian)
    }
}
