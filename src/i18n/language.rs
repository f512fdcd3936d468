//! Language type: the closed set of languages the site is published in.
//!
//! Any code coming from outside the process (URL query, stored preference,
//! a button's `data-lang`, a CLI argument) goes through
//! [`Language::from_code`] before it touches the catalog.

use crate::i18n::{LanguageConfig, LanguageRegistry};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A supported language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Language {
    /// Source language of the page markup
    Italian,
    /// Translation target
    English,
}

/// Returned when a code is not one of the supported languages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown language code: '{0}'")]
pub struct UnknownLanguage(pub String);

impl Language {
    /// The language the markup is authored in.
    pub const DEFAULT: Language = Language::Italian;

    /// Parse a language code.
    ///
    /// Validation is strict equality against the supported codes: wrong case,
    /// surrounding whitespace or unknown codes all yield `None`.
    pub fn from_code(code: &str) -> Option<Language> {
        LanguageRegistry::get()
            .get_by_code(code)
            .map(|config| config.language)
    }

    /// Parse an optional code, treating absence like an invalid value.
    pub fn from_optional_code(code: Option<&str>) -> Option<Language> {
        code.and_then(Language::from_code)
    }

    /// ISO 639-1 code (e.g., "it", "en").
    pub fn code(self) -> &'static str {
        match self {
            Language::Italian => "it",
            Language::English => "en",
        }
    }

    /// All supported languages, default first.
    pub fn all() -> &'static [Language] {
        &[Language::Italian, Language::English]
    }

    /// Whether this is the language the markup is written in.
    pub fn is_default(self) -> bool {
        self == Language::DEFAULT
    }

    /// The other language of the pair.
    pub fn alternate(self) -> Language {
        match self {
            Language::Italian => Language::English,
            Language::English => Language::Italian,
        }
    }

    /// Full registry entry for this language.
    pub fn config(self) -> &'static LanguageConfig {
        LanguageRegistry::get().get_by_language(self)
    }

    /// English name of the language.
    pub fn name(self) -> &'static str {
        self.config().name
    }

    /// Native name of the language.
    pub fn native_name(self) -> &'static str {
        self.config().native_name
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::DEFAULT
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<String> for Language {
    type Error = UnknownLanguage;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Language::from_code(&code).ok_or(UnknownLanguage(code))
    }
}

impl From<Language> for &'static str {
    fn from(language: Language) -> Self {
        language.code()
    }
}
