//! Catalog consistency validation.
//!
//! Partial translation is an accepted degraded state at runtime, so nothing
//! here blocks synchronization. The report exists so that gaps between the
//! languages are visible before a catalog ships (see the `check-catalog`
//! binary).

use crate::i18n::catalog::{sections, Catalog, Section};
use crate::i18n::Language;
use regex::Regex;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that will render wrongly on the page
    pub errors: Vec<String>,

    /// Gaps that only leave some text untranslated
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for catalog consistency across languages.
pub struct CatalogValidator;

// Text assignment renders tags literally, so any tag-like text is a mistake.
static MARKUP_REGEX: OnceLock<Regex> = OnceLock::new();

/// Sections that only the non-default language needs to provide.
const ADDITIVE_SECTIONS: &[&str] = &[sections::MUSEUM_LOCATIONS];

impl CatalogValidator {
    /// Compare every language's bundle against the default language.
    ///
    /// Checks that:
    /// - every language has a bundle
    /// - sections exist in every language and have the same kind
    /// - ordered sections have the same length
    /// - keyed sections have the same keys (additive sections excepted)
    /// - no string is empty or contains markup
    pub fn validate(catalog: &Catalog) -> ValidationReport {
        let mut report = ValidationReport::new();

        let Some(reference) = catalog.bundle(Language::DEFAULT) else {
            report.errors.push(format!(
                "Default language '{}' has no bundle",
                Language::DEFAULT
            ));
            return report;
        };

        for &language in Language::all() {
            let Some(bundle) = catalog.bundle(language) else {
                report
                    .warnings
                    .push(format!("Language '{}' has no bundle", language));
                continue;
            };

            for (name, section) in bundle.sections() {
                Self::check_strings(language, name, section, &mut report);
            }

            if language == Language::DEFAULT {
                continue;
            }

            for (name, expected) in reference.sections() {
                match bundle.section(name) {
                    None => report.warnings.push(format!(
                        "Section '{}' missing for '{}'",
                        name, language
                    )),
                    Some(actual) => {
                        Self::compare_sections(language, name, expected, actual, &mut report)
                    }
                }
            }

            for (name, _) in bundle.sections() {
                if reference.section(name).is_none() && !ADDITIVE_SECTIONS.contains(&name) {
                    report.warnings.push(format!(
                        "Section '{}' exists for '{}' but not for '{}'",
                        name,
                        language,
                        Language::DEFAULT
                    ));
                }
            }
        }

        report
    }

    fn compare_sections(
        language: Language,
        name: &str,
        expected: &Section,
        actual: &Section,
        report: &mut ValidationReport,
    ) {
        match (expected, actual) {
            (Section::Ordered(a), Section::Ordered(b)) => {
                if a.len() != b.len() {
                    report.warnings.push(format!(
                        "Section '{}' length mismatch: '{}' has {}, '{}' has {}",
                        name,
                        Language::DEFAULT,
                        a.len(),
                        language,
                        b.len()
                    ));
                }
            }
            (Section::Keyed(a), Section::Keyed(b)) => {
                if ADDITIVE_SECTIONS.contains(&name) {
                    return;
                }
                let missing: Vec<_> = a.keys().filter(|k| !b.contains_key(*k)).collect();
                if !missing.is_empty() {
                    report.warnings.push(format!(
                        "Section '{}' for '{}' is missing keys {:?}",
                        name, language, missing
                    ));
                }
                let extra: Vec<_> = b.keys().filter(|k| !a.contains_key(*k)).collect();
                if !extra.is_empty() {
                    report.warnings.push(format!(
                        "Section '{}' for '{}' has keys unknown to '{}': {:?}",
                        name,
                        language,
                        Language::DEFAULT,
                        extra
                    ));
                }
            }
            _ => report.errors.push(format!(
                "Section '{}' kind mismatch between '{}' and '{}'",
                name,
                Language::DEFAULT,
                language
            )),
        }
    }

    fn check_strings(
        language: Language,
        name: &str,
        section: &Section,
        report: &mut ValidationReport,
    ) {
        let values: Vec<&String> = match section {
            Section::Ordered(items) => items.iter().collect(),
            Section::Keyed(map) => map.values().collect(),
        };

        for value in values {
            if value.trim().is_empty() {
                report.warnings.push(format!(
                    "Empty string in section '{}' for '{}'",
                    name, language
                ));
            } else if Self::contains_markup(value) {
                report.errors.push(format!(
                    "Markup in section '{}' for '{}': {:?}",
                    name, language, value
                ));
            }
        }
    }

    fn contains_markup(text: &str) -> bool {
        let regex = MARKUP_REGEX.get_or_init(|| Regex::new(r"</?[a-zA-Z!][^>]*>").unwrap());
        regex.is_match(text)
    }
}
