//! Internationalization (i18n) module for the bilingual site.
//!
//! # Architecture
//!
//! - `registry`: Metadata for the two supported languages
//! - `language`: Closed `Language` type; the only way external codes enter
//! - `catalog`: Language -> section -> ordered or keyed strings
//! - `strings`: The built-in catalog content
//! - `validator`: Cross-language consistency checks for a catalog
//!
//! # Example
//!
//! ```rust,ignore
//! use portfolio_i18n::i18n::{builtin_catalog, sections, Language};
//!
//! let catalog = builtin_catalog();
//! let english = Language::from_code("en").unwrap();
//! let labels = catalog.ordered(english, sections::NAVIGATION);
//! ```

mod catalog;
mod language;
mod registry;
mod strings;
mod validator;

pub use catalog::{sections, Catalog, CatalogError, LanguageBundle, Section};
pub use language::{Language, UnknownLanguage};
pub use registry::{LanguageConfig, LanguageRegistry};
pub use strings::{builtin_catalog, strings_for, SiteStrings, ENGLISH_STRINGS, ITALIAN_STRINGS};
pub use validator::{CatalogValidator, ValidationReport};
