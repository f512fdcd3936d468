//! Initial language resolution: URL query, then stored preference, then default.

use crate::browser::{query_param, PreferenceStore};
use crate::i18n::Language;
use tracing::{debug, warn};
use url::Url;

/// Where the resolved language came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageSource {
    Url,
    Storage,
    Default,
}

/// Determine the language to show when the page loads.
///
/// Invalid values at either step are treated as absent. A storage read
/// failure is logged and treated as absent; it never propagates.
pub fn resolve_initial_language(
    location: &Url,
    store: &dyn PreferenceStore,
    query_key: &str,
    storage_key: &str,
) -> (Language, LanguageSource) {
    let from_url = query_param(location, query_key);
    if let Some(language) = Language::from_optional_code(from_url.as_deref()) {
        return (language, LanguageSource::Url);
    }
    if let Some(code) = from_url {
        debug!("Ignoring unsupported '{}' query value: {:?}", query_key, code);
    }

    match store.get(storage_key) {
        Ok(stored) => {
            if let Some(language) = Language::from_optional_code(stored.as_deref()) {
                return (language, LanguageSource::Storage);
            }
            if let Some(code) = stored {
                debug!("Ignoring unsupported stored language: {:?}", code);
            }
        }
        Err(e) => warn!("Could not load language preference: {}", e),
    }

    (Language::DEFAULT, LanguageSource::Default)
}
