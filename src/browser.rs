//! Browser seams other than the document: preference storage and history.
//!
//! Storage is fallible everywhere. A disabled or throwing local storage is a
//! normal condition for this site and callers degrade to defaults.

use anyhow::Context;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,

    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("stored preferences are corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Key-value preference storage (the page's local storage).
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}

/// A store that fails every call, like local storage in a locked-down browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl PreferenceStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }

    fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

/// Preferences persisted as a flat JSON object in a file.
///
/// Non-string values in the file are ignored on read.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn load(&self) -> Result<Map<String, Value>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(Map::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&self, values: &Map<String, Value>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }
        let json = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .load()?
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.load()?;
        values.insert(key.to_string(), Value::String(value.to_string()));
        self.save(&values)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut values = self.load()?;
        if values.remove(key).is_some() {
            self.save(&values)?;
        }
        Ok(())
    }
}

/// Session history of the page (the location bar).
pub trait History {
    fn location(&self) -> &Url;

    /// Change the URL in place: no navigation, no reload.
    fn replace_state(&mut self, url: Url);

    /// Leave the page for another one.
    fn navigate(&mut self, url: Url);
}

/// History that records what happened to it.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    current: Url,
    replacements: usize,
    navigations: Vec<Url>,
}

impl MemoryHistory {
    pub fn new(url: Url) -> Self {
        Self {
            current: url,
            replacements: 0,
            navigations: Vec::new(),
        }
    }

    pub fn parse(url: &str) -> anyhow::Result<Self> {
        let url = Url::parse(url).with_context(|| format!("invalid page URL: {}", url))?;
        Ok(Self::new(url))
    }

    /// Number of in-place URL updates.
    pub fn replacements(&self) -> usize {
        self.replacements
    }

    /// Pages navigated to, oldest first.
    pub fn navigations(&self) -> &[Url] {
        &self.navigations
    }
}

impl History for MemoryHistory {
    fn location(&self) -> &Url {
        &self.current
    }

    fn replace_state(&mut self, url: Url) {
        debug!("replaceState {}", url);
        self.current = url;
        self.replacements += 1;
    }

    fn navigate(&mut self, url: Url) {
        debug!("navigate {}", url);
        self.navigations.push(url.clone());
        self.current = url;
    }
}

/// The three browser surfaces the site logic works against.
pub struct Browser {
    pub document: Box<dyn crate::dom::Document>,
    pub store: Box<dyn PreferenceStore>,
    pub history: Box<dyn History>,
}

impl Browser {
    pub fn new(
        document: impl crate::dom::Document + 'static,
        store: impl PreferenceStore + 'static,
        history: impl History + 'static,
    ) -> Self {
        Self {
            document: Box::new(document),
            store: Box::new(store),
            history: Box::new(history),
        }
    }
}

/// Value of the first occurrence of a query parameter.
pub fn query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// A copy of `url` with `key` set to `value`, or removed when `value` is
/// `None`. Other parameters keep their order; the fragment is untouched.
pub fn with_query_param(url: &Url, key: &str, value: Option<&str>) -> Url {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if let Some(value) = value {
        pairs.push((key.to_string(), value.to_string()));
    }

    let mut updated = url.clone();
    if pairs.is_empty() {
        updated.set_query(None);
    } else {
        updated.query_pairs_mut().clear().extend_pairs(pairs);
    }
    updated
}

pub const HOME_SLUG: &str = "index";

/// Identifier of the current page: last path segment without extension.
///
/// `/opere.html` -> `opere`, `/` -> `index`.
pub fn page_slug(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");
    let stem = match segment.rfind('.') {
        Some(dot) => &segment[..dot],
        None => segment,
    };
    if stem.is_empty() {
        HOME_SLUG.to_string()
    } else {
        stem.to_string()
    }
}
