//! Cache store for persisting postcode lookup results to disk
//!
//! Provides a `CacheStore` that keeps a single JSON document mapping
//! normalized postcode keys to the facts already fetched for them, so
//! repeated lookups never re-query the remote service.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// File name of the cache document inside the cache directory
const CACHE_FILE_NAME: &str = "cache.json";

/// Errors that can occur while reading or writing the cache document
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading or writing the cache file failed
    #[error("cache file access failed: {0}")]
    Io(#[from] io::Error),

    /// The cache file exists but does not hold a valid cache document
    #[error("malformed cache document at {path}: {message}")]
    Malformed { path: String, message: String },
}

/// Facts cached for a single postcode key
///
/// The two fields are independent: a record may hold either, both, or
/// neither. An unset field is a cache miss for that field, never a cached
/// negative answer, so unset fields are omitted from the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Whether the postcode is valid, if a validate result has been cached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    /// Completions for the key, if an autocomplete result has been cached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completions: Option<Vec<String>>,
}

/// The full cache document: normalized postcode key -> cached facts
///
/// The document is the unit of persistence; it is always loaded and saved
/// as a whole. `BTreeMap` keeps the serialized key order stable.
pub type CacheDocument = BTreeMap<String, CacheRecord>;

/// Manages the on-disk cache document
///
/// The store holds only the file path; no document state survives between
/// calls. Every read loads the document fresh and every `set_*` performs a
/// full load-modify-save cycle, so the file is the sole source of truth
/// across process invocations.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Path of the cache document
    path: PathBuf,
}

impl CacheStore {
    /// Creates a CacheStore at the XDG-compliant default location
    ///
    /// Uses `~/.cache/postcheck/cache.json` on Linux, or the equivalent XDG
    /// path on other platforms. Returns `None` if no home directory can be
    /// determined.
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "postcheck")?;
        Some(Self {
            path: project_dirs.cache_dir().join(CACHE_FILE_NAME),
        })
    }

    /// Creates a CacheStore backed by a specific file
    ///
    /// Used by the `--cache-file` CLI override and by tests.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing cache file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the cache document from disk
    ///
    /// A missing file is a first run, not an error: it loads as an empty
    /// document. A file that exists but cannot be parsed is reported as
    /// `CacheError::Malformed` rather than silently discarded.
    pub fn load(&self) -> Result<CacheDocument, CacheError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no cache file yet, starting empty");
                return Ok(CacheDocument::new());
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content).map_err(|e| CacheError::Malformed {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Saves the full cache document, replacing any prior contents
    ///
    /// Creates the parent directory if needed and writes the document as
    /// indented JSON. The write goes to a sibling temp file which is then
    /// renamed over the document, so a crash mid-write cannot leave a torn
    /// file behind.
    pub fn save(&self, document: &CacheDocument) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(document)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Looks up the cached validity flag for `key`
    ///
    /// `Ok(None)` signals a cache miss: the key is absent or its `valid`
    /// field has never been set.
    pub fn get_valid(&self, key: &str) -> Result<Option<bool>, CacheError> {
        Ok(self.load()?.get(key).and_then(|record| record.valid))
    }

    /// Looks up the cached completions for `key`
    ///
    /// `Ok(None)` signals a cache miss under the same conditions as
    /// [`get_valid`](Self::get_valid).
    pub fn get_completions(&self, key: &str) -> Result<Option<Vec<String>>, CacheError> {
        Ok(self
            .load()?
            .get(key)
            .and_then(|record| record.completions.clone()))
    }

    /// Upserts the validity flag for `key`
    ///
    /// Creates the record if absent and leaves any cached completions on the
    /// same key untouched.
    pub fn set_valid(&self, key: &str, value: bool) -> Result<(), CacheError> {
        let mut document = self.load()?;
        document.entry(key.to_string()).or_default().valid = Some(value);
        self.save(&document)
    }

    /// Upserts the completions for `key`
    ///
    /// Creates the record if absent and leaves any cached validity flag on
    /// the same key untouched.
    pub fn set_completions(&self, key: &str, values: Vec<String>) -> Result<(), CacheError> {
        let mut document = self.load()?;
        document.entry(key.to_string()).or_default().completions = Some(values);
        self.save(&document)
    }
}
