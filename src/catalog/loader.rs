//! Cached catalog loading.
//!
//! Loading is a pure function from a path to a parsed [`Catalog`]; the loader memoizes it
//! per path until the entry is invalidated.

use crate::catalog::lodging::Catalog;
use crate::error::{LogisError, Result};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Loads catalog files and keeps the parsed result per path.
///
/// Failed loads are not cached, so a fixed file is picked up on the next call.
#[derive(Debug, Default)]
pub struct CatalogLoader {
    cache: Mutex<HashMap<PathBuf, Arc<Catalog>>>,
}

impl CatalogLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the catalog at `path`, reading the file only on a cache miss.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Arc<Catalog>> {
        let path = path.as_ref();

        if let Some(catalog) = self.entries().get(path) {
            debug!(path = %path.display(), "Catalog cache hit");
            return Ok(Arc::clone(catalog));
        }

        let catalog = Arc::new(read_catalog(path)?);
        info!(path = %path.display(), lodgings = catalog.len(), "Catalog loaded");

        let mut entries = self.entries();
        let cached = entries.entry(path.to_path_buf()).or_insert(catalog);
        Ok(Arc::clone(cached))
    }

    /// Same as [`load`](Self::load), with the file read on the blocking pool.
    pub async fn load_async(self: &Arc<Self>, path: impl Into<PathBuf>) -> Result<Arc<Catalog>> {
        let path = path.into();
        let cached = self.entries().get(&path).cloned();
        if let Some(catalog) = cached {
            return Ok(catalog);
        }

        let loader = Arc::clone(self);
        tokio::task::spawn_blocking(move || loader.load(&path))
            .await
            .map_err(|e| LogisError::IoError(std::io::Error::other(e)))?
    }

    /// Drop the cached entry for `path`. Returns whether an entry was present.
    pub fn invalidate(&self, path: impl AsRef<Path>) -> bool {
        self.entries().remove(path.as_ref()).is_some()
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn is_cached(&self, path: impl AsRef<Path>) -> bool {
        self.entries().contains_key(path.as_ref())
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<PathBuf, Arc<Catalog>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn read_catalog(path: &Path) -> Result<Catalog> {
    let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LogisError::NotFoundError(path.display().to_string()),
        ErrorKind::InvalidData => {
            LogisError::ParseError(format!("{} is not valid UTF-8", path.display()))
        }
        _ => LogisError::ParseError(format!("cannot read {}: {}", path.display(), e)),
    })?;

    Catalog::from_json_str(&contents)
}
