//! JSON file persistence for the inventory store.
//!
//! The file holds a single JSON object mapping item names to integer
//! quantities, with no envelope or version. Whole-file read and write, no
//! locking.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{info, warn};

use crate::store::InventoryStore;

/// Default inventory file, relative to the working directory.
pub const DEFAULT_INVENTORY_PATH: &str = "inventory.json";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not valid JSON: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} does not contain a valid inventory map", path.display())]
    NotAMap { path: PathBuf },

    #[error("{}: quantity of '{item}' is not an integer", path.display())]
    InvalidQuantity { path: PathBuf, item: String },

    #[error("failed to encode inventory: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Non-error result of a load.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The store now holds `items` entries; `dropped` entries were skipped
    /// (empty name or non-positive quantity).
    Loaded { items: usize, dropped: usize },
    /// No file at the path. The store is left as it was.
    Missing,
}

/// Replace the store's contents with the map stored at `path`.
///
/// The store is only touched when the whole file decodes into a valid map.
pub fn load_data(
    store: &mut InventoryStore,
    path: impl AsRef<Path>,
) -> Result<LoadOutcome, PersistenceError> {
    let path = path.as_ref();

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "inventory file not found");
            return Ok(LoadOutcome::Missing);
        }
        Err(source) => {
            return Err(PersistenceError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let value: JsonValue =
        serde_json::from_str(&text).map_err(|source| PersistenceError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    let JsonValue::Object(map) = value else {
        warn!(path = %path.display(), "inventory file is not a JSON object");
        return Err(PersistenceError::NotAMap {
            path: path.to_path_buf(),
        });
    };

    let mut items = IndexMap::with_capacity(map.len());
    let mut dropped = 0;
    for (name, qty) in map {
        let Some(qty) = qty.as_i64() else {
            return Err(PersistenceError::InvalidQuantity {
                path: path.to_path_buf(),
                item: name,
            });
        };
        if name.is_empty() || qty <= 0 {
            dropped += 1;
            continue;
        }
        items.insert(name, qty);
    }

    if dropped > 0 {
        warn!(path = %path.display(), dropped, "skipped invalid inventory entries");
    }

    let loaded = items.len();
    store.replace_contents(items);
    info!(path = %path.display(), items = loaded, "inventory loaded");

    Ok(LoadOutcome::Loaded {
        items: loaded,
        dropped,
    })
}

/// Write the store to `path` as a JSON object, overwriting any existing file.
pub fn save_data(store: &InventoryStore, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    let json = serde_json::to_string(store.items()).map_err(PersistenceError::Encode)?;

    fs::write(path, json).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), items = store.len(), "inventory saved");
    Ok(())
}

/// An inventory file location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_into(&self, store: &mut InventoryStore) -> Result<LoadOutcome, PersistenceError> {
        load_data(store, &self.path)
    }

    pub fn save(&self, store: &InventoryStore) -> Result<(), PersistenceError> {
        save_data(store, &self.path)
    }
}

impl Default for JsonFile {
    fn default() -> Self {
        Self::new(DEFAULT_INVENTORY_PATH)
    }
}
