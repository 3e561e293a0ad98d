//! In-memory store.

use super::{BoxFuture, Store, StorageError, StorageResult, generate_store_id};
use crate::letter::SavedLetterState;
use std::collections::HashMap;
use std::sync::RwLock;

/// Attempts at finding an unused id before giving up.
const MAX_ID_ATTEMPTS: usize = 16;

/// In-memory store for tests and ephemeral use.
///
/// Letters are kept as serialized JSON so reads go through the same decode
/// path as every other backend.
#[derive(Default)]
pub struct MemoryStore {
    letters: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored letters.
    pub fn len(&self) -> usize {
        self.letters.read().map(|l| l.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store raw content under a chosen id, replacing anything there.
    pub fn insert_raw(&self, id: impl Into<String>, json: impl Into<String>) -> StorageResult<()> {
        let mut letters = self
            .letters
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        letters.insert(id.into(), json.into());
        Ok(())
    }
}

impl Store for MemoryStore {
    fn create(&self, letter: &SavedLetterState) -> BoxFuture<'_, StorageResult<String>> {
        let json = letter.to_json();
        Box::pin(async move {
            let json = json?;
            let mut letters = self
                .letters
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            for _ in 0..MAX_ID_ATTEMPTS {
                let id = generate_store_id();
                if letters.contains_key(&id) {
                    log::debug!("store id collision on {}, regenerating", id);
                    continue;
                }
                letters.insert(id.clone(), json);
                return Ok(id);
            }
            Err(StorageError::Other("Could not allocate a letter id".to_string()))
        })
    }

    fn fetch(&self, id: &str) -> BoxFuture<'_, StorageResult<SavedLetterState>> {
        let id = id.to_string();
        Box::pin(async move {
            let letters = self
                .letters
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            let json = letters.get(&id).ok_or_else(|| StorageError::NotFound(id.clone()))?;
            SavedLetterState::from_json(json).map_err(|e| {
                log::warn!("stored letter {} is malformed: {}", id, e);
                StorageError::Serialization(e.to_string())
            })
        })
    }
}
