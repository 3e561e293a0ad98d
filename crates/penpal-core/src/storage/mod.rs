//! Storage abstraction for sealed letters.
//!
//! A store only knows two operations: `create` a letter under a fresh id and
//! `fetch` it back. Letters are never updated once stored.

mod file;
mod memory;
mod remote;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use remote::RemoteStore;

use crate::config::StoreConfig;
use crate::letter::{LetterError, SavedLetterState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Length of generated letter ids.
pub const STORE_ID_LEN: usize = 8;

/// Recipient shown in the row when the letter names nobody.
pub const DEFAULT_RECIPIENT: &str = "A friend";

/// Sender shown in the row when the letter is unsigned.
pub const DEFAULT_SENDER: &str = "Anonymous";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Letter not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Remote store error: {0}")]
    Remote(String),
    #[error("Storage error: {0}")]
    Other(String),
}

impl From<LetterError> for StorageError {
    fn from(e: LetterError) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future returned by store operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Keyed persistence for sealed letters.
pub trait Store: Send + Sync {
    /// Persist a letter and return its new id.
    fn create(&self, letter: &SavedLetterState) -> BoxFuture<'_, StorageResult<String>>;

    /// Load a letter by id.
    fn fetch(&self, id: &str) -> BoxFuture<'_, StorageResult<SavedLetterState>>;
}

impl<S: Store + ?Sized> Store for Arc<S> {
    fn create(&self, letter: &SavedLetterState) -> BoxFuture<'_, StorageResult<String>> {
        (**self).create(letter)
    }

    fn fetch(&self, id: &str) -> BoxFuture<'_, StorageResult<SavedLetterState>> {
        (**self).fetch(id)
    }
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn create(&self, letter: &SavedLetterState) -> BoxFuture<'_, StorageResult<String>> {
        (**self).create(letter)
    }

    fn fetch(&self, id: &str) -> BoxFuture<'_, StorageResult<SavedLetterState>> {
        (**self).fetch(id)
    }
}

/// Open the store described by the configuration.
pub fn open_store(config: &StoreConfig) -> StorageResult<Box<dyn Store>> {
    Ok(match config {
        StoreConfig::Memory => Box::new(MemoryStore::new()),
        StoreConfig::File { dir: Some(dir) } => Box::new(FileStore::new(dir.clone())?),
        StoreConfig::File { dir: None } => Box::new(FileStore::default_location()?),
        StoreConfig::Remote { base_url } => Box::new(RemoteStore::new(base_url)?),
    })
}

/// Generate an id of [`STORE_ID_LEN`] lowercase base-36 characters.
pub fn generate_store_id() -> String {
    const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut n = uuid::Uuid::new_v4().as_u128();
    let mut id = String::with_capacity(STORE_ID_LEN);
    for _ in 0..STORE_ID_LEN {
        id.push(ALPHABET[(n % 36) as usize] as char);
        n /= 36;
    }
    id
}

/// Whether a string could be a store id. Only used to reject obvious junk
/// before touching a backend.
pub fn is_valid_store_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Row sent to the remote collaborator on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLetterRow {
    pub recipient_display_name: String,
    pub sender_display_name: String,
    /// The letter as JSON.
    pub serialized_content: String,
}

impl NewLetterRow {
    /// Build the insert row for a letter.
    pub fn from_letter(letter: &SavedLetterState) -> Result<Self, LetterError> {
        let non_blank = |s: Option<&str>| {
            s.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Ok(Self {
            recipient_display_name: non_blank(letter.recipient_name.as_deref())
                .unwrap_or_else(|| DEFAULT_RECIPIENT.to_string()),
            sender_display_name: non_blank(Some(letter.signature.as_str()))
                .unwrap_or_else(|| DEFAULT_SENDER.to_string()),
            serialized_content: letter.to_json()?,
        })
    }

    /// Decode the embedded letter.
    pub fn letter(&self) -> Result<SavedLetterState, LetterError> {
        SavedLetterState::from_json(&self.serialized_content)
    }
}

/// Stored row as returned by the remote collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterRow {
    pub id: String,
    pub recipient_display_name: String,
    pub sender_display_name: String,
    pub serialized_content: String,
    pub created_at: DateTime<Utc>,
}

impl LetterRow {
    pub fn new(id: String, row: NewLetterRow) -> Self {
        Self {
            id,
            recipient_display_name: row.recipient_display_name,
            sender_display_name: row.sender_display_name,
            serialized_content: row.serialized_content,
            created_at: Utc::now(),
        }
    }

    pub fn letter(&self) -> Result<SavedLetterState, LetterError> {
        SavedLetterState::from_json(&self.serialized_content)
    }
}

/// Response body of a successful insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedLetter {
    pub id: String,
}
