//! File-based store.

use super::{BoxFuture, Store, StorageError, StorageResult, generate_store_id};
use crate::letter::SavedLetterState;
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

const MAX_ID_ATTEMPTS: usize = 16;

/// Create `path` (which must not exist) and fill it. If filling fails the
/// file is removed again so no partial letter is left behind.
fn write_new(path: &Path, fill: impl FnOnce(&mut fs::File) -> io::Result<()>) -> io::Result<()> {
    let mut file = fs::OpenOptions::new().write(true).create_new(true).open(path)?;
    if let Err(e) = fill(&mut file) {
        drop(file);
        if let Err(cleanup) = fs::remove_file(path) {
            log::warn!("Failed to remove partial letter {}: {}", path.display(), cleanup);
        }
        return Err(e);
    }
    Ok(())
}

/// Stores each letter as a JSON file in a directory.
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a store in the given directory, creating it if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create a store in the default location.
    ///
    /// On Linux: `~/.local/share/penpal/letters/`
    /// On Windows: `%LOCALAPPDATA%\penpal\letters\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("penpal").join("letters"))
    }

    fn letter_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }
}

impl Store for FileStore {
    fn create(&self, letter: &SavedLetterState) -> BoxFuture<'_, StorageResult<String>> {
        let json = letter.to_json();
        Box::pin(async move {
            let json = json?;
            for _ in 0..MAX_ID_ATTEMPTS {
                let id = generate_store_id();
                let path = self.letter_path(&id);
                // create_new refuses to overwrite an existing letter
                match write_new(&path, |file| file.write_all(json.as_bytes())) {
                    Ok(()) => return Ok(id),
                    Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                        log::debug!("store id collision on {}, regenerating", id);
                        continue;
                    }
                    Err(e) => {
                        log::warn!("Failed to store letter {}: {}", id, e);
                        return Err(StorageError::Io(format!(
                            "Failed to write {}: {}",
                            path.display(),
                            e
                        )));
                    }
                }
            }
            Err(StorageError::Other("Could not allocate a letter id".to_string()))
        })
    }

    fn fetch(&self, id: &str) -> BoxFuture<'_, StorageResult<SavedLetterState>> {
        let path = self.letter_path(id);
        let id_owned = id.to_string();

        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(id_owned));
            }

            let json = fs::read_to_string(&path).map_err(|e| {
                StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
            })?;

            SavedLetterState::from_json(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
            })
        })
    }
}
