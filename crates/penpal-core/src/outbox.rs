//! Sending sealed letters to a store.

use crate::letter::SavedLetterState;
use crate::link::ShareLink;
use crate::storage::{StorageError, Store};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Send errors.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("A letter is already being sent")]
    AlreadySending,
    #[error("No sealed letter to send")]
    NotSealed,
    #[error("Invalid share origin: {0}")]
    InvalidOrigin(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Clears the in-flight flag when dropped, including on cancellation.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Sends one letter at a time and turns stored ids into share links.
pub struct Outbox<S> {
    store: S,
    origin: String,
    route_prefix: String,
    sending: AtomicBool,
}

impl<S: Store> Outbox<S> {
    pub fn new(store: S, origin: impl Into<String>, route_prefix: impl Into<String>) -> Self {
        Self {
            store,
            origin: origin.into(),
            route_prefix: route_prefix.into(),
            sending: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether a send is outstanding.
    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::Acquire)
    }

    fn begin(&self) -> Result<InFlight<'_>, SendError> {
        self.sending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlight(&self.sending))
            .map_err(|_| SendError::AlreadySending)
    }

    /// Store the letter and return its share link.
    pub async fn send(&self, letter: &SavedLetterState) -> Result<ShareLink, SendError> {
        let _in_flight = self.begin()?;
        let id = self.store.create(letter).await.map_err(|e| {
            log::warn!("failed to send letter: {}", e);
            e
        })?;
        log::debug!("letter stored as {}", id);
        ShareLink::new(&self.origin, &self.route_prefix, &id)
            .ok_or_else(|| SendError::InvalidOrigin(self.origin.clone()))
    }
}
