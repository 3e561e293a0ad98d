//! Recipient-side viewing of a stored letter.
//!
//! The viewer fetches through a [`FetchTicket`]; once the viewer is
//! unmounted (or a newer fetch starts) late results are dropped.

use crate::letter::SavedLetterState;
use crate::storage::{StorageError, StorageResult, Store};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Time from activating the envelope until the letter is shown.
pub const OPEN_DURATION: Duration = Duration::from_millis(550);

/// Phase of the envelope opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvelopePhase {
    #[default]
    Closed,
    Opening,
    Opened,
}

/// Closed → Opening → Opened, at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnvelopeAnimation {
    phase: EnvelopePhase,
    elapsed: Duration,
}

impl EnvelopeAnimation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> EnvelopePhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase == EnvelopePhase::Opened
    }

    /// Start opening. Only the first activation counts.
    pub fn activate(&mut self) -> bool {
        if self.phase != EnvelopePhase::Closed {
            return false;
        }
        self.phase = EnvelopePhase::Opening;
        self.elapsed = Duration::ZERO;
        true
    }

    /// Advance time; returns true when this call completed the opening.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.phase != EnvelopePhase::Opening {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= OPEN_DURATION {
            self.phase = EnvelopePhase::Opened;
            return true;
        }
        false
    }

    /// Opening progress in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        match self.phase {
            EnvelopePhase::Closed => 0.0,
            EnvelopePhase::Opening => {
                (self.elapsed.as_secs_f64() / OPEN_DURATION.as_secs_f64()).min(1.0)
            }
            EnvelopePhase::Opened => 1.0,
        }
    }
}

/// What the viewer shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerState {
    /// No id in the link.
    InvalidLink,
    Loading,
    /// Unknown id or unreadable content. Offers a way back home.
    NotFound,
    /// Unexpected failure; offers a retry.
    Failed(String),
    Ready {
        letter: SavedLetterState,
        envelope: EnvelopeAnimation,
    },
}

/// Handle for one outstanding fetch.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    id: String,
    generation: u64,
    cancelled: Arc<AtomicBool>,
}

impl FetchTicket {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Viewer for one letter id.
#[derive(Debug)]
pub struct LetterViewer {
    id: String,
    state: ViewerState,
    generation: u64,
    cancelled: Arc<AtomicBool>,
}

impl LetterViewer {
    /// Open the viewer for an id taken from the link. Returns the ticket for
    /// the fetch to run, or `None` when the link carries no id.
    pub fn open(id: &str) -> (Self, Option<FetchTicket>) {
        let id = id.trim().to_string();
        let mut viewer = Self {
            state: ViewerState::InvalidLink,
            id,
            generation: 0,
            cancelled: Arc::new(AtomicBool::new(false)),
        };
        let ticket = if viewer.id.is_empty() {
            None
        } else {
            Some(viewer.start_fetch())
        };
        (viewer, ticket)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    fn start_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = ViewerState::Loading;
        FetchTicket {
            id: self.id.clone(),
            generation: self.generation,
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    /// Retry after a failure.
    pub fn retry(&mut self) -> Option<FetchTicket> {
        match self.state {
            ViewerState::Failed(_) if !self.is_unmounted() => Some(self.start_fetch()),
            _ => None,
        }
    }

    /// Apply a fetch result. Returns false when the result was ignored.
    pub fn resolve(&mut self, ticket: &FetchTicket, result: StorageResult<SavedLetterState>) -> bool {
        if ticket.is_cancelled() || ticket.generation != self.generation {
            log::debug!("ignoring stale fetch for {}", ticket.id);
            return false;
        }
        self.state = match result {
            Ok(letter) => ViewerState::Ready {
                letter,
                envelope: EnvelopeAnimation::new(),
            },
            Err(StorageError::NotFound(_)) => ViewerState::NotFound,
            Err(StorageError::Serialization(e)) => {
                log::warn!("letter {} could not be read: {}", ticket.id, e);
                ViewerState::NotFound
            }
            Err(e) => {
                log::warn!("failed to load letter {}: {}", ticket.id, e);
                ViewerState::Failed(e.to_string())
            }
        };
        true
    }

    /// Fetch from a store and apply the result.
    pub async fn load<S: Store + ?Sized>(&mut self, store: &S, ticket: FetchTicket) -> bool {
        let result = store.fetch(ticket.id()).await;
        self.resolve(&ticket, result)
    }

    /// Stop accepting results.
    pub fn unmount(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_unmounted(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Activate the envelope (click or keyboard).
    pub fn activate(&mut self) -> bool {
        match &mut self.state {
            ViewerState::Ready { envelope, .. } => envelope.activate(),
            _ => false,
        }
    }

    pub fn advance(&mut self, dt: Duration) -> bool {
        match &mut self.state {
            ViewerState::Ready { envelope, .. } => envelope.advance(dt),
            _ => false,
        }
    }
}
