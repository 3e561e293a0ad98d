//! Top-level application flow: write, dress the envelope, send.

use crate::canvas::{EnvelopeStage, LetterComposer};
use crate::config::PenPalConfig;
use crate::export::{build_interactive_letter_html, dated_export_filename, export_filename};
use crate::letter::SavedLetterState;
use crate::link::ShareLink;
use crate::outbox::{Outbox, SendError};
use crate::storage::Store;

/// Which screen is shown.
#[derive(Debug, Clone, PartialEq)]
pub enum AppView {
    Writing,
    Envelope,
    Sent { link: ShareLink },
}

/// Drives one letter at a time through `Writing → Envelope → Sent`.
pub struct PenPalApp<S> {
    config: PenPalConfig,
    view: AppView,
    composer: LetterComposer,
    envelope: Option<EnvelopeStage>,
    outbox: Outbox<S>,
}

impl<S: Store> PenPalApp<S> {
    pub fn new(config: PenPalConfig, store: S) -> Self {
        let outbox = Outbox::new(store, config.origin.clone(), config.route_prefix.clone());
        Self {
            composer: LetterComposer::new(config.placement_policy),
            config,
            view: AppView::Writing,
            envelope: None,
            outbox,
        }
    }

    pub fn config(&self) -> &PenPalConfig {
        &self.config
    }

    pub fn view(&self) -> &AppView {
        &self.view
    }

    pub fn composer(&self) -> &LetterComposer {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut LetterComposer {
        &mut self.composer
    }

    pub fn envelope(&self) -> Option<&EnvelopeStage> {
        self.envelope.as_ref()
    }

    pub fn envelope_mut(&mut self) -> Option<&mut EnvelopeStage> {
        self.envelope.as_mut()
    }

    pub fn outbox(&self) -> &Outbox<S> {
        &self.outbox
    }

    /// Seal the letter and move to the envelope. Does nothing on a blank body.
    pub fn seal(&mut self) -> bool {
        if self.view != AppView::Writing {
            return false;
        }
        let Some(letter) = self.composer.seal() else {
            return false;
        };
        log::debug!("letter sealed");
        self.envelope = Some(EnvelopeStage::new(letter, self.config.placement_policy));
        self.view = AppView::Envelope;
        true
    }

    /// The finished letter, once sealed.
    pub fn sealed_letter(&self) -> Option<SavedLetterState> {
        self.envelope.as_ref().map(EnvelopeStage::finish)
    }

    /// Send the sealed letter. On success the app shows the share link; on
    /// failure it stays on the envelope.
    pub async fn send(&mut self) -> Result<ShareLink, SendError> {
        let letter = match (&self.view, self.sealed_letter()) {
            (AppView::Envelope, Some(letter)) => letter,
            _ => return Err(SendError::NotSealed),
        };
        let link = self.outbox.send(&letter).await?;
        self.view = AppView::Sent { link: link.clone() };
        Ok(link)
    }

    /// Standalone document for the sealed letter, with its download filename.
    pub fn export(&self) -> Option<(String, String)> {
        let letter = self.sealed_letter()?;
        let filename = match &self.view {
            AppView::Sent { link } => export_filename(link.id()),
            _ => dated_export_filename(),
        };
        Some((filename, build_interactive_letter_html(&letter)))
    }

    /// Discard the current letter and start a blank one.
    pub fn new_letter(&mut self) {
        self.composer = LetterComposer::new(self.config.placement_policy);
        self.envelope = None;
        self.view = AppView::Writing;
    }
}
