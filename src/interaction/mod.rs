//! Per-result interaction state
//!
//! Every rendered card owns independent, session-local state: a copy
//! feedback window and a favorite flag. Copy feedback is a deadline on the
//! monotonic clock, so a second copy simply moves the deadline and nothing
//! runs in the background.

mod clipboard;
mod opener;

pub use clipboard::{ClipboardSink, MemoryClipboard, SystemClipboard};
pub use opener::{SystemOpener, UrlOpener};
#[cfg(test)]
pub(crate) use opener::RecordingOpener;

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use crate::results::{CardKey, GroupedItem};

/// Default length of the "Copied!" window
pub const COPY_FEEDBACK: Duration = Duration::from_millis(2000);

/// Longest "Copied!" window a board accepts
pub const MAX_COPY_FEEDBACK: Duration = Duration::from_secs(3600);

#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Failed to open {0}")]
    Open(String),

    #[error("No search URL for this query")]
    MissingUrl,
}

/// Interaction state of one card
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardState {
    copied_until: Option<Instant>,
    favorited: bool,
}

impl CardState {
    /// Start (or restart) the copied window at `now`
    ///
    /// A window too large for the clock is capped at `MAX_COPY_FEEDBACK`.
    pub fn mark_copied(&mut self, now: Instant, window: Duration) {
        self.copied_until = Some(now + window.min(MAX_COPY_FEEDBACK));
    }

    pub fn is_copied_at(&self, now: Instant) -> bool {
        self.copied_until.is_some_and(|deadline| now < deadline)
    }

    pub fn copied_until(&self) -> Option<Instant> {
        self.copied_until
    }

    /// Flip the favorite flag and return the new value
    pub fn toggle_favorite(&mut self) -> bool {
        self.favorited = !self.favorited;
        self.favorited
    }

    pub fn is_favorited(&self) -> bool {
        self.favorited
    }
}

/// Interaction state for every card of the current result
///
/// Keyed by (platform, index). Rebuild it whenever a new result is grouped,
/// since indices are not stable across results.
#[derive(Debug, Clone)]
pub struct InteractionBoard {
    cards: HashMap<CardKey, CardState>,
    copy_window: Duration,
}

impl Default for InteractionBoard {
    fn default() -> Self {
        Self::new(COPY_FEEDBACK)
    }
}

impl InteractionBoard {
    pub fn new(copy_window: Duration) -> Self {
        Self {
            cards: HashMap::new(),
            copy_window,
        }
    }

    /// Drop all card state, as when the rendered result is replaced
    pub fn reset(&mut self) {
        self.cards.clear();
    }

    pub fn card(&self, key: &CardKey) -> CardState {
        self.cards.get(key).cloned().unwrap_or_default()
    }

    /// Copy a query's text and start its feedback window
    ///
    /// A clipboard failure leaves the card's state untouched.
    pub fn copy(
        &mut self,
        item: &GroupedItem<'_>,
        clipboard: &mut dyn ClipboardSink,
    ) -> Result<(), InteractionError> {
        clipboard.set_text(&item.query.query)?;
        let window = self.copy_window;
        self.cards
            .entry(item.key())
            .or_default()
            .mark_copied(Instant::now(), window);
        tracing::debug!("Copied query #{} ({})", item.index, item.query.platform);
        Ok(())
    }

    pub fn is_copied(&self, key: &CardKey) -> bool {
        self.cards
            .get(key)
            .is_some_and(|card| card.is_copied_at(Instant::now()))
    }

    /// Open a query's search page
    pub fn open(
        &self,
        item: &GroupedItem<'_>,
        opener: &dyn UrlOpener,
    ) -> Result<(), InteractionError> {
        if item.query.url.is_empty() {
            return Err(InteractionError::MissingUrl);
        }
        tracing::debug!("Opening {}", item.query.url);
        opener.open(&item.query.url)
    }

    pub fn toggle_favorite(&mut self, key: &CardKey) -> bool {
        self.cards.entry(key.clone()).or_default().toggle_favorite()
    }

    pub fn is_favorited(&self, key: &CardKey) -> bool {
        self.cards.get(key).is_some_and(CardState::is_favorited)
    }

    /// Favorited cards ordered by index
    pub fn favorites(&self) -> Vec<CardKey> {
        let mut keys: Vec<CardKey> = self
            .cards
            .iter()
            .filter(|(_, card)| card.is_favorited())
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort_by_key(|k| k.index);
        keys
    }
}
