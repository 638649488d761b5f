//! Ingestion router: the single entry point for OS-delivered content.
//!
//! Owns the duplicate-suppression latch so every delivery source (share
//! sheet, deep link) gets the same one-shot behavior instead of each
//! integration point guarding ad hoc.

use std::sync::Mutex;

use tracing::{debug, info};

use crate::normalize::SharedContent;
use crate::state::lock;

#[derive(Default)]
struct RouterState {
    pending: Option<SharedContent>,
    reviewing: bool,
    /// One-shot latch: set on the first accepted delivery, re-armed when
    /// the app returns to the foreground.
    received_this_session: bool,
}

/// Routes incoming shared content into the placement flow.
///
/// Invoked from the UI thread only; the latch handles duplicate OS
/// callbacks, not parallel callers.
#[derive(Default)]
pub struct IngestRouter {
    state: Mutex<RouterState>,
}

impl IngestRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept at most one delivery per foreground session.
    ///
    /// Blank content is a no-op. Returns whether the delivery was accepted;
    /// the caller switches the active view on `true`.
    pub fn receive(&self, shared: SharedContent) -> bool {
        if shared.is_blank() {
            debug!(subsystem = "ingest", component = "router", "dropped blank delivery");
            return false;
        }

        let mut state = lock(&self.state);
        if state.received_this_session {
            debug!(
                subsystem = "ingest",
                component = "router",
                "dropped duplicate delivery"
            );
            return false;
        }

        state.received_this_session = true;
        state.reviewing = true;
        info!(
            subsystem = "ingest",
            component = "router",
            content_len = shared.content.len(),
            has_title = shared.title.is_some(),
            "accepted incoming content"
        );
        state.pending = Some(shared);
        true
    }

    /// The content awaiting placement, if any.
    pub fn pending(&self) -> Option<SharedContent> {
        lock(&self.state).pending.clone()
    }

    /// Whether the app is in reviewing-incoming-content mode.
    pub fn is_reviewing(&self) -> bool {
        lock(&self.state).reviewing
    }

    /// Clear the slot after placement (or explicit dismissal). The latch
    /// stays set until the next foreground transition.
    pub(crate) fn clear_pending(&self) {
        let mut state = lock(&self.state);
        state.pending = None;
        state.reviewing = false;
    }

    /// Re-arm the latch when the app returns to the foreground.
    pub fn reset_for_foreground(&self) {
        lock(&self.state).received_this_session = false;
    }
}
