//! # notarium-session
//!
//! Application state and the ingestion/mutation pipeline for notarium.
//!
//! This crate provides:
//! - [`Session`]: the façade a UI layer holds — folder/note lifecycle,
//!   navigation state, listings, and teardown hooks
//! - [`MutationQueue`]: debounced, coalescing durable writes for
//!   interactive note edits
//! - [`IngestRouter`] + [`normalize`]: OS share / deep-link ingestion with
//!   one-shot duplicate suppression
//! - Placement of reviewed incoming content (new note or append)
//! - Versioned JSON export/import of the collections
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use notarium_session::Session;
//! use notarium_store::SqliteStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(SqliteStore::open("notes.db").await?);
//!     let session = Session::new(store);
//!     session.load().await?;
//!
//!     let note_id = session.create_note(None).await?;
//!     session.queue_note_update(note_id, notarium_core::NotePatch::content("typing..."));
//!
//!     // Required before teardown: persists the last debounce window.
//!     session.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod backup;
pub mod normalize;
pub mod placement;
pub mod queue;
pub mod router;
pub mod session;
pub mod state;

#[cfg(test)]
mod testing;

// Re-export core types
pub use notarium_core::*;

pub use backup::{ExportEnvelope, ImportStats, EXPORT_VERSION};
pub use normalize::{normalize, SharedContent};
pub use queue::{FlushOutcome, MutationQueue};
pub use router::IngestRouter;
pub use session::Session;
pub use state::{Collections, Screen, ViewState};
