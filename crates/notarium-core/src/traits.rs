//! Core traits for notarium abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Folder, Note, PendingSync};

// =============================================================================
// PERSISTENCE ADAPTER
// =============================================================================

/// Durable storage for folders and notes.
///
/// The adapter owns the durable copy and is the source of truth on cold
/// start; the in-memory collections are hydrated from it. All operations are
/// asynchronous and may fail; callers handle failures at the call site.
#[async_trait]
pub trait Store: Send + Sync {
    /// List every stored folder.
    async fn list_folders(&self) -> Result<Vec<Folder>>;

    /// List every stored note.
    async fn list_notes(&self) -> Result<Vec<Note>>;

    /// Insert or replace a folder by id.
    async fn save_folder(&self, folder: &Folder) -> Result<()>;

    /// Insert or replace a note by id.
    async fn save_note(&self, note: &Note) -> Result<()>;

    /// Delete a folder by id. Deleting an unknown id is not an error.
    async fn delete_folder(&self, id: Uuid) -> Result<()>;

    /// Delete a note by id. Deleting an unknown id is not an error.
    async fn delete_note(&self, id: Uuid) -> Result<()>;

    /// List records whose local changes are not yet marked remotely synced.
    async fn list_pending_sync(&self) -> Result<PendingSync>;

    /// Mark a folder as remotely synced.
    async fn mark_folder_synced(&self, id: Uuid) -> Result<()>;

    /// Mark a note as remotely synced.
    async fn mark_note_synced(&self, id: Uuid) -> Result<()>;
}

// =============================================================================
// REMOTE QUERY COLLABORATOR
// =============================================================================

/// A note's title and body, as supplied to the query backend for context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteContext {
    pub title: String,
    pub content: String,
}

impl NoteContext {
    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
        }
    }
}

/// Outcome of an API-key validation call.
///
/// An invalid key is a negative result, not an error; transport failures
/// are errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyCheck {
    pub ok: bool,
    pub message: Option<String>,
}

impl KeyCheck {
    pub fn valid() -> Self {
        Self {
            ok: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
        }
    }
}

/// Remote generative-language collaborator used by the query feature.
///
/// The ingestion core has no dependency on this; it lives in its own
/// failure domain.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Check whether the configured API key is accepted by the service.
    async fn test_key(&self) -> Result<KeyCheck>;

    /// Answer a question using only the supplied notes as context.
    async fn query_with_notes(&self, question: &str, notes: &[NoteContext]) -> Result<String>;
}
