//! Core data models for notarium.
//!
//! These types are shared across all notarium crates and represent
//! the core domain entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::defaults;
use crate::ids::new_v7;

// =============================================================================
// SYNC STATUS
// =============================================================================

/// Advisory per-record sync marker.
///
/// Distinguishes locally-modified records from records a future remote-sync
/// feature has already pushed. Does not gate any local operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Pending,
    Synced,
}

impl SyncStatus {
    /// String form used by the persistence layer.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Synced => "synced",
        }
    }
}

impl std::str::FromStr for SyncStatus {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "synced" => Ok(Self::Synced),
            other => Err(crate::error::Error::InvalidInput(format!(
                "unknown sync status: {other}"
            ))),
        }
    }
}

// =============================================================================
// FOLDER
// =============================================================================

/// A named container for notes, optionally nested under another folder.
///
/// `parent_id = None` means the folder lives at the root. Cycle creation is
/// not prevented on write; consumers that walk parents must bound the walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub sync_status: SyncStatus,
}

impl Folder {
    /// Create a folder with a caller-supplied (already validated) name.
    ///
    /// The name is trimmed; callers reject names that are empty after trim.
    pub fn new(name: &str, parent_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: new_v7(),
            name: name.trim().to_string(),
            parent_id,
            created_at: now,
            updated_at: now,
            sync_status: SyncStatus::Pending,
        }
    }

    /// Merge a partial update into this folder.
    ///
    /// Stamps a fresh monotonic `updated_at` and marks the record pending.
    pub fn apply(&mut self, patch: &FolderPatch) {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(parent_id) = patch.parent_id {
            self.parent_id = parent_id;
        }
        self.updated_at = advance_timestamp(self.updated_at);
        self.sync_status = SyncStatus::Pending;
    }
}

/// Partial update for folder fields outside free-text typing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FolderPatch {
    pub name: Option<String>,
    /// `Some(None)` moves the folder to the root.
    pub parent_id: Option<Option<Uuid>>,
}

impl FolderPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn reparent(parent_id: Option<Uuid>) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.parent_id.is_none()
    }
}

// =============================================================================
// NOTE
// =============================================================================

/// A titled text document belonging to at most one folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub folder_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub sync_status: SyncStatus,
}

impl Note {
    /// Create an empty note with the placeholder title.
    pub fn new(folder_id: Option<Uuid>) -> Self {
        Self::with_content(folder_id, defaults::UNTITLED_NOTE_TITLE, "")
    }

    /// Create a note with an explicit title and body.
    pub fn with_content(folder_id: Option<Uuid>, title: &str, content: &str) -> Self {
        let now = Utc::now();
        Self {
            id: new_v7(),
            folder_id,
            title: title.trim().to_string(),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
            sync_status: SyncStatus::Pending,
        }
    }

    /// Merge a partial update into this note.
    ///
    /// Titles are trimmed on every write; `updated_at` advances monotonically
    /// and the record is marked pending.
    pub fn apply(&mut self, patch: &NotePatch) {
        if let Some(title) = &patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(folder_id) = patch.folder_id {
            self.folder_id = folder_id;
        }
        self.updated_at = advance_timestamp(self.updated_at);
        self.sync_status = SyncStatus::Pending;
    }
}

/// Partial update for note fields.
///
/// The closed set of mutable fields; a field left `None` is untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    /// `Some(None)` moves the note to the root.
    pub folder_id: Option<Option<Uuid>>,
}

impl NotePatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn move_to(folder_id: Option<Uuid>) -> Self {
        Self {
            folder_id: Some(folder_id),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.folder_id.is_none()
    }

    /// Merge a later patch into this one, field-wise last-writer-wins.
    pub fn merge_from(&mut self, later: &NotePatch) {
        if later.title.is_some() {
            self.title = later.title.clone();
        }
        if later.content.is_some() {
            self.content = later.content.clone();
        }
        if later.folder_id.is_some() {
            self.folder_id = later.folder_id;
        }
    }
}

// =============================================================================
// PENDING SYNC
// =============================================================================

/// Records whose local changes have not been marked as remotely synced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendingSync {
    pub folders: Vec<Folder>,
    pub notes: Vec<Note>,
}

impl PendingSync {
    pub fn len(&self) -> usize {
        self.folders.len() + self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.notes.is_empty()
    }
}

/// Advance a record timestamp, never moving it backwards.
///
/// `updated_at` must be monotonic across mutation paths even if the wall
/// clock regresses between calls.
pub fn advance_timestamp(prev: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(prev)
}
