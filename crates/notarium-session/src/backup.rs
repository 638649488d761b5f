//! JSON export/import of the collections.
//!
//! The envelope is versioned so a future format change can be detected
//! instead of silently mis-parsed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use notarium_core::{Error, Folder, Note, Result};

use crate::session::Session;

/// Current export format version.
pub const EXPORT_VERSION: u32 = 1;

/// Versioned export envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportEnvelope {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub folders: Vec<Folder>,
    pub notes: Vec<Note>,
}

/// What an import brought in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportStats {
    pub folders: usize,
    pub notes: usize,
}

impl Session {
    /// Serialize the in-memory collections to a JSON envelope.
    ///
    /// The in-memory state is always at least as fresh as the durable copy,
    /// so no flush is needed first.
    pub fn export_data(&self) -> Result<String> {
        let envelope = ExportEnvelope {
            version: EXPORT_VERSION,
            exported_at: Utc::now(),
            folders: self.folders(),
            notes: self.notes(),
        };
        Ok(serde_json::to_string_pretty(&envelope)?)
    }

    /// Replace both collections with an exported envelope and persist every
    /// record.
    ///
    /// Pending coalesced edits are flushed first so they are not silently
    /// dropped with the outgoing data set. Malformed JSON is a
    /// serialization error; an unknown version is invalid input.
    pub async fn import_data(&self, json: &str) -> Result<ImportStats> {
        let envelope: ExportEnvelope = serde_json::from_str(json)?;
        if envelope.version != EXPORT_VERSION {
            return Err(Error::InvalidInput(format!(
                "unsupported export version: {}",
                envelope.version
            )));
        }

        self.flush().await;
        self.collections()
            .replace(envelope.folders.clone(), envelope.notes.clone());

        for folder in &envelope.folders {
            self.store().save_folder(folder).await?;
        }
        for note in &envelope.notes {
            self.store().save_note(note).await?;
        }

        let stats = ImportStats {
            folders: envelope.folders.len(),
            notes: envelope.notes.len(),
        };
        info!(
            subsystem = "session",
            op = "import",
            folder_count = stats.folders,
            note_count = stats.notes,
        );
        Ok(stats)
    }
}
