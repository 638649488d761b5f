//! In-memory persistence adapter.
//!
//! The array-backed stub variant of the store: no durability, no failure
//! modes. Useful as a default backend for tests and for environments where
//! the embedded database is unavailable.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use notarium_core::{Folder, Note, PendingSync, Result, Store, SyncStatus};

/// In-memory implementation of [`Store`].
#[derive(Default)]
pub struct MemoryStore {
    folders: Mutex<HashMap<Uuid, Folder>>,
    notes: Mutex<HashMap<Uuid, Note>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, folders + notes.
    pub fn len(&self) -> usize {
        lock(&self.folders).len() + lock(&self.notes).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// A poisoned lock only means a writer panicked mid-update; the map itself
// is still usable.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_folders(&self) -> Result<Vec<Folder>> {
        Ok(lock(&self.folders).values().cloned().collect())
    }

    async fn list_notes(&self) -> Result<Vec<Note>> {
        Ok(lock(&self.notes).values().cloned().collect())
    }

    async fn save_folder(&self, folder: &Folder) -> Result<()> {
        lock(&self.folders).insert(folder.id, folder.clone());
        Ok(())
    }

    async fn save_note(&self, note: &Note) -> Result<()> {
        lock(&self.notes).insert(note.id, note.clone());
        Ok(())
    }

    async fn delete_folder(&self, id: Uuid) -> Result<()> {
        lock(&self.folders).remove(&id);
        Ok(())
    }

    async fn delete_note(&self, id: Uuid) -> Result<()> {
        lock(&self.notes).remove(&id);
        Ok(())
    }

    async fn list_pending_sync(&self) -> Result<PendingSync> {
        let folders = lock(&self.folders)
            .values()
            .filter(|f| f.sync_status == SyncStatus::Pending)
            .cloned()
            .collect();
        let notes = lock(&self.notes)
            .values()
            .filter(|n| n.sync_status == SyncStatus::Pending)
            .cloned()
            .collect();
        Ok(PendingSync { folders, notes })
    }

    async fn mark_folder_synced(&self, id: Uuid) -> Result<()> {
        if let Some(folder) = lock(&self.folders).get_mut(&id) {
            folder.sync_status = SyncStatus::Synced;
        }
        Ok(())
    }

    async fn mark_note_synced(&self, id: Uuid) -> Result<()> {
        if let Some(note) = lock(&self.notes).get_mut(&id) {
            note.sync_status = SyncStatus::Synced;
        }
        Ok(())
    }
}
