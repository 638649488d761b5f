//! Test support: an in-memory store that records every call and can be
//! scripted to fail saves.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use notarium_core::{Error, Folder, Note, PendingSync, Result, Store, SyncStatus};

use crate::state::lock;

#[derive(Default)]
pub struct RecordingStore {
    folders: Mutex<HashMap<Uuid, Folder>>,
    notes: Mutex<HashMap<Uuid, Note>>,
    note_saves: Mutex<Vec<Note>>,
    folder_saves: Mutex<Vec<Folder>>,
    note_deletes: Mutex<Vec<Uuid>>,
    folder_deletes: Mutex<Vec<Uuid>>,
    fail_note_saves: AtomicBool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent note saves fail with a database error.
    pub fn fail_note_saves(&self, fail: bool) {
        self.fail_note_saves.store(fail, Ordering::SeqCst);
    }

    /// Chronological log of `save_note` payloads.
    pub fn note_saves(&self) -> Vec<Note> {
        lock(&self.note_saves).clone()
    }

    pub fn note_save_count(&self) -> usize {
        lock(&self.note_saves).len()
    }

    pub fn folder_saves(&self) -> Vec<Folder> {
        lock(&self.folder_saves).clone()
    }

    pub fn note_deletes(&self) -> Vec<Uuid> {
        lock(&self.note_deletes).clone()
    }

    pub fn folder_deletes(&self) -> Vec<Uuid> {
        lock(&self.folder_deletes).clone()
    }

    pub fn stored_note(&self, id: Uuid) -> Option<Note> {
        lock(&self.notes).get(&id).cloned()
    }

    pub fn seed_folder(&self, folder: Folder) {
        lock(&self.folders).insert(folder.id, folder);
    }

    pub fn seed_note(&self, note: Note) {
        lock(&self.notes).insert(note.id, note);
    }
}

#[async_trait]
impl Store for RecordingStore {
    async fn list_folders(&self) -> Result<Vec<Folder>> {
        Ok(lock(&self.folders).values().cloned().collect())
    }

    async fn list_notes(&self) -> Result<Vec<Note>> {
        Ok(lock(&self.notes).values().cloned().collect())
    }

    async fn save_folder(&self, folder: &Folder) -> Result<()> {
        lock(&self.folder_saves).push(folder.clone());
        lock(&self.folders).insert(folder.id, folder.clone());
        Ok(())
    }

    async fn save_note(&self, note: &Note) -> Result<()> {
        if self.fail_note_saves.load(Ordering::SeqCst) {
            return Err(Error::Internal("scripted save failure".into()));
        }
        lock(&self.note_saves).push(note.clone());
        lock(&self.notes).insert(note.id, note.clone());
        Ok(())
    }

    async fn delete_folder(&self, id: Uuid) -> Result<()> {
        lock(&self.folder_deletes).push(id);
        lock(&self.folders).remove(&id);
        Ok(())
    }

    async fn delete_note(&self, id: Uuid) -> Result<()> {
        lock(&self.note_deletes).push(id);
        lock(&self.notes).remove(&id);
        Ok(())
    }

    async fn list_pending_sync(&self) -> Result<PendingSync> {
        Ok(PendingSync {
            folders: lock(&self.folders)
                .values()
                .filter(|f| f.sync_status == SyncStatus::Pending)
                .cloned()
                .collect(),
            notes: lock(&self.notes)
                .values()
                .filter(|n| n.sync_status == SyncStatus::Pending)
                .cloned()
                .collect(),
        })
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
