//! In-memory application state.
//!
//! [`Collections`] is the single process-wide container for folders and
//! notes. It is constructed explicitly and shared via `Arc` so tests can
//! instantiate isolated instances; there is no module-level singleton.
//! Reads are synchronous snapshots — every view sees a mutation on the same
//! turn it happens, before any durable write completes.

use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use notarium_core::{Folder, FolderPatch, Note, NotePatch, SortKey};

/// The in-memory folder and note collections.
///
/// Mutation helpers are only called from the session's own mutation paths;
/// the view layer reads snapshots.
#[derive(Default)]
pub struct Collections {
    folders: RwLock<Vec<Folder>>,
    notes: RwLock<Vec<Note>>,
}

// Poisoning only means a panicking writer; the data is still the latest
// consistent snapshot.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl Collections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every folder.
    pub fn folders(&self) -> Vec<Folder> {
        read(&self.folders).clone()
    }

    /// Snapshot of every note.
    pub fn notes(&self) -> Vec<Note> {
        read(&self.notes).clone()
    }

    pub fn folder(&self, id: Uuid) -> Option<Folder> {
        read(&self.folders).iter().find(|f| f.id == id).cloned()
    }

    pub fn note(&self, id: Uuid) -> Option<Note> {
        read(&self.notes).iter().find(|n| n.id == id).cloned()
    }

    pub fn folder_count(&self) -> usize {
        read(&self.folders).len()
    }

    pub fn note_count(&self) -> usize {
        read(&self.notes).len()
    }

    /// Replace both collections wholesale (cold-start hydration, import).
    pub fn replace(&self, folders: Vec<Folder>, notes: Vec<Note>) {
        *write(&self.folders) = folders;
        *write(&self.notes) = notes;
    }

    /// Insert a folder unless its id is already present.
    pub fn insert_folder(&self, folder: Folder) -> bool {
        let mut folders = write(&self.folders);
        if folders.iter().any(|f| f.id == folder.id) {
            return false;
        }
        folders.push(folder);
        true
    }

    /// Insert a note unless its id is already present.
    pub fn insert_note(&self, note: Note) -> bool {
        let mut notes = write(&self.notes);
        if notes.iter().any(|n| n.id == note.id) {
            return false;
        }
        notes.push(note);
        true
    }

    pub fn remove_folder(&self, id: Uuid) -> Option<Folder> {
        let mut folders = write(&self.folders);
        let idx = folders.iter().position(|f| f.id == id)?;
        Some(folders.remove(idx))
    }

    pub fn remove_note(&self, id: Uuid) -> Option<Note> {
        let mut notes = write(&self.notes);
        let idx = notes.iter().position(|n| n.id == id)?;
        Some(notes.remove(idx))
    }

    /// Remove and return every note assigned to the given folder.
    pub fn remove_notes_in_folder(&self, folder_id: Uuid) -> Vec<Note> {
        let mut notes = write(&self.notes);
        let (removed, kept): (Vec<Note>, Vec<Note>) = notes
            .drain(..)
            .partition(|n| n.folder_id == Some(folder_id));
        *notes = kept;
        removed
    }

    /// Merge a patch into the note and return the fully-merged record.
    ///
    /// `None` when the id is unknown. The returned clone is exactly what the
    /// views now see, so mutation paths persist it verbatim.
    pub fn apply_note_patch(&self, id: Uuid, patch: &NotePatch) -> Option<Note> {
        let mut notes = write(&self.notes);
        let note = notes.iter_mut().find(|n| n.id == id)?;
        note.apply(patch);
        Some(note.clone())
    }

    /// Merge a patch into the folder and return the fully-merged record.
    pub fn apply_folder_patch(&self, id: Uuid, patch: &FolderPatch) -> Option<Folder> {
        let mut folders = write(&self.folders);
        let folder = folders.iter_mut().find(|f| f.id == id)?;
        folder.apply(patch);
        Some(folder.clone())
    }
}

/// Named view states the UI navigates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    NotesList,
    NoteEditor,
    FolderExplorer,
    SharePlacement,
}

/// Navigation and listing state, mutated only on the UI turn.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub screen: Screen,
    pub current_folder_id: Option<Uuid>,
    pub current_note_id: Option<Uuid>,
    pub search_query: String,
    pub sort_key: SortKey,
}
