//! The session façade.
//!
//! Wires the collections container, view state, ingestion router, mutation
//! queue, and a persistence adapter into the one object a UI layer holds.
//! Construction is explicit; teardown is [`Session::shutdown`], which runs
//! the final unconditional flush.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info};
use uuid::Uuid;

use notarium_core::{
    filter_and_sort, path_of, Error, Folder, FolderPatch, Note, NotePatch, Result, SortKey, Store,
};

use crate::normalize::normalize;
use crate::queue::{FlushOutcome, MutationQueue};
use crate::router::IngestRouter;
use crate::state::{lock, Collections, Screen, ViewState};

pub struct Session {
    collections: Arc<Collections>,
    store: Arc<dyn Store>,
    queue: MutationQueue,
    pub(crate) router: IngestRouter,
    view: Mutex<ViewState>,
}

impl Session {
    pub fn new(store: Arc<dyn Store>) -> Self {
        let collections = Arc::new(Collections::new());
        let queue = MutationQueue::new(Arc::clone(&collections), Arc::clone(&store));
        Self {
            collections,
            store,
            queue,
            router: IngestRouter::new(),
            view: Mutex::new(ViewState::default()),
        }
    }

    /// Construct with a custom debounce window (tests mostly).
    pub fn with_debounce(store: Arc<dyn Store>, delay: Duration) -> Self {
        let collections = Arc::new(Collections::new());
        let queue = MutationQueue::with_delay(Arc::clone(&collections), Arc::clone(&store), delay);
        Self {
            collections,
            store,
            queue,
            router: IngestRouter::new(),
            view: Mutex::new(ViewState::default()),
        }
    }

    // ─── Cold start ────────────────────────────────────────────────────────

    /// Hydrate the in-memory collections from the store.
    ///
    /// The durable copy is the source of truth on cold start; whatever was
    /// in memory is replaced.
    pub async fn load(&self) -> Result<()> {
        let folders = self.store.list_folders().await?;
        let notes = self.store.list_notes().await?;
        info!(
            subsystem = "session",
            op = "load",
            folder_count = folders.len(),
            note_count = notes.len(),
        );
        self.collections.replace(folders, notes);
        Ok(())
    }

    // ─── Reads ─────────────────────────────────────────────────────────────

    pub fn collections(&self) -> &Collections {
        &self.collections
    }

    pub(crate) fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub(crate) fn view_state(&self) -> &Mutex<ViewState> {
        &self.view
    }

    pub fn folders(&self) -> Vec<Folder> {
        self.collections.folders()
    }

    pub fn notes(&self) -> Vec<Note> {
        self.collections.notes()
    }

    pub fn note(&self, id: Uuid) -> Option<Note> {
        self.collections.note(id)
    }

    pub fn folder(&self, id: Uuid) -> Option<Folder> {
        self.collections.folder(id)
    }

    // ─── Folder lifecycle ──────────────────────────────────────────────────

    /// Create a folder. A name that is empty after trimming is a silent
    /// no-op (`Ok(None)`); the UI never offers the action for one.
    pub async fn create_folder(
        &self,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> Result<Option<Uuid>> {
        if name.trim().is_empty() {
            return Ok(None);
        }
        let folder = Folder::new(name, parent_id);
        self.collections.insert_folder(folder.clone());
        self.store.save_folder(&folder).await?;
        Ok(Some(folder.id))
    }

    /// Rename a folder in place. An empty trimmed name is a silent no-op.
    pub async fn rename_folder(&self, id: Uuid, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Ok(());
        }
        self.update_folder_immediate(id, FolderPatch::rename(name))
            .await
            .map(|_| ())
    }

    /// Immediate-write path for folder field changes.
    pub async fn update_folder_immediate(
        &self,
        id: Uuid,
        patch: FolderPatch,
    ) -> Result<Folder> {
        let merged = self
            .collections
            .apply_folder_patch(id, &patch)
            .ok_or(Error::FolderNotFound(id))?;
        self.store.save_folder(&merged).await?;
        Ok(merged)
    }

    /// Delete a folder and every note directly assigned to it.
    ///
    /// Child folders are NOT deleted recursively; they keep a dangling
    /// `parent_id` and `path_of` tolerates the orphan. Deleting an unknown
    /// id is benign.
    pub async fn delete_folder(&self, id: Uuid) -> Result<()> {
        let removed = self.collections.remove_folder(id);
        let cascade = self.collections.remove_notes_in_folder(id);
        for note in &cascade {
            self.queue.discard_pending(note.id);
        }

        self.store.delete_folder(id).await?;
        for note in &cascade {
            self.store.delete_note(note.id).await?;
        }
        debug!(
            subsystem = "session",
            op = "delete_folder",
            folder_id = %id,
            cascaded_notes = cascade.len(),
        );

        if let Some(folder) = removed {
            let mut view = lock(&self.view);
            if view.current_folder_id == Some(id) {
                view.current_folder_id = folder.parent_id;
            }
        }
        Ok(())
    }

    // ─── Note lifecycle ────────────────────────────────────────────────────

    /// Create an empty note, defaulting to the currently open folder when
    /// no target is given, and open it in the editor.
    pub async fn create_note(&self, folder_id: Option<Uuid>) -> Result<Uuid> {
        let target = folder_id.or_else(|| lock(&self.view).current_folder_id);
        let note = Note::new(target);
        self.collections.insert_note(note.clone());
        self.store.save_note(&note).await?;

        let mut view = lock(&self.view);
        view.current_note_id = Some(note.id);
        view.screen = Screen::NoteEditor;
        Ok(note.id)
    }

    /// Buffer an interactive edit (typing) through the debounced queue.
    pub fn queue_note_update(&self, id: Uuid, patch: NotePatch) -> Option<Note> {
        self.queue.queue_update(id, patch)
    }

    /// Persist a note mutation right away (folder move, programmatic edit).
    pub async fn update_note_immediate(&self, id: Uuid, patch: NotePatch) -> Result<Note> {
        self.queue.update_immediate(id, patch).await
    }

    /// Durably persist all pending coalesced edits.
    pub async fn flush(&self) -> FlushOutcome {
        self.queue.flush().await
    }

    /// Move a note to another folder (or the root). Already being there is
    /// a no-op.
    pub async fn move_note(&self, id: Uuid, target_folder: Option<Uuid>) -> Result<()> {
        let note = self.collections.note(id).ok_or(Error::NoteNotFound(id))?;
        if note.folder_id == target_folder {
            return Ok(());
        }
        self.update_note_immediate(id, NotePatch::move_to(target_folder))
            .await
            .map(|_| ())
    }

    /// Delete a note, dropping any buffered edits for it.
    pub async fn delete_note(&self, id: Uuid) -> Result<()> {
        self.queue.discard_pending(id);
        self.collections.remove_note(id);
        self.store.delete_note(id).await?;

        let mut view = lock(&self.view);
        if view.current_note_id == Some(id) {
            view.current_note_id = None;
            view.screen = Screen::NotesList;
        }
        Ok(())
    }

    // ─── Ingestion ─────────────────────────────────────────────────────────

    /// Entry point for OS share and deep-link deliveries.
    ///
    /// Normalizes the raw string and hands it to the router; on acceptance
    /// the app switches into reviewing-incoming-content mode on the
    /// placement screen.
    pub fn receive_shared(&self, raw: &str) -> bool {
        let accepted = self.router.receive(normalize(raw));
        if accepted {
            lock(&self.view).screen = Screen::SharePlacement;
        }
        accepted
    }

    pub fn is_reviewing_shared(&self) -> bool {
        self.router.is_reviewing()
    }

    /// Re-arm the one-shot delivery latch on foreground transitions.
    pub fn reset_for_foreground(&self) {
        self.router.reset_for_foreground();
    }

    /// Flush before the process is suspended. Required, not optional: the
    /// last debounce window's edits would otherwise be lost.
    pub async fn on_background(&self) -> FlushOutcome {
        self.flush().await
    }

    /// Final teardown flush.
    pub async fn shutdown(&self) -> FlushOutcome {
        self.flush().await
    }

    // ─── View state & listings ─────────────────────────────────────────────

    pub fn view(&self) -> ViewState {
        lock(&self.view).clone()
    }

    pub fn set_screen(&self, screen: Screen) {
        lock(&self.view).screen = screen;
    }

    pub fn set_current_folder(&self, id: Option<Uuid>) {
        lock(&self.view).current_folder_id = id;
    }

    pub fn set_current_note(&self, id: Option<Uuid>) {
        lock(&self.view).current_note_id = id;
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        lock(&self.view).search_query = query.into();
    }

    pub fn set_sort_key(&self, sort_key: SortKey) {
        lock(&self.view).sort_key = sort_key;
    }

    /// POSIX-style path of the currently open folder.
    pub fn current_path(&self) -> String {
        let view = self.view();
        path_of(&self.collections.folders(), view.current_folder_id)
    }

    /// Subfolders of the current folder, filtered and sorted per the view
    /// state.
    pub fn visible_folders(&self) -> Vec<Folder> {
        let view = self.view();
        let folders: Vec<Folder> = self
            .collections
            .folders()
            .into_iter()
            .filter(|f| f.parent_id == view.current_folder_id)
            .collect();
        filter_and_sort(&folders, &view.search_query, view.sort_key)
    }

    /// Notes in the current folder, filtered and sorted per the view state.
    pub fn visible_notes(&self) -> Vec<Note> {
        let view = self.view();
        let notes: Vec<Note> = self
            .collections
            .notes()
            .into_iter()
            .filter(|n| n.folder_id == view.current_folder_id)
            .collect();
        filter_and_sort(&notes, &view.search_query, view.sort_key)
    }

    // ─── Sync bookkeeping ──────────────────────────────────────────────────

    /// Number of records awaiting a future remote sync (advisory).
    pub async fn pending_sync_count(&self) -> Result<usize> {
        self.store.list_pending_sync().await.map(|p| p.len())
    }
}
