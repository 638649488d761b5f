//! Debounced note-mutation queue.
//!
//! Coalesces rapid successive edits to a note's fields into infrequent
//! durable writes while keeping the in-memory read model immediately
//! consistent. One shared timer multiplexes all notes: any queued edit
//! restarts it, so an edit to note B delays note A's pending flush. That is
//! the documented policy, pinned by tests, and it requires [`MutationQueue::flush`]
//! to be invoked before process teardown.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use notarium_core::{defaults, Error, Note, NotePatch, Result, Store};

use crate::state::{lock, Collections};

/// Counters for one flush batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushOutcome {
    /// Pending entries durably saved.
    pub saved: usize,
    /// Pending entries whose note was deleted before the flush.
    pub skipped: usize,
    /// Pending entries whose durable save failed; the fields are dropped,
    /// not re-queued, and the in-memory state keeps the attempted change.
    pub failed: usize,
}

impl FlushOutcome {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    pub fn total(&self) -> usize {
        self.saved + self.skipped + self.failed
    }
}

#[derive(Default)]
struct Inner {
    pending: HashMap<Uuid, NotePatch>,
    timer: Option<JoinHandle<()>>,
    /// Monotonic stamp distinguishing the live timer from superseded ones
    /// that already woke and are racing their own abort.
    timer_gen: u64,
    flushing: bool,
}

struct Shared {
    collections: Arc<Collections>,
    store: Arc<dyn Store>,
    delay: Duration,
    inner: Mutex<Inner>,
}

/// Buffers per-note partial updates and flushes them after a debounce
/// window, on an explicit call, or at teardown.
pub struct MutationQueue {
    shared: Arc<Shared>,
}

impl MutationQueue {
    pub fn new(collections: Arc<Collections>, store: Arc<dyn Store>) -> Self {
        Self::with_delay(collections, store, defaults::DEBOUNCE)
    }

    pub fn with_delay(
        collections: Arc<Collections>,
        store: Arc<dyn Store>,
        delay: Duration,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                collections,
                store,
                delay,
                inner: Mutex::new(Inner::default()),
            }),
        }
    }

    /// Merge an edit into the in-memory note now; buffer the durable write.
    ///
    /// Returns the fully-merged record, or `None` when the id is unknown
    /// (the patch is still buffered; the flush skips it if the note never
    /// appears).
    pub fn queue_update(&self, id: Uuid, patch: NotePatch) -> Option<Note> {
        let merged = self.shared.collections.apply_note_patch(id, &patch);

        let mut inner = lock(&self.shared.inner);
        match inner.pending.get_mut(&id) {
            Some(existing) => existing.merge_from(&patch),
            None => {
                inner.pending.insert(id, patch);
            }
        }
        debug!(
            subsystem = "session",
            component = "mutation_queue",
            op = "queue_update",
            note_id = %id,
            pending_count = inner.pending.len(),
        );
        Shared::arm_timer(&self.shared, &mut inner);
        merged
    }

    /// Durably persist all pending edits.
    ///
    /// No-op when a flush is already in progress or nothing is pending.
    /// Individual save failures are logged and counted, never propagated.
    pub async fn flush(&self) -> FlushOutcome {
        Shared::flush(&self.shared).await
    }

    /// Persist a note mutation right away, superseding any pending entry
    /// for the same id.
    ///
    /// The caller awaits the durable write; a store failure propagates, but
    /// the in-memory state already reflects the change and is not rolled
    /// back.
    pub async fn update_immediate(&self, id: Uuid, patch: NotePatch) -> Result<Note> {
        {
            let mut inner = lock(&self.shared.inner);
            inner.pending.remove(&id);
            if inner.pending.is_empty() {
                Shared::cancel_timer(&mut inner);
            }
        }

        let merged = self
            .shared
            .collections
            .apply_note_patch(id, &patch)
            .ok_or(Error::NoteNotFound(id))?;
        self.shared.store.save_note(&merged).await?;
        Ok(merged)
    }

    /// Drop queued fields for a note that is being deleted.
    pub fn discard_pending(&self, id: Uuid) {
        let mut inner = lock(&self.shared.inner);
        inner.pending.remove(&id);
        if inner.pending.is_empty() {
            Shared::cancel_timer(&mut inner);
        }
    }

    /// Number of notes with buffered edits.
    pub fn pending_len(&self) -> usize {
        lock(&self.shared.inner).pending.len()
    }

    pub fn has_pending(&self, id: Uuid) -> bool {
        lock(&self.shared.inner).pending.contains_key(&id)
    }
}

impl Shared {
    fn cancel_timer(inner: &mut Inner) {
        if let Some(timer) = inner.timer.take() {
            timer.abort();
        }
        inner.timer_gen += 1;
    }

    /// Restart the single shared timer. Any previously armed timer is
    /// superseded, whichever note it was armed for.
    fn arm_timer(shared: &Arc<Shared>, inner: &mut Inner) {
        Self::cancel_timer(inner);
        let generation = inner.timer_gen;
        let shared = Arc::clone(shared);
        inner.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(shared.delay).await;
            {
                let mut inner = lock(&shared.inner);
                if inner.timer_gen != generation {
                    // Superseded between waking and locking.
                    return;
                }
                // Detach before flushing so the flush's own timer
                // cancellation cannot abort this running task.
                inner.timer = None;
            }
            Shared::flush(&shared).await;
        }));
    }

    async fn flush(shared: &Arc<Shared>) -> FlushOutcome {
        let snapshot = {
            let mut inner = lock(&shared.inner);
            if inner.flushing || inner.pending.is_empty() {
                return FlushOutcome::default();
            }
            Self::cancel_timer(&mut inner);
            // Guard and snapshot are taken under the same lock, before any
            // await: updates arriving during the flush start a fresh batch.
            inner.flushing = true;
            std::mem::take(&mut inner.pending)
        };

        let mut outcome = FlushOutcome::default();
        for (id, patch) in snapshot {
            match shared.collections.apply_note_patch(id, &patch) {
                Some(note) => match shared.store.save_note(&note).await {
                    Ok(()) => outcome.saved += 1,
                    Err(err) => {
                        warn!(
                            subsystem = "session",
                            component = "mutation_queue",
                            note_id = %id,
                            error = %err,
                            "durable save failed; edit kept in memory only"
                        );
                        outcome.failed += 1;
                    }
                },
                None => {
                    debug!(
                        subsystem = "session",
                        component = "mutation_queue",
                        note_id = %id,
                        "note deleted before flush; skipping"
                    );
                    outcome.skipped += 1;
                }
            }
        }

        lock(&shared.inner).flushing = false;
        info!(
            subsystem = "session",
            component = "mutation_queue",
            op = "flush",
            saved_count = outcome.saved,
            skipped_count = outcome.skipped,
            failed_count = outcome.failed,
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingStore;
    use tokio::time::sleep;

    fn fixture() -> (Arc<Collections>, Arc<RecordingStore>, MutationQueue) {
        let collections = Arc::new(Collections::new());
        let store = Arc::new(RecordingStore::new());
        let queue = MutationQueue::new(
            Arc::clone(&collections),
            Arc::clone(&store) as Arc<dyn Store>,
        );
        (collections, store, queue)
    }

    fn seeded_note(collections: &Collections) -> Note {
        let note = Note::new(None);
        collections.insert_note(note.clone());
        note
    }

    #[tokio::test(start_paused = true)]
    async fn test_coalescing_one_save_per_window() {
        let (collections, store, queue) = fixture();
        let note = seeded_note(&collections);

        queue.queue_update(note.id, NotePatch::title("draft"));
        queue.queue_update(note.id, NotePatch::content("hello"));
        queue.queue_update(note.id, NotePatch::content("hello world"));

        assert_eq!(store.note_save_count(), 0);
        sleep(Duration::from_millis(600)).await;

        let saves = store.note_saves();
        assert_eq!(saves.len(), 1);
        // Field-wise last-writer-wins merge of all three calls.
        assert_eq!(saves[0].title, "draft");
        assert_eq!(saves[0].content, "hello world");
        assert_eq!(queue.pending_len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_visibility_before_durable_write() {
        let (collections, store, queue) = fixture();
        let note = seeded_note(&collections);

        queue.queue_update(note.id, NotePatch::content("typed"));

        // Durable write has not happened yet, but readers see the edit.
        assert_eq!(store.note_save_count(), 0);
        assert_eq!(collections.note(note.id).unwrap().content, "typed");
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_is_idempotent() {
        let (collections, store, queue) = fixture();
        let note = seeded_note(&collections);

        queue.queue_update(note.id, NotePatch::content("x"));
        let first = queue.flush().await;
        let second = queue.flush().await;

        assert_eq!(first.saved, 1);
        assert_eq!(second, FlushOutcome::default());
        assert_eq!(store.note_save_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_flush_beats_the_timer() {
        let (collections, store, queue) = fixture();
        let note = seeded_note(&collections);

        queue.queue_update(note.id, NotePatch::content("X"));
        // Simulated teardown: explicit flush well inside the debounce window.
        let outcome = queue.flush().await;

        assert_eq!(outcome.saved, 1);
        let saves = store.note_saves();
        assert_eq!(saves[0].id, note.id);
        assert_eq!(saves[0].content, "X");

        // The timer was cancelled with the batch; nothing fires later.
        sleep(Duration::from_millis(700)).await;
        assert_eq!(store.note_save_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shared_timer_resets_on_any_notes_edit() {
        let (collections, store, queue) = fixture();
        let a = seeded_note(&collections);
        let b = seeded_note(&collections);

        queue.queue_update(a.id, NotePatch::content("a1"));
        sleep(Duration::from_millis(300)).await;
        // B's edit restarts the single shared timer, delaying A's flush.
        queue.queue_update(b.id, NotePatch::content("b1"));

        sleep(Duration::from_millis(300)).await; // t = 600ms, past A's original window
        assert_eq!(store.note_save_count(), 0);

        sleep(Duration::from_millis(300)).await; // t = 900ms, past the restarted window
        assert_eq!(store.note_save_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_immediate_supersedes_pending_entry() {
        let (collections, store, queue) = fixture();
        let note = seeded_note(&collections);

        queue.queue_update(note.id, NotePatch::title("stale"));
        queue
            .update_immediate(note.id, NotePatch::title("final"))
            .await
            .unwrap();

        assert_eq!(store.note_save_count(), 1);
        assert!(!queue.has_pending(note.id));

        // No second write when the old window would have elapsed.
        sleep(Duration::from_millis(700)).await;
        assert_eq!(store.note_save_count(), 1);
        assert_eq!(store.note_saves()[0].title, "final");
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_immediate_unknown_note() {
        let (_collections, store, queue) = fixture();
        let err = queue
            .update_immediate(Uuid::nil(), NotePatch::content("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoteNotFound(_)));
        assert_eq!(store.note_save_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_skips_note_deleted_mid_window() {
        let (collections, store, queue) = fixture();
        let keep = seeded_note(&collections);
        let gone = seeded_note(&collections);

        queue.queue_update(keep.id, NotePatch::content("kept"));
        queue.queue_update(gone.id, NotePatch::content("lost"));
        collections.remove_note(gone.id);

        let outcome = queue.flush().await;
        assert_eq!(outcome.saved, 1);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(store.note_saves()[0].id, keep.id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_failure_is_counted_not_requeued() {
        let (collections, store, queue) = fixture();
        let note = seeded_note(&collections);

        queue.queue_update(note.id, NotePatch::content("doomed"));
        store.fail_note_saves(true);
        let outcome = queue.flush().await;

        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.saved, 0);
        // Not re-queued; the in-memory state still shows the edit.
        assert_eq!(queue.pending_len(), 0);
        assert_eq!(collections.note(note.id).unwrap().content, "doomed");

        // A later flush has nothing to do.
        store.fail_note_saves(false);
        assert_eq!(queue.flush().await, FlushOutcome::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_discard_pending_drops_fields() {
        let (collections, store, queue) = fixture();
        let note = seeded_note(&collections);

        queue.queue_update(note.id, NotePatch::content("x"));
        queue.discard_pending(note.id);

        sleep(Duration::from_millis(700)).await;
        assert_eq!(store.note_save_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_queued_patch_for_unknown_note_is_skipped() {
        let (_collections, store, queue) = fixture();
        assert!(queue
            .queue_update(Uuid::nil(), NotePatch::content("ghost"))
            .is_none());

        sleep(Duration::from_millis(700)).await;
        assert_eq!(store.note_save_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_payload_merges_against_current_note() {
        let (collections, store, queue) = fixture();
        let note = seeded_note(&collections);

        queue.queue_update(note.id, NotePatch::content("body"));
        // A field changed outside the queue (move) is still present in the
        // flushed record: the flush merges against the current note.
        collections.apply_note_patch(note.id, &NotePatch::title("renamed"));

        queue.flush().await;
        let saved = &store.note_saves()[0];
        assert_eq!(saved.content, "body");
        assert_eq!(saved.title, "renamed");
    }
}
