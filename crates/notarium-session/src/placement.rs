//! Placement of reviewed incoming content into the note model.
//!
//! Both operations consume the router's pending slot and, on success, take
//! the app out of reviewing mode back to the default listing.

use tracing::info;
use uuid::Uuid;

use notarium_core::{defaults, Error, Note, NotePatch, Result};

use crate::session::Session;
use crate::state::{lock, Screen};

impl Session {
    /// Save the pending incoming content as a new note in `folder_id`.
    ///
    /// The share's title hint names the note when present, otherwise the
    /// fixed shared-content label. Returns the new note's id.
    pub async fn save_shared_as_new_note(&self, folder_id: Option<Uuid>) -> Result<Uuid> {
        let shared = self
            .router
            .pending()
            .ok_or_else(|| Error::InvalidInput("no incoming content pending".into()))?;

        let title = shared
            .title
            .as_deref()
            .unwrap_or(defaults::SHARED_NOTE_TITLE);
        let note = Note::with_content(folder_id, title, &shared.content);
        let id = note.id;

        self.collections().insert_note(note.clone());
        self.store().save_note(&note).await?;

        self.router.clear_pending();
        self.leave_placement();
        info!(subsystem = "ingest", op = "save_as_new_note", note_id = %id);
        Ok(id)
    }

    /// Append the pending incoming content to an existing note.
    ///
    /// Fails with [`Error::NoteNotFound`] — touching nothing — when the id
    /// does not resolve. Non-empty existing content gets the separator
    /// before the appended text; empty content is replaced verbatim.
    pub async fn append_shared_to_note(&self, note_id: Uuid) -> Result<()> {
        let shared = self
            .router
            .pending()
            .ok_or_else(|| Error::InvalidInput("no incoming content pending".into()))?;

        let existing = self
            .collections()
            .note(note_id)
            .ok_or(Error::NoteNotFound(note_id))?;

        let new_content = if existing.content.is_empty() {
            shared.content.clone()
        } else {
            format!(
                "{}{}{}",
                existing.content,
                defaults::APPEND_SEPARATOR,
                shared.content
            )
        };

        self.update_note_immediate(note_id, NotePatch::content(new_content))
            .await?;

        self.router.clear_pending();
        self.leave_placement();
        info!(subsystem = "ingest", op = "append_to_note", note_id = %note_id);
        Ok(())
    }

    /// Dismiss the pending content without placing it.
    pub fn dismiss_shared(&self) {
        self.router.clear_pending();
        self.leave_placement();
    }

    fn leave_placement(&self) {
        let mut view = lock(self.view_state());
        if view.screen == Screen::SharePlacement {
            view.screen = Screen::NotesList;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingStore;
    use notarium_core::Store;
    use std::sync::Arc;

    fn session_with_share(raw: &str) -> (Arc<RecordingStore>, Session) {
        let store = Arc::new(RecordingStore::new());
        let session = Session::new(Arc::clone(&store) as Arc<dyn Store>);
        assert!(session.receive_shared(raw));
        (store, session)
    }

    #[tokio::test]
    async fn test_save_as_new_note_default_title() {
        let (store, session) = session_with_share("B");
        let id = session.save_shared_as_new_note(None).await.unwrap();

        let note = session.note(id).unwrap();
        assert_eq!(note.title, "Shared Content");
        assert_eq!(note.content, "B");
        assert_eq!(store.note_saves().len(), 1);

        // Out of reviewing mode, back on the listing.
        assert!(!session.is_reviewing_shared());
        assert_eq!(session.view().screen, Screen::NotesList);
    }

    #[tokio::test]
    async fn test_save_as_new_note_uses_title_hint() {
        let (_store, session) =
            session_with_share("notarium://share?text=clipped%20text&title=Recipe");
        let id = session.save_shared_as_new_note(None).await.unwrap();

        let note = session.note(id).unwrap();
        assert_eq!(note.title, "Recipe");
        assert_eq!(note.content, "clipped text");
    }

    #[tokio::test]
    async fn test_save_as_new_note_into_folder() {
        let (_store, session) = session_with_share("body");
        let folder = session.create_folder("Inbox", None).await.unwrap().unwrap();
        let id = session.save_shared_as_new_note(Some(folder)).await.unwrap();
        assert_eq!(session.note(id).unwrap().folder_id, Some(folder));
    }

    #[tokio::test]
    async fn test_append_uses_separator_for_nonempty_content() {
        let (_store, session) = session_with_share("B");
        let id = session.create_note(None).await.unwrap();
        session
            .update_note_immediate(id, NotePatch::content("A"))
            .await
            .unwrap();

        session.append_shared_to_note(id).await.unwrap();
        assert_eq!(session.note(id).unwrap().content, "A\n\n---\nB");
    }

    #[tokio::test]
    async fn test_append_to_empty_note_is_verbatim() {
        let (_store, session) = session_with_share("B");
        let id = session.create_note(None).await.unwrap();

        session.append_shared_to_note(id).await.unwrap();
        assert_eq!(session.note(id).unwrap().content, "B");
        assert!(!session.is_reviewing_shared());
    }

    #[tokio::test]
    async fn test_append_unknown_note_reports_and_keeps_slot() {
        let (store, session) = session_with_share("B");
        let saves_before = store.note_save_count();

        let err = session
            .append_shared_to_note(Uuid::nil())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoteNotFound(_)));

        // Nothing mutated; the content is still pending for another try.
        assert_eq!(store.note_save_count(), saves_before);
        assert!(session.is_reviewing_shared());
        assert_eq!(session.view().screen, Screen::SharePlacement);
    }

    #[tokio::test]
    async fn test_placement_without_pending_content_errors() {
        let store = Arc::new(RecordingStore::new());
        let session = Session::new(store as Arc<dyn Store>);
        let err = session.save_shared_as_new_note(None).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_dismiss_clears_slot_and_returns_to_listing() {
        let (_store, session) = session_with_share("unwanted");
        session.dismiss_shared();
        assert!(!session.is_reviewing_shared());
        assert_eq!(session.view().screen, Screen::NotesList);
        // The latch stays consumed for this session.
        assert!(!session.receive_shared("again"));
    }
}
