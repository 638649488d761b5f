//! Embedded SQLite persistence adapter.
//!
//! The bundled-database variant of the store. The schema is created
//! idempotently on connect; saves are id-keyed upserts.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::{debug, info};
use uuid::Uuid;

use notarium_core::{Error, Folder, Note, PendingSync, Result, Store};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS folder (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    parent_id   TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    sync_status TEXT NOT NULL DEFAULT 'pending'
);

CREATE TABLE IF NOT EXISTS note (
    id          TEXT PRIMARY KEY,
    folder_id   TEXT,
    title       TEXT NOT NULL,
    content     TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    sync_status TEXT NOT NULL DEFAULT 'pending'
);

CREATE INDEX IF NOT EXISTS idx_note_folder ON note(folder_id);
"#;

/// SQLite implementation of [`Store`].
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect using a SQLite URL (e.g. `sqlite://notes.db`, `sqlite::memory:`).
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(Error::Database)?
            .create_if_missing(true);
        Self::with_options(options).await
    }

    /// Open (creating if missing) a database file at the given path.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        Self::with_options(options).await
    }

    /// Fresh in-memory database, mostly for tests.
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:").await
    }

    async fn with_options(options: SqliteConnectOptions) -> Result<Self> {
        // One connection: an in-memory URL opens a distinct database per
        // connection, and the app is a single cooperative writer anyway.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(Error::Database)?;

        sqlx::raw_sql(SCHEMA)
            .execute(&pool)
            .await
            .map_err(Error::Database)?;

        info!(subsystem = "store", component = "sqlite", "schema ready");
        Ok(Self { pool })
    }
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| Error::Serialization(format!("invalid id {raw}: {e}")))
}

fn parse_optional_id(raw: Option<String>) -> Result<Option<Uuid>> {
    raw.as_deref().map(parse_id).transpose()
}

fn folder_from_row(row: &SqliteRow) -> Result<Folder> {
    Ok(Folder {
        id: parse_id(row.get("id"))?,
        name: row.get("name"),
        parent_id: parse_optional_id(row.get("parent_id"))?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        sync_status: row.get::<String, _>("sync_status").parse()?,
    })
}

fn note_from_row(row: &SqliteRow) -> Result<Note> {
    Ok(Note {
        id: parse_id(row.get("id"))?,
        folder_id: parse_optional_id(row.get("folder_id"))?,
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        sync_status: row.get::<String, _>("sync_status").parse()?,
    })
}

#[async_trait]
impl Store for SqliteStore {
    async fn list_folders(&self) -> Result<Vec<Folder>> {
        let rows = sqlx::query(
            "SELECT id, name, parent_id, created_at, updated_at, sync_status FROM folder",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter().map(folder_from_row).collect()
    }

    async fn list_notes(&self) -> Result<Vec<Note>> {
        let rows = sqlx::query(
            "SELECT id, folder_id, title, content, created_at, updated_at, sync_status FROM note",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter().map(note_from_row).collect()
    }

    async fn save_folder(&self, folder: &Folder) -> Result<()> {
        sqlx::query(
            "INSERT INTO folder (id, name, parent_id, created_at, updated_at, sync_status)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 parent_id = excluded.parent_id,
                 updated_at = excluded.updated_at,
                 sync_status = excluded.sync_status",
        )
        .bind(folder.id.to_string())
        .bind(&folder.name)
        .bind(folder.parent_id.map(|id| id.to_string()))
        .bind(folder.created_at)
        .bind(folder.updated_at)
        .bind(folder.sync_status.as_str())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(subsystem = "store", component = "sqlite", folder_id = %folder.id, op = "save_folder");
        Ok(())
    }

    async fn save_note(&self, note: &Note) -> Result<()> {
        sqlx::query(
            "INSERT INTO note (id, folder_id, title, content, created_at, updated_at, sync_status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT(id) DO UPDATE SET
                 folder_id = excluded.folder_id,
                 title = excluded.title,
                 content = excluded.content,
                 updated_at = excluded.updated_at,
                 sync_status = excluded.sync_status",
        )
        .bind(note.id.to_string())
        .bind(note.folder_id.map(|id| id.to_string()))
        .bind(&note.title)
        .bind(&note.content)
        .bind(note.created_at)
        .bind(note.updated_at)
        .bind(note.sync_status.as_str())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(subsystem = "store", component = "sqlite", note_id = %note.id, op = "save_note");
        Ok(())
    }

    async fn delete_folder(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM folder WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn delete_note(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM note WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn list_pending_sync(&self) -> Result<PendingSync> {
        let folder_rows = sqlx::query(
            "SELECT id, name, parent_id, created_at, updated_at, sync_status
             FROM folder WHERE sync_status = 'pending'",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let note_rows = sqlx::query(
            "SELECT id, folder_id, title, content, created_at, updated_at, sync_status
             FROM note WHERE sync_status = 'pending'",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(PendingSync {
            folders: folder_rows
                .iter()
                .map(folder_from_row)
                .collect::<Result<_>>()?,
            notes: note_rows.iter().map(note_from_row).collect::<Result<_>>()?,
        })
    }

    async fn mark_folder_synced(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE folder SET sync_status = 'synced' WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn mark_note_synced(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE note SET sync_status = 'synced' WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let store = SqliteStore::in_memory().await.unwrap();
        // Re-running the schema must not fail on the live connection.
        sqlx::raw_sql(SCHEMA).execute(&store.pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_open_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.db");
        let store = SqliteStore::open(&path).await.unwrap();

        let note = Note::new(None);
        store.save_note(&note).await.unwrap();
        assert!(path.exists());
    }
}
