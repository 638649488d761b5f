//! # notarium-store
//!
//! Persistence adapters for notarium.
//!
//! This crate provides:
//! - [`MemoryStore`]: in-memory adapter (the array-backed stub variant)
//! - [`SqliteStore`]: embedded SQLite adapter via sqlx
//!
//! Both implement the [`Store`](notarium_core::Store) trait; the session
//! layer is written against the trait and never against a concrete adapter.
//!
//! ## Example
//!
//! ```rust,no_run
//! use notarium_store::SqliteStore;
//! use notarium_core::{Note, Store};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SqliteStore::open("notes.db").await?;
//!     store.save_note(&Note::new(None)).await?;
//!     Ok(())
//! }
//! ```

pub mod memory;
pub mod sqlite;


// Re-export core types
pub use notarium_core::*;

// Re-export adapters at crate root
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
