//! # notarium-inference
//!
//! Generative-language query backend abstraction for notarium.
//!
//! This crate provides:
//! - [`GeminiBackend`]: client for the generativelanguage `generateContent`
//!   API, answering questions grounded in a supplied set of notes
//! - [`mock::MockQueryBackend`]: scripted backend for tests
//!
//! The ingestion/mutation core has no dependency on this crate; the query
//! feature lives in its own failure domain.
//!
//! # Example
//!
//! ```rust,no_run
//! use notarium_inference::GeminiBackend;
//! use notarium_core::{NoteContext, QueryBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = GeminiBackend::from_env()?;
//!     let notes = vec![NoteContext { title: "Trip".into(), content: "Flight at 9am".into() }];
//!     let answer = backend.query_with_notes("When is the flight?", &notes).await?;
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```

pub mod gemini;
pub mod mock;

// Re-export core types
pub use notarium_core::{KeyCheck, NoteContext, QueryBackend};

pub use gemini::{build_prompt, GeminiBackend};
