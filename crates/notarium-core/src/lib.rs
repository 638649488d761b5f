//! # notarium-core
//!
//! Core types, traits, and abstractions for the notarium library.
//!
//! This crate provides the foundational data structures and trait definitions
//! that other notarium crates depend on.

pub mod defaults;
pub mod error;
pub mod ids;
pub mod listing;
pub mod logging;
pub mod models;
pub mod traits;
pub mod tree;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use ids::new_v7;
pub use listing::{filter_and_sort, Listed, SortKey};
pub use models::*;
pub use traits::*;
pub use tree::path_of;
