//! Centralized default constants for the notarium system.
//!
//! **This module is the single source of truth** for all shared default
//! values. Crates reference these constants instead of defining their own
//! magic numbers.

use std::time::Duration;

// =============================================================================
// NOTES
// =============================================================================

/// Placeholder title assigned to freshly created notes.
pub const UNTITLED_NOTE_TITLE: &str = "Untitled Note";

/// Default title for notes created from incoming shared content.
pub const SHARED_NOTE_TITLE: &str = "Shared Content";

/// Separator inserted between existing note content and appended shared
/// content. Omitted when the existing content is empty.
pub const APPEND_SEPARATOR: &str = "\n\n---\n";

// =============================================================================
// MUTATION QUEUE
// =============================================================================

/// Debounce window before coalesced note edits are durably persisted.
pub const DEBOUNCE_MS: u64 = 500;

/// Debounce window as a [`Duration`].
pub const DEBOUNCE: Duration = Duration::from_millis(DEBOUNCE_MS);

// =============================================================================
// INGESTION
// =============================================================================

/// Deep-link scheme the app registers with the OS.
pub const SHARE_SCHEME: &str = "notarium";

/// Deep-link host carrying shared text (`notarium://share?text=...`).
pub const SHARE_HOST: &str = "share";

// =============================================================================
// INFERENCE
// =============================================================================

/// Base URL of the generative-language API.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default generation model.
pub const GEN_MODEL: &str = "gemini-2.5-flash";

/// Timeout for generation requests (seconds).
pub const GEN_TIMEOUT_SECS: u64 = 60;

/// Maximum tokens requested per generated answer.
pub const GEN_MAX_OUTPUT_TOKENS: u32 = 1000;

/// Sampling temperature for answers.
pub const GEN_TEMPERATURE: f32 = 0.7;

/// Nucleus sampling cutoff.
pub const GEN_TOP_P: f32 = 0.8;

/// Top-k sampling cutoff.
pub const GEN_TOP_K: u32 = 40;

/// Per-note character budget when assembling query context.
pub const NOTE_CONTEXT_MAX_CHARS: usize = 500;
