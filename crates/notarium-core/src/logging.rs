//! Structured logging schema and field name constants for notarium.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized names across every
//! subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded behavior, requires attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events, operation completions |
//! | DEBUG | Decision points, intermediate values |
//! | TRACE | Per-item iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "session", "store", "ingest", "inference"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "mutation_queue", "router", "sqlite", "gemini"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "flush", "queue_update", "receive", "query"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Note UUID being operated on.
pub const NOTE_ID: &str = "note_id";

/// Folder UUID being operated on.
pub const FOLDER_ID: &str = "folder_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of pending entries in the mutation queue.
pub const PENDING_COUNT: &str = "pending_count";

/// Number of records saved in a flush batch.
pub const SAVED_COUNT: &str = "saved_count";

/// Number of records skipped (deleted mid-flight) in a flush batch.
pub const SKIPPED_COUNT: &str = "skipped_count";

/// Number of records whose durable save failed in a flush batch.
pub const FAILED_COUNT: &str = "failed_count";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Generation model slug.
pub const MODEL: &str = "model";

/// Byte length of an assembled prompt.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a model response.
pub const RESPONSE_LEN: &str = "response_len";

/// Number of notes supplied as query context.
pub const CONTEXT_NOTES: &str = "context_notes";
