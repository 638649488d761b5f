//! UUIDv7 identifiers for notarium records.
//!
//! UUIDv7 embeds a Unix timestamp (milliseconds) in the first 48 bits,
//! so identifiers sort in creation order without a separate sequence.

use uuid::Uuid;

/// Generate a new UUIDv7 identifier.
///
/// # Example
///
/// ```
/// use notarium_core::ids::new_v7;
///
/// let id = new_v7();
/// // IDs generated later will be lexicographically greater
/// ```
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}
