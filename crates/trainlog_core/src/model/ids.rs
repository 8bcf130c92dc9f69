//! Record identifier generation.
//!
//! # Invariants
//! - Identifiers are 15 uppercase hex characters taken from a random
//!   128-bit value; collisions are treated as practically impossible.
//! - An identifier never changes for the lifetime of its record.

use uuid::Uuid;

/// Stable identifier for every persisted record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type RecordId = String;

const RECORD_ID_LEN: usize = 15;

/// Generates a fresh record identifier.
pub fn new_record_id() -> RecordId {
    let raw = Uuid::new_v4().simple().to_string().to_uppercase();
    raw[..RECORD_ID_LEN].to_string()
}
