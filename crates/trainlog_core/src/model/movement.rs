//! Movement type reference data.
//!
//! # Invariants
//! - The short business `key` (e.g. "L" for running, "P" for pause) is the
//!   identity of a movement type in the datastore, not the generated UUID.
//! - Movement types are shared reference data: inserted and updated, never
//!   deleted outside of a cascade rollback.

use crate::model::ids::{new_record_id, RecordId};
use serde::{Deserialize, Serialize};

/// A kind of movement inside a running unit (run, walk, pause, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementType {
    /// Stable record id. Not used for identity lookups.
    pub uuid: RecordId,
    /// Unique business key, the identity of this record.
    pub key: String,
    /// Human-readable name.
    pub name: String,
    /// Display color name used by UI layers.
    pub color: Option<String>,
    /// Typical pace in km/h. Zero when unknown.
    pub pace: f64,
}

impl MovementType {
    /// Creates a movement type with a generated stable id.
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: new_record_id(),
            key: key.into(),
            name: name.into(),
            color: None,
            pace: 0.0,
        }
    }
}
