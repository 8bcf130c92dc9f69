//! Training type reference data and completed training records.
//!
//! # Invariants
//! - `TrainingType::name` is unique in the datastore.
//! - Training types are insert/update-only reference data.
//! - A `Training` may reference a training type and a track by UUID; both
//!   references are non-owning and must exist before the training is written.

use crate::model::ids::{new_record_id, RecordId};
use serde::{Deserialize, Serialize};

/// The kind of a training session (running, biking, hiking, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingType {
    /// Stable record id.
    pub uuid: RecordId,
    /// Unique name, also the defensive rollback key of this type.
    pub name: String,
    pub remarks: Option<String>,
    /// Image resource shown by UI layers.
    pub image_name: Option<String>,
    /// Typical speed in km/h, used to suggest a type from recorded data.
    pub speed: f64,
}

impl TrainingType {
    /// Creates a training type with a generated stable id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: new_record_id(),
            name: name.into(),
            remarks: None,
            image_name: None,
            speed: 0.0,
        }
    }
}

/// A completed training session.
///
/// References are held as UUIDs only; the referenced records keep their own
/// lifecycle and are never touched when a training is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Training {
    /// Stable record id.
    pub uuid: RecordId,
    pub name: String,
    pub remarks: Option<String>,
    /// Date of the session in epoch milliseconds.
    pub training_date: Option<i64>,
    pub duration_seconds: Option<i64>,
    pub distance_meters: Option<f64>,
    /// Average speed in km/h.
    pub average_speed: Option<f64>,
    /// Total climb in meters.
    pub altitude_difference: Option<f64>,
    /// Reference to an existing `TrainingType`.
    pub training_type_uuid: Option<RecordId>,
    /// Reference to an existing `Track`.
    pub track_uuid: Option<RecordId>,
}

impl Training {
    /// Creates a training with a generated stable id and no references.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: new_record_id(),
            name: name.into(),
            remarks: None,
            training_date: None,
            duration_seconds: None,
            distance_meters: None,
            average_speed: None,
            altitude_difference: None,
            training_type_uuid: None,
            track_uuid: None,
        }
    }
}
