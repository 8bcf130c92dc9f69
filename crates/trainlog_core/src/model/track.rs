//! Recorded tracks and their location samples.
//!
//! # Invariants
//! - A `Track` owns its `LocationData` children: their lifecycle is tied to
//!   the track and they are stored as separate documents referenced by UUID,
//!   never as embedded blobs.
//! - A location sample that already exists in the datastore can never be
//!   claimed by a second new track.

use crate::model::ids::{new_record_id, RecordId};
use serde::{Deserialize, Serialize};

/// One GPS sample of a recorded track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationData {
    /// Stable record id.
    pub uuid: RecordId,
    /// Sample time in epoch milliseconds.
    pub timestamp: i64,
    pub latitude: f64,
    pub longitude: f64,
    /// Altitude in meters, when the provider reports one.
    pub altitude: Option<f64>,
    /// Momentary speed in km/h, when the provider reports one.
    pub speed: Option<f64>,
}

impl LocationData {
    /// Creates a location sample with a generated stable id.
    pub fn new(timestamp: i64, latitude: f64, longitude: f64) -> Self {
        Self {
            uuid: new_record_id(),
            timestamp,
            latitude,
            longitude,
            altitude: None,
            speed: None,
        }
    }
}

/// A recorded route with its ordered location samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Stable record id.
    pub uuid: RecordId,
    pub name: String,
    pub remarks: Option<String>,
    /// Recording start in epoch milliseconds.
    pub started_at: Option<i64>,
    /// Recording stop in epoch milliseconds.
    pub finished_at: Option<i64>,
    /// Owned samples in recording order.
    pub locations: Vec<LocationData>,
}

impl Track {
    /// Creates an empty track with a generated stable id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: new_record_id(),
            name: name.into(),
            remarks: None,
            started_at: None,
            finished_at: None,
            locations: Vec::new(),
        }
    }
}

/// Stored shape of a track: children referenced by UUID in sample order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TrackDocument {
    pub uuid: RecordId,
    pub name: String,
    pub remarks: Option<String>,
    pub started_at: Option<i64>,
    pub finished_at: Option<i64>,
    pub location_uuids: Vec<RecordId>,
}

impl From<&Track> for TrackDocument {
    fn from(track: &Track) -> Self {
        Self {
            uuid: track.uuid.clone(),
            name: track.name.clone(),
            remarks: track.remarks.clone(),
            started_at: track.started_at,
            finished_at: track.finished_at,
            location_uuids: track
                .locations
                .iter()
                .map(|location| location.uuid.clone())
                .collect(),
        }
    }
}
