//! User profile record.
//!
//! # Invariants
//! - One user per installation; `email_address` is unique in the datastore.
//!   Uniqueness is enforced by the repository layer, not the store.

use crate::model::ids::{new_record_id, RecordId};
use serde::{Deserialize, Serialize};

/// Biological gender, used for max-pulse estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Undefined,
    Diverse,
    Male,
    Female,
}

/// Self-assessed fitness level driving plan template suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingLevel {
    Beginner,
    Amateur,
    Professional,
}

/// The local user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Stable record id.
    pub uuid: RecordId,
    /// Unique contact address of the installation owner.
    pub email_address: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Birthday in epoch milliseconds.
    pub birthday: Option<i64>,
    pub gender: Gender,
    pub training_level: TrainingLevel,
    /// Maximum heart rate in beats per minute.
    pub max_pulse: Option<u32>,
}

impl User {
    /// Creates a user profile with a generated stable id and defaults.
    pub fn new(email_address: impl Into<String>) -> Self {
        Self {
            uuid: new_record_id(),
            email_address: email_address.into(),
            first_name: None,
            last_name: None,
            birthday: None,
            gender: Gender::Undefined,
            training_level: TrainingLevel::Beginner,
            max_pulse: None,
        }
    }
}
