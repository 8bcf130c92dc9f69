//! Record dispatch metadata for the persistence layer.
//!
//! # Responsibility
//! - Enumerate every persisted record type together with its collection name
//!   and identity key strategy.
//! - Wrap concrete records in one `Record` value the repository façade can
//!   route to the matching cascade handler.
//!
//! # Invariants
//! - `MovementType` identity is the business `key`; `TrainingType` falls back
//!   to `name` during rollback; every other type is identified by `uuid`.
//! - Child-only types (`LocationData`, `RunningPlanEntry`, `RunningUnit`)
//!   never accept direct writes through the façade.

use crate::model::movement::MovementType;
use crate::model::plan::{RunningPlan, RunningPlanEntry, RunningUnit};
use crate::model::track::{LocationData, Track};
use crate::model::training::{Training, TrainingType};
use crate::model::user::User;
use std::fmt::{Display, Formatter};

/// Every record type managed by the datastore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    User,
    TrainingType,
    MovementType,
    LocationData,
    Track,
    Training,
    RunningUnit,
    RunningPlanEntry,
    RunningPlan,
}

impl RecordType {
    /// All managed types, in the order `clear_all` visits them.
    pub const ALL: [RecordType; 9] = [
        RecordType::LocationData,
        RecordType::MovementType,
        RecordType::RunningPlan,
        RecordType::RunningPlanEntry,
        RecordType::RunningUnit,
        RecordType::Track,
        RecordType::Training,
        RecordType::TrainingType,
        RecordType::User,
    ];

    /// Store collection holding records of this type.
    pub fn collection(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::TrainingType => "training_types",
            Self::MovementType => "movement_types",
            Self::LocationData => "location_data",
            Self::Track => "tracks",
            Self::Training => "trainings",
            Self::RunningUnit => "running_units",
            Self::RunningPlanEntry => "running_plan_entries",
            Self::RunningPlan => "running_plans",
        }
    }

    /// Document field used for identity lookups of this type.
    pub fn key_field(self) -> &'static str {
        match self {
            // movement types carry a unique business key
            Self::MovementType => "key",
            _ => "uuid",
        }
    }

    /// Document field used when rolling back an aborted cascade.
    ///
    /// Training types are keyed by their unique name here so a rollback can
    /// still address them when the uuid cannot be resolved.
    pub fn rollback_key_field(self) -> &'static str {
        match self {
            Self::MovementType => "key",
            Self::TrainingType => "name",
            _ => "uuid",
        }
    }

    /// Whether the façade accepts this type in `add`/`update`/`delete`.
    ///
    /// Child-only types are written exclusively through their owning parent.
    pub fn supports_direct_writes(self) -> bool {
        !matches!(
            self,
            Self::LocationData | Self::RunningPlanEntry | Self::RunningUnit
        )
    }

    /// Stable lowercase name used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::TrainingType => "training_type",
            Self::MovementType => "movement_type",
            Self::LocationData => "location_data",
            Self::Track => "track",
            Self::Training => "training",
            Self::RunningUnit => "running_unit",
            Self::RunningPlanEntry => "running_plan_entry",
            Self::RunningPlan => "running_plan",
        }
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One concrete record handed to or returned by the repository façade.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    User(User),
    TrainingType(TrainingType),
    MovementType(MovementType),
    LocationData(LocationData),
    Track(Track),
    Training(Training),
    RunningUnit(RunningUnit),
    RunningPlanEntry(RunningPlanEntry),
    RunningPlan(RunningPlan),
}

impl Record {
    /// The type tag of this record.
    pub fn record_type(&self) -> RecordType {
        match self {
            Self::User(_) => RecordType::User,
            Self::TrainingType(_) => RecordType::TrainingType,
            Self::MovementType(_) => RecordType::MovementType,
            Self::LocationData(_) => RecordType::LocationData,
            Self::Track(_) => RecordType::Track,
            Self::Training(_) => RecordType::Training,
            Self::RunningUnit(_) => RecordType::RunningUnit,
            Self::RunningPlanEntry(_) => RecordType::RunningPlanEntry,
            Self::RunningPlan(_) => RecordType::RunningPlan,
        }
    }

    /// The generated stable id of this record.
    pub fn uuid(&self) -> &str {
        match self {
            Self::User(user) => &user.uuid,
            Self::TrainingType(training_type) => &training_type.uuid,
            Self::MovementType(movement_type) => &movement_type.uuid,
            Self::LocationData(location) => &location.uuid,
            Self::Track(track) => &track.uuid,
            Self::Training(training) => &training.uuid,
            Self::RunningUnit(unit) => &unit.uuid,
            Self::RunningPlanEntry(entry) => &entry.uuid,
            Self::RunningPlan(plan) => &plan.uuid,
        }
    }

    /// The identity value matching `RecordType::key_field`.
    pub fn identity(&self) -> &str {
        match self {
            Self::MovementType(movement_type) => &movement_type.key,
            other => other.uuid(),
        }
    }
}

impl From<User> for Record {
    fn from(value: User) -> Self {
        Self::User(value)
    }
}

impl From<TrainingType> for Record {
    fn from(value: TrainingType) -> Self {
        Self::TrainingType(value)
    }
}

impl From<MovementType> for Record {
    fn from(value: MovementType) -> Self {
        Self::MovementType(value)
    }
}

impl From<LocationData> for Record {
    fn from(value: LocationData) -> Self {
        Self::LocationData(value)
    }
}

impl From<Track> for Record {
    fn from(value: Track) -> Self {
        Self::Track(value)
    }
}

impl From<Training> for Record {
    fn from(value: Training) -> Self {
        Self::Training(value)
    }
}

impl From<RunningUnit> for Record {
    fn from(value: RunningUnit) -> Self {
        Self::RunningUnit(value)
    }
}

impl From<RunningPlanEntry> for Record {
    fn from(value: RunningPlanEntry) -> Self {
        Self::RunningPlanEntry(value)
    }
}

impl From<RunningPlan> for Record {
    fn from(value: RunningPlan) -> Self {
        Self::RunningPlan(value)
    }
}
