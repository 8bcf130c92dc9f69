//! Running plans, their weekly entries and training units.
//!
//! # Invariants
//! - A `RunningPlan` owns its entries and each entry owns its units; the
//!   whole graph is stored as separate documents referenced by UUID.
//! - Every `RunningUnit` carries the movement type it trains; the movement
//!   type itself is shared reference data and auto-inserted on first use.
//! - `week` stays within 1..=52 and `day` within 1..=7; out-of-range input
//!   falls back to 1.

use crate::model::ids::{new_record_id, RecordId};
use crate::model::movement::MovementType;
use serde::{Deserialize, Serialize};

/// One training section of a plan entry, e.g. "2 min running".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningUnit {
    /// Stable record id.
    pub uuid: RecordId,
    /// Duration of the section in minutes.
    pub duration_minutes: u32,
    /// Set when the user finished this section.
    pub completed: bool,
    /// Movement trained in this section.
    pub movement_type: MovementType,
}

impl RunningUnit {
    /// Creates an open unit with a generated stable id.
    pub fn new(duration_minutes: u32, movement_type: MovementType) -> Self {
        Self {
            uuid: new_record_id(),
            duration_minutes,
            completed: false,
            movement_type,
        }
    }
}

/// One training day of a running plan.
///
/// Example: week 3, day 1 (Monday), units "2 min run, 3 min walk, 2 min run".
/// An entry cannot exist without its plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningPlanEntry {
    /// Stable record id.
    pub uuid: RecordId,
    /// Week number, starting at 1.
    pub week: u32,
    /// Day of week, 1 (Monday) through 7 (Sunday).
    pub day: u32,
    /// Owned units in training order.
    pub units: Vec<RunningUnit>,
}

impl RunningPlanEntry {
    /// Creates an entry, clamping out-of-range week/day values to 1.
    pub fn new(week: u32, day: u32, units: Vec<RunningUnit>) -> Self {
        Self {
            uuid: new_record_id(),
            week: if (1..=52).contains(&week) { week } else { 1 },
            day: if (1..=7).contains(&day) { day } else { 1 },
            units,
        }
    }
}

/// A multi-week training plan owning its entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningPlan {
    /// Stable record id.
    pub uuid: RecordId,
    pub name: String,
    pub remarks: Option<String>,
    /// Planned start in epoch milliseconds.
    pub start_date: Option<i64>,
    /// Position of this plan among all plans, used for ordered listings.
    pub order_number: u32,
    /// Set on bundled template plans that must survive resets.
    pub is_template: bool,
    /// Owned entries in schedule order.
    pub entries: Vec<RunningPlanEntry>,
}

impl RunningPlan {
    /// Creates a plan with a generated stable id and no entries.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: new_record_id(),
            name: name.into(),
            remarks: None,
            start_date: None,
            order_number: 0,
            is_template: false,
            entries: Vec::new(),
        }
    }
}

/// Stored shape of a running unit: movement type referenced by business key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RunningUnitDocument {
    pub uuid: RecordId,
    pub duration_minutes: u32,
    pub completed: bool,
    pub movement_type_key: String,
}

impl From<&RunningUnit> for RunningUnitDocument {
    fn from(unit: &RunningUnit) -> Self {
        Self {
            uuid: unit.uuid.clone(),
            duration_minutes: unit.duration_minutes,
            completed: unit.completed,
            movement_type_key: unit.movement_type.key.clone(),
        }
    }
}

/// Stored shape of a plan entry: units referenced by UUID in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RunningPlanEntryDocument {
    pub uuid: RecordId,
    pub week: u32,
    pub day: u32,
    pub unit_uuids: Vec<RecordId>,
}

impl From<&RunningPlanEntry> for RunningPlanEntryDocument {
    fn from(entry: &RunningPlanEntry) -> Self {
        Self {
            uuid: entry.uuid.clone(),
            week: entry.week,
            day: entry.day,
            unit_uuids: entry.units.iter().map(|unit| unit.uuid.clone()).collect(),
        }
    }
}

/// Stored shape of a plan: entries referenced by UUID in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RunningPlanDocument {
    pub uuid: RecordId,
    pub name: String,
    pub remarks: Option<String>,
    pub start_date: Option<i64>,
    pub order_number: u32,
    pub is_template: bool,
    pub entry_uuids: Vec<RecordId>,
}

impl From<&RunningPlan> for RunningPlanDocument {
    fn from(plan: &RunningPlan) -> Self {
        Self {
            uuid: plan.uuid.clone(),
            name: plan.name.clone(),
            remarks: plan.remarks.clone(),
            start_date: plan.start_date,
            order_number: plan.order_number,
            is_template: plan.is_template,
            entry_uuids: plan.entries.iter().map(|entry| entry.uuid.clone()).collect(),
        }
    }
}
