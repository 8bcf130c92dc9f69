//! Type-specific cascade handlers for multi-document writes.
//!
//! # Responsibility
//! - Decide insert/update/delete order for composite records and their
//!   owned children.
//! - Abort composite inserts on duplicate children and hand the undo lists
//!   to the rollback executor.
//!
//! # Invariants
//! - Composite INSERT is all-or-nothing; children written before a failure
//!   are rolled back before the error returns.
//! - Composite UPDATE upserts children without rollback; a partial update
//!   is reported, not reversed.
//! - Reference records (training type, track of a training; movement types
//!   of plan units) are never deleted by a cascade delete.

use crate::model::movement::MovementType;
use crate::model::plan::{
    RunningPlan, RunningPlanDocument, RunningPlanEntryDocument, RunningUnitDocument,
};
use crate::model::record::{Record, RecordType};
use crate::model::track::{Track, TrackDocument};
use crate::model::training::Training;
use crate::model::user::User;
use crate::repo::data_repo::{encode, DataRepository, RepoError, RepoResult};
use crate::repo::rollback::RollbackLog;
use serde_json::Value as JsonValue;

/// Undo lists of an aborted running plan insert, one per written type.
struct PlanUndo {
    entries: RollbackLog,
    units: RollbackLog,
    movement_types: RollbackLog,
}

impl PlanUndo {
    fn new() -> Self {
        Self {
            entries: RollbackLog::new(RecordType::RunningPlanEntry),
            units: RollbackLog::new(RecordType::RunningUnit),
            movement_types: RollbackLog::new(RecordType::MovementType),
        }
    }

    /// Reverses the aborted insert in reverse dependency order.
    fn execute(&self, repository: &DataRepository) {
        self.entries.execute(&repository.store);
        self.units.execute(&repository.store);
        self.movement_types.execute(&repository.store);
    }
}

impl DataRepository {
    pub(crate) fn insert_record(&self, record: &Record) -> RepoResult<()> {
        match record {
            Record::User(user) => self.insert_user(user),
            Record::TrainingType(training_type) => {
                self.insert_single(RecordType::TrainingType, &encode(training_type)?)
            }
            Record::MovementType(movement_type) => {
                self.insert_single(RecordType::MovementType, &encode(movement_type)?)
            }
            Record::Training(training) => self.insert_training(training),
            Record::Track(track) => self.insert_track(track),
            Record::RunningPlan(plan) => self.insert_running_plan(plan),
            Record::LocationData(_) | Record::RunningPlanEntry(_) | Record::RunningUnit(_) => {
                Err(RepoError::Unsupported(record.record_type()))
            }
        }
    }

    pub(crate) fn update_record(&self, record: &Record) -> RepoResult<()> {
        match record {
            Record::User(user) => {
                self.update_single(RecordType::User, &user.uuid, &encode(user)?)
            }
            Record::TrainingType(training_type) => self.update_single(
                RecordType::TrainingType,
                &training_type.uuid,
                &encode(training_type)?,
            ),
            Record::MovementType(movement_type) => self.update_single(
                RecordType::MovementType,
                &movement_type.key,
                &encode(movement_type)?,
            ),
            Record::Training(training) => self.update_training(training),
            Record::Track(track) => self.update_track(track),
            Record::RunningPlan(plan) => self.update_running_plan(plan),
            Record::LocationData(_) | Record::RunningPlanEntry(_) | Record::RunningUnit(_) => {
                Err(RepoError::Unsupported(record.record_type()))
            }
        }
    }

    pub(crate) fn delete_record(&self, record: &Record) -> RepoResult<()> {
        match record {
            Record::User(user) => self.remove_single(RecordType::User, &user.uuid),
            Record::Training(training) => {
                // referenced training type and track stay untouched
                self.remove_single(RecordType::Training, &training.uuid)
            }
            Record::Track(track) => self.delete_track(track),
            Record::RunningPlan(plan) => self.delete_running_plan(plan),
            // reference data; the façade skips these before dispatch
            Record::TrainingType(_) | Record::MovementType(_) => Ok(()),
            Record::LocationData(_) | Record::RunningPlanEntry(_) | Record::RunningUnit(_) => {
                Err(RepoError::Unsupported(record.record_type()))
            }
        }
    }

    /// Inserts the user profile, enforcing email uniqueness first.
    fn insert_user(&self, user: &User) -> RepoResult<()> {
        let filter = JsonValue::String(user.email_address.clone());
        let existing = self
            .store
            .find_where(RecordType::User.collection(), "email_address", &filter)?;
        if !existing.is_empty() {
            return Err(RepoError::AlreadyExists {
                record_type: RecordType::User,
                identity: user.email_address.clone(),
            });
        }
        self.insert_single(RecordType::User, &encode(user)?)
    }

    /// Inserts a training after validating its non-owning references.
    fn insert_training(&self, training: &Training) -> RepoResult<()> {
        self.validate_training_references(training)?;
        self.insert_single(RecordType::Training, &encode(training)?)
    }

    fn update_training(&self, training: &Training) -> RepoResult<()> {
        self.validate_training_references(training)?;
        self.update_single(RecordType::Training, &training.uuid, &encode(training)?)
    }

    /// Referenced records must pre-exist; nothing is auto-created.
    fn validate_training_references(&self, training: &Training) -> RepoResult<()> {
        if let Some(uuid) = &training.training_type_uuid {
            if !self.identity_exists(RecordType::TrainingType, uuid) {
                return Err(RepoError::DanglingReference {
                    record_type: RecordType::TrainingType,
                    identity: uuid.clone(),
                });
            }
        }
        if let Some(uuid) = &training.track_uuid {
            if !self.identity_exists(RecordType::Track, uuid) {
                return Err(RepoError::DanglingReference {
                    record_type: RecordType::Track,
                    identity: uuid.clone(),
                });
            }
        }
        Ok(())
    }

    /// Inserts all location samples, then the track document itself.
    fn insert_track(&self, track: &Track) -> RepoResult<()> {
        let mut undo = RollbackLog::new(RecordType::LocationData);
        match self.insert_track_graph(track, &mut undo) {
            Ok(()) => Ok(()),
            Err(err) => {
                undo.execute(&self.store);
                Err(err)
            }
        }
    }

    fn insert_track_graph(&self, track: &Track, undo: &mut RollbackLog) -> RepoResult<()> {
        for location in &track.locations {
            if self.identity_exists(RecordType::LocationData, &location.uuid) {
                // a stored sample cannot be claimed by a second new track
                return Err(RepoError::DuplicateChildRecord {
                    record_type: RecordType::LocationData,
                    identity: location.uuid.clone(),
                });
            }
            self.insert_single(RecordType::LocationData, &encode(location)?)?;
            undo.push(location.uuid.clone());
        }
        self.insert_single(RecordType::Track, &encode(&TrackDocument::from(track))?)
    }

    /// Upserts every location sample, then the track document. Not atomic.
    fn update_track(&self, track: &Track) -> RepoResult<()> {
        for location in &track.locations {
            let body = encode(location)?;
            if self.identity_exists(RecordType::LocationData, &location.uuid) {
                self.update_single(RecordType::LocationData, &location.uuid, &body)?;
            } else {
                self.insert_single(RecordType::LocationData, &body)?;
            }
        }
        self.update_single(
            RecordType::Track,
            &track.uuid,
            &encode(&TrackDocument::from(track))?,
        )
    }

    /// Deletes remaining location samples, then the track document.
    /// Samples already missing are skipped silently.
    fn delete_track(&self, track: &Track) -> RepoResult<()> {
        for location in &track.locations {
            if self.identity_exists(RecordType::LocationData, &location.uuid) {
                self.remove_single(RecordType::LocationData, &location.uuid)?;
            }
        }
        self.remove_single(RecordType::Track, &track.uuid)
    }

    /// Nested cascade: units of an entry, the entry, the next entry, ...,
    /// finally the plan document. Duplicate children abort the whole insert.
    fn insert_running_plan(&self, plan: &RunningPlan) -> RepoResult<()> {
        let mut undo = PlanUndo::new();
        match self.insert_running_plan_graph(plan, &mut undo) {
            Ok(()) => Ok(()),
            Err(err) => {
                undo.execute(self);
                Err(err)
            }
        }
    }

    fn insert_running_plan_graph(&self, plan: &RunningPlan, undo: &mut PlanUndo) -> RepoResult<()> {
        for entry in &plan.entries {
            if self.identity_exists(RecordType::RunningPlanEntry, &entry.uuid) {
                return Err(RepoError::DuplicateChildRecord {
                    record_type: RecordType::RunningPlanEntry,
                    identity: entry.uuid.clone(),
                });
            }
            for unit in &entry.units {
                if self.identity_exists(RecordType::RunningUnit, &unit.uuid) {
                    return Err(RepoError::DuplicateChildRecord {
                        record_type: RecordType::RunningUnit,
                        identity: unit.uuid.clone(),
                    });
                }
                self.insert_single(
                    RecordType::RunningUnit,
                    &encode(&RunningUnitDocument::from(unit))?,
                )?;
                undo.units.push(unit.uuid.clone());
                self.insert_movement_type_if_new(
                    &unit.movement_type,
                    Some(&mut undo.movement_types),
                )?;
            }
            self.insert_single(
                RecordType::RunningPlanEntry,
                &encode(&RunningPlanEntryDocument::from(entry))?,
            )?;
            undo.entries.push(entry.uuid.clone());
        }
        self.insert_single(
            RecordType::RunningPlan,
            &encode(&RunningPlanDocument::from(plan))?,
        )
    }

    /// Inserts new entries (cascading fresh units), updates existing ones in
    /// place with upserted units, then updates the plan document.
    ///
    /// Unlike insert there is no rollback here: a failure leaves the already
    /// written children in place. Updates are treated as safe to retry.
    fn update_running_plan(&self, plan: &RunningPlan) -> RepoResult<()> {
        for entry in &plan.entries {
            let entry_body = encode(&RunningPlanEntryDocument::from(entry))?;
            if self.identity_exists(RecordType::RunningPlanEntry, &entry.uuid) {
                self.update_single(RecordType::RunningPlanEntry, &entry.uuid, &entry_body)?;
                for unit in &entry.units {
                    self.insert_movement_type_if_new(&unit.movement_type, None)?;
                    let unit_body = encode(&RunningUnitDocument::from(unit))?;
                    if self.identity_exists(RecordType::RunningUnit, &unit.uuid) {
                        self.update_single(RecordType::RunningUnit, &unit.uuid, &unit_body)?;
                    } else {
                        self.insert_single(RecordType::RunningUnit, &unit_body)?;
                    }
                }
            } else {
                for unit in &entry.units {
                    self.insert_movement_type_if_new(&unit.movement_type, None)?;
                    self.insert_single(
                        RecordType::RunningUnit,
                        &encode(&RunningUnitDocument::from(unit))?,
                    )?;
                }
                self.insert_single(RecordType::RunningPlanEntry, &entry_body)?;
            }
        }
        self.update_single(
            RecordType::RunningPlan,
            &plan.uuid,
            &encode(&RunningPlanDocument::from(plan))?,
        )
    }

    /// Deletes units, then entries, then the plan document. Movement types
    /// stay: other plans may share them.
    fn delete_running_plan(&self, plan: &RunningPlan) -> RepoResult<()> {
        for entry in &plan.entries {
            if self.identity_exists(RecordType::RunningPlanEntry, &entry.uuid) {
                for unit in &entry.units {
                    if self.identity_exists(RecordType::RunningUnit, &unit.uuid) {
                        self.remove_single(RecordType::RunningUnit, &unit.uuid)?;
                    }
                }
                self.remove_single(RecordType::RunningPlanEntry, &entry.uuid)?;
            }
        }
        self.remove_single(RecordType::RunningPlan, &plan.uuid)
    }

    /// Movement types are shared reference data: inserted on first use,
    /// recorded for rollback only when this cascade created them.
    fn insert_movement_type_if_new(
        &self,
        movement_type: &MovementType,
        undo: Option<&mut RollbackLog>,
    ) -> RepoResult<()> {
        if self.identity_exists(RecordType::MovementType, &movement_type.key) {
            return Ok(());
        }
        self.insert_single(RecordType::MovementType, &encode(movement_type)?)?;
        if let Some(undo) = undo {
            undo.push(movement_type.key.clone());
        }
        Ok(())
    }

    fn insert_single(&self, record_type: RecordType, body: &JsonValue) -> RepoResult<()> {
        self.store.insert(record_type.collection(), body)?;
        Ok(())
    }

    fn update_single(
        &self,
        record_type: RecordType,
        identity: &str,
        body: &JsonValue,
    ) -> RepoResult<()> {
        let filter = JsonValue::String(identity.to_string());
        self.store.update_where(
            record_type.collection(),
            record_type.key_field(),
            &filter,
            body,
        )?;
        Ok(())
    }

    fn remove_single(&self, record_type: RecordType, identity: &str) -> RepoResult<()> {
        let filter = JsonValue::String(identity.to_string());
        self.store
            .remove_where(record_type.collection(), record_type.key_field(), &filter)?;
        Ok(())
    }
}
