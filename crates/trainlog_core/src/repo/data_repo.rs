//! Repository façade over the document store.
//!
//! # Responsibility
//! - Provide the single public surface for all datastore access.
//! - Route writes to the type-specific cascade handlers and notify the
//!   observer after each committed mutation.
//! - Resolve identities with the type-specific key field.
//!
//! # Invariants
//! - Write operations fail fast with `StoreUnavailable` on a closed store.
//! - Read operations never raise; they degrade to empty results and a log
//!   line.
//! - More than one match for a unique identity is a logged anomaly, not an
//!   error; the first match wins.

use crate::model::movement::MovementType;
use crate::model::plan::{
    RunningPlan, RunningPlanDocument, RunningPlanEntry, RunningPlanEntryDocument, RunningUnit,
    RunningUnitDocument,
};
use crate::model::record::{Record, RecordType};
use crate::model::track::{LocationData, Track, TrackDocument};
use crate::model::user::User;
use crate::repo::RepositoryObserver;
use crate::store::{DocumentStore, StoreError};
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors surfaced by repository write operations.
#[derive(Debug)]
pub enum RepoError {
    /// The store is not open or reachable.
    StoreUnavailable,
    /// An insert found a record of the same type and identity.
    AlreadyExists {
        record_type: RecordType,
        identity: String,
    },
    /// An update/delete addressed an identity that does not exist.
    NotFound {
        record_type: RecordType,
        identity: String,
    },
    /// A referenced record is missing at write time.
    DanglingReference {
        record_type: RecordType,
        identity: String,
    },
    /// A composite's child already exists at insert time.
    DuplicateChildRecord {
        record_type: RecordType,
        identity: String,
    },
    /// The record type has no direct cascade handler.
    Unsupported(RecordType),
    /// A record could not be encoded to or decoded from its document shape.
    MalformedRecord(String),
    /// Underlying store transport error.
    Store(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreUnavailable => write!(f, "datastore not available"),
            Self::AlreadyExists {
                record_type,
                identity,
            } => write!(f, "{record_type} with identity `{identity}` already exists"),
            Self::NotFound {
                record_type,
                identity,
            } => write!(f, "{record_type} with identity `{identity}` was not found"),
            Self::DanglingReference {
                record_type,
                identity,
            } => write!(
                f,
                "referenced {record_type} `{identity}` must exist before writing"
            ),
            Self::DuplicateChildRecord {
                record_type,
                identity,
            } => write!(
                f,
                "child {record_type} `{identity}` already exists in the datastore"
            ),
            Self::Unsupported(record_type) => {
                write!(f, "unsupported direct datastore operation for {record_type}")
            }
            Self::MalformedRecord(message) => write!(f, "malformed record document: {message}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Closed => Self::StoreUnavailable,
            other => Self::Store(other),
        }
    }
}

/// The persistence coordinator all external callers use.
///
/// Owns the store handle and an observer notified after each committed
/// mutation. One logical writer at a time; the repository adds no locking.
pub struct DataRepository {
    pub(crate) store: DocumentStore,
    pub(crate) observer: Box<dyn RepositoryObserver>,
}

impl DataRepository {
    /// Creates the repository over an opened store handle.
    pub fn new(store: DocumentStore, observer: Box<dyn RepositoryObserver>) -> Self {
        Self { store, observer }
    }

    /// Whether the underlying store handle is open.
    pub fn is_open(&self) -> bool {
        self.store.is_open()
    }

    /// Releases the store handle. Subsequent writes report `StoreUnavailable`.
    pub fn close(&mut self) {
        self.store.close();
    }

    /// Persists a new record, cascading to owned children.
    ///
    /// # Errors
    /// - `StoreUnavailable` when the store is closed.
    /// - `Unsupported` for child-only record types.
    /// - `AlreadyExists` when the identity is already stored.
    /// - Cascade errors per the type-specific handler.
    pub fn add(&self, record: &Record) -> RepoResult<()> {
        self.ensure_open()?;
        let record_type = record.record_type();
        if !record_type.supports_direct_writes() {
            return Err(RepoError::Unsupported(record_type));
        }
        if self
            .find_identity_document(record_type, record.identity())
            .is_some()
        {
            return Err(RepoError::AlreadyExists {
                record_type,
                identity: record.identity().to_string(),
            });
        }

        self.insert_record(record)?;
        debug!(
            "event=record_added module=repo status=ok record_type={record_type} identity={}",
            record.identity()
        );
        self.observer.record_added(record);
        Ok(())
    }

    /// Saves an existing record, cascading to owned children.
    ///
    /// Composite updates are not atomic: a failure mid-cascade is reported
    /// but already-written children stay written.
    ///
    /// # Errors
    /// - `StoreUnavailable` when the store is closed.
    /// - `Unsupported` for child-only record types.
    /// - `NotFound` when the identity is not stored.
    pub fn update(&self, record: &Record) -> RepoResult<()> {
        self.ensure_open()?;
        let record_type = record.record_type();
        if !record_type.supports_direct_writes() {
            return Err(RepoError::Unsupported(record_type));
        }
        if self
            .find_identity_document(record_type, record.identity())
            .is_none()
        {
            return Err(RepoError::NotFound {
                record_type,
                identity: record.identity().to_string(),
            });
        }

        self.update_record(record)?;
        debug!(
            "event=record_updated module=repo status=ok record_type={record_type} identity={}",
            record.identity()
        );
        self.observer.record_updated(record);
        Ok(())
    }

    /// Removes an existing record, cascading to owned children only.
    ///
    /// Reference data (`TrainingType`, `MovementType`) is never removed:
    /// other records may hold references to it, so the call is a logged
    /// no-op and the observer is not notified.
    ///
    /// # Errors
    /// - `StoreUnavailable` when the store is closed.
    /// - `Unsupported` for child-only record types.
    /// - `NotFound` when the identity is not stored.
    pub fn delete(&self, record: &Record) -> RepoResult<()> {
        self.ensure_open()?;
        let record_type = record.record_type();
        if !record_type.supports_direct_writes() {
            return Err(RepoError::Unsupported(record_type));
        }
        if self
            .find_identity_document(record_type, record.identity())
            .is_none()
        {
            return Err(RepoError::NotFound {
                record_type,
                identity: record.identity().to_string(),
            });
        }
        if matches!(
            record_type,
            RecordType::TrainingType | RecordType::MovementType
        ) {
            debug!(
                "event=record_removed module=repo status=skipped record_type={record_type} identity={} reason=reference_data",
                record.identity()
            );
            return Ok(());
        }

        self.delete_record(record)?;
        debug!(
            "event=record_removed module=repo status=ok record_type={record_type} identity={}",
            record.identity()
        );
        self.observer.record_removed(record);
        Ok(())
    }

    /// Finds one record by its type-specific identity key.
    ///
    /// Owned children are hydrated from their own documents. Returns `None`
    /// when nothing matches or the store cannot be queried.
    pub fn find_by_uuid(&self, record_type: RecordType, identity: &str) -> Option<Record> {
        let document = self.find_identity_document(record_type, identity)?;
        match self.decode_record(record_type, document) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(
                    "event=find_by_uuid module=repo status=error record_type={record_type} identity={identity} error={err}"
                );
                None
            }
        }
    }

    /// Returns every record of a type. Empty on any error.
    pub fn find_all(&self, record_type: RecordType) -> Vec<Record> {
        if !self.store.is_open() {
            return Vec::new();
        }
        match self.store.find_all(record_type.collection()) {
            Ok(documents) => self.decode_documents(record_type, documents),
            Err(err) => {
                error!(
                    "event=find_all module=repo status=error record_type={record_type} error={err}"
                );
                Vec::new()
            }
        }
    }

    /// Returns every record of a type whose `attribute` equals `value`.
    /// Empty on any error.
    pub fn find_by_attribute(
        &self,
        attribute: &str,
        value: &JsonValue,
        record_type: RecordType,
    ) -> Vec<Record> {
        if !self.store.is_open() {
            return Vec::new();
        }
        match self
            .store
            .find_where(record_type.collection(), attribute, value)
        {
            Ok(documents) => self.decode_documents(record_type, documents),
            Err(err) => {
                error!(
                    "event=find_by_attribute module=repo status=error record_type={record_type} attribute={attribute} error={err}"
                );
                Vec::new()
            }
        }
    }

    /// Removes every record of every managed type.
    ///
    /// Used for full-reset scenarios such as first-run reseeding. Errors are
    /// logged per collection, not raised.
    pub fn clear_all(&self) {
        for record_type in RecordType::ALL {
            if let Err(err) = self.store.remove_all(record_type.collection()) {
                error!(
                    "event=clear_all module=repo status=error record_type={record_type} error={err}"
                );
            }
        }
    }

    /// Whether nothing has been seeded yet.
    ///
    /// True when the store holds no movement type, no training type and no
    /// running plan; also true when the store cannot be queried.
    pub fn is_empty(&self) -> bool {
        for record_type in [
            RecordType::MovementType,
            RecordType::TrainingType,
            RecordType::RunningPlan,
        ] {
            match self.store.count(record_type.collection()) {
                Ok(0) => {}
                Ok(_) => return false,
                Err(err) => {
                    warn!(
                        "event=is_empty module=repo status=error record_type={record_type} error={err}"
                    );
                    return true;
                }
            }
        }
        true
    }

    pub(crate) fn ensure_open(&self) -> RepoResult<()> {
        if self.store.is_open() {
            Ok(())
        } else {
            Err(RepoError::StoreUnavailable)
        }
    }

    /// The single identity-lookup primitive.
    ///
    /// Resolves with the type-specific key field. Zero matches and store
    /// errors both resolve to `None`; more than one match is logged as an
    /// integrity anomaly and the first match is returned.
    pub(crate) fn find_identity_document(
        &self,
        record_type: RecordType,
        identity: &str,
    ) -> Option<JsonValue> {
        if !self.store.is_open() {
            return None;
        }
        let filter = JsonValue::String(identity.to_string());
        match self
            .store
            .find_where(record_type.collection(), record_type.key_field(), &filter)
        {
            Ok(mut documents) => {
                if documents.len() > 1 {
                    warn!(
                        "event=identity_lookup module=repo status=anomaly record_type={record_type} identity={identity} matches={}",
                        documents.len()
                    );
                }
                if documents.is_empty() {
                    None
                } else {
                    Some(documents.swap_remove(0))
                }
            }
            Err(err) => {
                error!(
                    "event=identity_lookup module=repo status=error record_type={record_type} identity={identity} error={err}"
                );
                None
            }
        }
    }

    pub(crate) fn identity_exists(&self, record_type: RecordType, identity: &str) -> bool {
        self.find_identity_document(record_type, identity).is_some()
    }

    fn decode_documents(&self, record_type: RecordType, documents: Vec<JsonValue>) -> Vec<Record> {
        documents
            .into_iter()
            .filter_map(|document| match self.decode_record(record_type, document) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(
                        "event=decode_record module=repo status=error record_type={record_type} error={err}"
                    );
                    None
                }
            })
            .collect()
    }

    fn decode_record(&self, record_type: RecordType, document: JsonValue) -> RepoResult<Record> {
        match record_type {
            RecordType::User => Ok(Record::User(decode::<User>(document)?)),
            RecordType::TrainingType => Ok(Record::TrainingType(decode(document)?)),
            RecordType::MovementType => Ok(Record::MovementType(decode(document)?)),
            RecordType::LocationData => Ok(Record::LocationData(decode(document)?)),
            RecordType::Training => Ok(Record::Training(decode(document)?)),
            RecordType::Track => {
                let track: TrackDocument = decode(document)?;
                Ok(Record::Track(self.hydrate_track(track)))
            }
            RecordType::RunningUnit => {
                let unit: RunningUnitDocument = decode(document)?;
                Ok(Record::RunningUnit(self.hydrate_unit(unit)?))
            }
            RecordType::RunningPlanEntry => {
                let entry: RunningPlanEntryDocument = decode(document)?;
                Ok(Record::RunningPlanEntry(self.hydrate_entry(entry)))
            }
            RecordType::RunningPlan => {
                let plan: RunningPlanDocument = decode(document)?;
                Ok(Record::RunningPlan(self.hydrate_plan(plan)))
            }
        }
    }

    fn hydrate_track(&self, document: TrackDocument) -> Track {
        let mut locations = Vec::with_capacity(document.location_uuids.len());
        for uuid in &document.location_uuids {
            match self.find_identity_document(RecordType::LocationData, uuid) {
                Some(child) => match decode::<LocationData>(child) {
                    Ok(location) => locations.push(location),
                    Err(err) => warn!(
                        "event=hydrate module=repo status=error record_type=track child=location_data uuid={uuid} error={err}"
                    ),
                },
                None => warn!(
                    "event=hydrate module=repo status=missing_child record_type=track child=location_data uuid={uuid}"
                ),
            }
        }
        Track {
            uuid: document.uuid,
            name: document.name,
            remarks: document.remarks,
            started_at: document.started_at,
            finished_at: document.finished_at,
            locations,
        }
    }

    fn hydrate_unit(&self, document: RunningUnitDocument) -> RepoResult<RunningUnit> {
        let movement_document = self
            .find_identity_document(RecordType::MovementType, &document.movement_type_key)
            .ok_or_else(|| {
                RepoError::MalformedRecord(format!(
                    "running unit {} references unknown movement type `{}`",
                    document.uuid, document.movement_type_key
                ))
            })?;
        let movement_type: MovementType = decode(movement_document)?;
        Ok(RunningUnit {
            uuid: document.uuid,
            duration_minutes: document.duration_minutes,
            completed: document.completed,
            movement_type,
        })
    }

    fn hydrate_entry(&self, document: RunningPlanEntryDocument) -> RunningPlanEntry {
        let mut units = Vec::with_capacity(document.unit_uuids.len());
        for uuid in &document.unit_uuids {
            let Some(child) = self.find_identity_document(RecordType::RunningUnit, uuid) else {
                warn!(
                    "event=hydrate module=repo status=missing_child record_type=running_plan_entry child=running_unit uuid={uuid}"
                );
                continue;
            };
            match decode::<RunningUnitDocument>(child).and_then(|unit| self.hydrate_unit(unit)) {
                Ok(unit) => units.push(unit),
                Err(err) => warn!(
                    "event=hydrate module=repo status=error record_type=running_plan_entry child=running_unit uuid={uuid} error={err}"
                ),
            }
        }
        RunningPlanEntry {
            uuid: document.uuid,
            week: document.week,
            day: document.day,
            units,
        }
    }

    fn hydrate_plan(&self, document: RunningPlanDocument) -> RunningPlan {
        let mut entries = Vec::with_capacity(document.entry_uuids.len());
        for uuid in &document.entry_uuids {
            let Some(child) = self.find_identity_document(RecordType::RunningPlanEntry, uuid)
            else {
                warn!(
                    "event=hydrate module=repo status=missing_child record_type=running_plan child=running_plan_entry uuid={uuid}"
                );
                continue;
            };
            match decode::<RunningPlanEntryDocument>(child) {
                Ok(entry) => entries.push(self.hydrate_entry(entry)),
                Err(err) => warn!(
                    "event=hydrate module=repo status=error record_type=running_plan child=running_plan_entry uuid={uuid} error={err}"
                ),
            }
        }
        RunningPlan {
            uuid: document.uuid,
            name: document.name,
            remarks: document.remarks,
            start_date: document.start_date,
            order_number: document.order_number,
            is_template: document.is_template,
            entries,
        }
    }
}

pub(crate) fn decode<T: DeserializeOwned>(document: JsonValue) -> RepoResult<T> {
    serde_json::from_value(document).map_err(|err| RepoError::MalformedRecord(err.to_string()))
}

pub(crate) fn encode<T: Serialize>(value: &T) -> RepoResult<JsonValue> {
    serde_json::to_value(value).map_err(|err| RepoError::MalformedRecord(err.to_string()))
}
