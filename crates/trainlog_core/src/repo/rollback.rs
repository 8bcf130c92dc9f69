//! Compensating rollback for aborted multi-document inserts.
//!
//! # Responsibility
//! - Track identities written during a cascade so they can be reversed.
//! - Replay deletes in reverse insertion order when the cascade aborts.
//!
//! # Invariants
//! - Rollback is best-effort: failures are logged, never escalated, so the
//!   triggering error is always the one surfaced to the caller.
//! - Deletes address records through the type's rollback key field.

use crate::model::record::RecordType;
use crate::store::DocumentStore;
use log::{debug, error};
use serde_json::Value as JsonValue;

/// Ordered undo list for one record type of an aborted cascade.
pub(crate) struct RollbackLog {
    record_type: RecordType,
    identities: Vec<String>,
}

impl RollbackLog {
    pub(crate) fn new(record_type: RecordType) -> Self {
        Self {
            record_type,
            identities: Vec::new(),
        }
    }

    /// Records one successfully written identity for later reversal.
    pub(crate) fn push(&mut self, identity: impl Into<String>) {
        self.identities.push(identity.into());
    }

    /// Deletes every recorded identity, newest first.
    pub(crate) fn execute(&self, store: &DocumentStore) {
        let collection = self.record_type.collection();
        let key_field = self.record_type.rollback_key_field();
        for identity in self.identities.iter().rev() {
            let filter = JsonValue::String(identity.clone());
            match store.remove_where(collection, key_field, &filter) {
                Ok(removed) => debug!(
                    "event=rollback module=repo status=ok record_type={} identity={identity} removed={removed}",
                    self.record_type
                ),
                Err(err) => error!(
                    "event=rollback module=repo status=error error_code=rollback_failed record_type={} identity={identity} error={err}",
                    self.record_type
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RollbackLog;
    use crate::model::record::RecordType;
    use crate::store::open_store_in_memory;
    use serde_json::json;

    #[test]
    fn execute_removes_recorded_identities_only() {
        let store = open_store_in_memory().unwrap();
        store
            .insert("location_data", &json!({"uuid": "A", "latitude": 1.0}))
            .unwrap();
        store
            .insert("location_data", &json!({"uuid": "B", "latitude": 2.0}))
            .unwrap();

        let mut undo = RollbackLog::new(RecordType::LocationData);
        undo.push("A");
        undo.execute(&store);

        assert!(store
            .find_where("location_data", "uuid", &json!("A"))
            .unwrap()
            .is_empty());
        assert_eq!(store.count("location_data").unwrap(), 1);
    }

    #[test]
    fn movement_types_are_rolled_back_by_business_key() {
        let store = open_store_in_memory().unwrap();
        store
            .insert("movement_types", &json!({"uuid": "X1", "key": "L"}))
            .unwrap();

        let mut undo = RollbackLog::new(RecordType::MovementType);
        undo.push("L");
        undo.execute(&store);

        assert_eq!(store.count("movement_types").unwrap(), 0);
    }

    #[test]
    fn execute_on_closed_store_is_silent() {
        let mut store = open_store_in_memory().unwrap();
        store.close();

        let mut undo = RollbackLog::new(RecordType::RunningUnit);
        undo.push("A");
        undo.execute(&store);
    }
}
