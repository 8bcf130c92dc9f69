//! Schemaless collection primitives over the documents table.
//!
//! # Responsibility
//! - Store and retrieve JSON document bodies per logical collection.
//! - Resolve equality filters against document fields via `json_extract`.
//!
//! # Invariants
//! - Every operation is a single SQL statement; callers cannot group
//!   operations into one transaction through this API.
//! - `find_all` returns documents in insertion order.

use super::{StoreError, StoreResult};
use log::info;
use rusqlite::types::Value;
use rusqlite::{params, Connection};
use serde_json::Value as JsonValue;

/// Owned handle to the embedded document store.
///
/// The handle is constructed by [`super::open_store`] and released exactly
/// once through [`DocumentStore::close`]; afterwards every data operation
/// reports [`StoreError::Closed`].
pub struct DocumentStore {
    conn: Option<Connection>,
}

impl DocumentStore {
    pub(crate) fn from_connection(conn: Connection) -> Self {
        Self { conn: Some(conn) }
    }

    /// Whether the handle still holds a live connection.
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Releases the connection. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err((_, err)) = conn.close() {
                info!("event=store_close module=store status=error error={err}");
            } else {
                info!("event=store_close module=store status=ok");
            }
        }
    }

    /// Inserts one document into a collection.
    pub fn insert(&self, collection: &str, body: &JsonValue) -> StoreResult<()> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO documents (collection, body) VALUES (?1, ?2);",
            params![collection, encode_body(body)?],
        )?;
        Ok(())
    }

    /// Replaces the body of every document whose `field` equals `value`.
    ///
    /// Returns the number of replaced documents.
    pub fn update_where(
        &self,
        collection: &str,
        field: &str,
        value: &JsonValue,
        body: &JsonValue,
    ) -> StoreResult<usize> {
        let conn = self.connection()?;
        let changed = conn.execute(
            "UPDATE documents
             SET body = ?1
             WHERE collection = ?2
               AND json_extract(body, ?3) = ?4;",
            params![
                encode_body(body)?,
                collection,
                field_path(field),
                filter_param(value)?
            ],
        )?;
        Ok(changed)
    }

    /// Removes every document whose `field` equals `value`.
    ///
    /// Returns the number of removed documents.
    pub fn remove_where(&self, collection: &str, field: &str, value: &JsonValue) -> StoreResult<usize> {
        let conn = self.connection()?;
        let removed = conn.execute(
            "DELETE FROM documents
             WHERE collection = ?1
               AND json_extract(body, ?2) = ?3;",
            params![collection, field_path(field), filter_param(value)?],
        )?;
        Ok(removed)
    }

    /// Removes every document of a collection.
    pub fn remove_all(&self, collection: &str) -> StoreResult<usize> {
        let conn = self.connection()?;
        let removed = conn.execute(
            "DELETE FROM documents WHERE collection = ?1;",
            params![collection],
        )?;
        Ok(removed)
    }

    /// Finds every document whose `field` equals `value`, in insertion order.
    pub fn find_where(
        &self,
        collection: &str,
        field: &str,
        value: &JsonValue,
    ) -> StoreResult<Vec<JsonValue>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT body FROM documents
             WHERE collection = ?1
               AND json_extract(body, ?2) = ?3
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query(params![collection, field_path(field), filter_param(value)?])?;
        collect_bodies(&mut rows)
    }

    /// Returns every document of a collection in insertion order.
    pub fn find_all(&self, collection: &str) -> StoreResult<Vec<JsonValue>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT body FROM documents WHERE collection = ?1 ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query(params![collection])?;
        collect_bodies(&mut rows)
    }

    /// Counts the documents of a collection.
    pub fn count(&self, collection: &str) -> StoreResult<u64> {
        let conn = self.connection()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1;",
            params![collection],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    fn connection(&self) -> StoreResult<&Connection> {
        self.conn.as_ref().ok_or(StoreError::Closed)
    }
}

fn collect_bodies(rows: &mut rusqlite::Rows<'_>) -> StoreResult<Vec<JsonValue>> {
    let mut documents = Vec::new();
    while let Some(row) = rows.next()? {
        let body: String = row.get(0)?;
        let document = serde_json::from_str(&body)
            .map_err(|err| StoreError::MalformedDocument(err.to_string()))?;
        documents.push(document);
    }
    Ok(documents)
}

fn encode_body(body: &JsonValue) -> StoreResult<String> {
    serde_json::to_string(body).map_err(|err| StoreError::MalformedDocument(err.to_string()))
}

fn field_path(field: &str) -> String {
    format!("$.{field}")
}

fn filter_param(value: &JsonValue) -> StoreResult<Value> {
    match value {
        JsonValue::String(text) => Ok(Value::Text(text.clone())),
        JsonValue::Bool(flag) => Ok(Value::Integer(i64::from(*flag))),
        JsonValue::Number(number) => {
            if let Some(integer) = number.as_i64() {
                Ok(Value::Integer(integer))
            } else if let Some(float) = number.as_f64() {
                Ok(Value::Real(float))
            } else {
                Err(StoreError::UnsupportedFilterValue("number"))
            }
        }
        JsonValue::Null => Err(StoreError::UnsupportedFilterValue("null")),
        JsonValue::Array(_) => Err(StoreError::UnsupportedFilterValue("array")),
        JsonValue::Object(_) => Err(StoreError::UnsupportedFilterValue("object")),
    }
}
