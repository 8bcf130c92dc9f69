//! Embedded document store bootstrap and access primitives.
//!
//! # Responsibility
//! - Open and configure the SQLite-backed document store.
//! - Expose the schemaless per-collection primitives (insert, update/remove
//!   by field, find by field/all, count) the repository layer builds on.
//!
//! # Invariants
//! - The store offers NO multi-document transactions; multi-record atomicity
//!   is the repository layer's job.
//! - A closed handle reports `StoreError::Closed` on every data operation
//!   instead of faulting.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod documents;
mod open;

pub use documents::DocumentStore;
pub use open::{open_store, open_store_in_memory};

pub type StoreResult<T> = Result<T, StoreError>;

/// Transport-level errors of the document store.
#[derive(Debug)]
pub enum StoreError {
    /// The handle was closed; no connection is held anymore.
    Closed,
    /// Underlying SQLite error.
    Sqlite(rusqlite::Error),
    /// A stored body could not be parsed as a JSON document.
    MalformedDocument(String),
    /// The filter value kind cannot be compared against document fields.
    UnsupportedFilterValue(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "document store is closed"),
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::MalformedDocument(message) => {
                write!(f, "malformed stored document: {message}")
            }
            Self::UnsupportedFilterValue(kind) => {
                write!(f, "unsupported filter value kind: {kind}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Closed | Self::MalformedDocument(_) | Self::UnsupportedFilterValue(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
