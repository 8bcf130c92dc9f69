//! Domain records persisted by the trainlog datastore.
//!
//! # Responsibility
//! - Define the canonical record shapes shared by all persistence paths.
//! - Provide the per-type identity metadata (`RecordType`) the repository
//!   layer uses to pick collections and key fields.
//!
//! # Invariants
//! - Every record carries a stable 15-character uppercase `RecordId`.
//! - Composite records (`Track`, `RunningPlan`) own their children in memory;
//!   the stored parent document references children by UUID only.

pub mod ids;
pub mod movement;
pub mod plan;
pub mod record;
pub mod track;
pub mod training;
pub mod user;
