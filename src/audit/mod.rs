//! Audit logging for budgetbook
//!
//! Every create, update and delete of a transaction, category or budget is
//! appended to `audit.log` as one JSON line holding before/after snapshots
//! and, for updates, a field-level diff summary.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
