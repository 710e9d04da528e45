//! Domain model for the companion features.
//!
//! # Responsibility
//! - Define the persisted record shapes (task, note, appointment).
//! - Define feature identifiers and the countdown timer state.
//!
//! # Invariants
//! - Every persisted record is identified by a stable `RecordId`.
//! - Records never reference other records or other lists.

pub mod appointment;
pub mod feature;
pub mod note;
pub mod record;
pub mod task;
pub mod timer;
