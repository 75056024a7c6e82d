//! Domain logic for the Our Missing Middle backend.
//!
//! Pure types and functions only -- no I/O. The chain module carries the
//! step-sequence invariants; share and geo carry the validation rules the
//! API layer applies before touching the database.

pub mod chain;
pub mod error;
pub mod geo;
pub mod share;
pub mod types;
