//! Domain model for recorded meals.
//!
//! # Responsibility
//! - Define the canonical meal record shared by storage and UI callers.
//!
//! # Invariants
//! - A `Meal` is valid from construction until it is dropped.
//! - Edits replace a whole `Meal`; records are never mutated in place.

pub mod meal;
