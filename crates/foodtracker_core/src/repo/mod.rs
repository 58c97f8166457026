//! Repository layer over the meal archive.
//!
//! # Responsibility
//! - Define the load/save contract the meal list service depends on.
//! - Keep archive path and file format details out of service code.
//!
//! # Invariants
//! - Repositories persist and return whole ordered meal lists.
//! - A missing archive is reported as `Ok(None)`.

pub mod meal_repo;
