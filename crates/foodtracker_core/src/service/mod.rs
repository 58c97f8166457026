//! Core use-case services.
//!
//! # Responsibility
//! - Own the in-memory meal list between loads and saves.
//! - Keep UI/FFI layers decoupled from archive details.

pub mod meal_service;
