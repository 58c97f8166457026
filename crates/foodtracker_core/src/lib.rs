//! Core domain logic for FoodTracker.
//! This crate is the single source of truth for meal invariants and the
//! on-disk meal archive.

pub mod logging;
pub mod model;
pub mod repo;
pub mod sample;
pub mod service;
pub mod store;

pub use logging::{init_logging, logging_status, LogLevel};
pub use model::meal::{Meal, MealValidationError, MAX_RATING, MIN_RATING};
pub use repo::meal_repo::{FileMealRepository, MealRepository};
pub use sample::{sample_meals, SampleMeal, SAMPLE_MEALS};
pub use service::meal_service::{MealService, MealSource, ServiceError, ServiceResult};
pub use store::{
    archive_path, decode_meals, encode_meals, load_meals, save_meals, CorruptReason, StoreError,
    StoreResult, ARCHIVE_FILE_NAME,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
