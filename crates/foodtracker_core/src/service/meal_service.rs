//! Meal list use-case service.
//!
//! # Responsibility
//! - Load saved meals at startup, falling back to sample meals.
//! - Serve row count and per-row data to the presentation layer.
//! - Apply add/replace/remove edits and persist after each one.
//!
//! # Invariants
//! - List order is the display order and the persisted order.
//! - Rejected edits (bad index) change nothing and do not save.
//! - A failed save keeps the in-memory edit; the error is returned and
//!   logged, never escalated to a panic.

use crate::model::meal::Meal;
use crate::repo::meal_repo::MealRepository;
use crate::sample::sample_meals;
use crate::store::StoreError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for meal list edits.
#[derive(Debug)]
pub enum ServiceError {
    /// Row index does not exist in the current list.
    IndexOutOfRange { index: usize, len: usize },
    /// Edit applied in memory but the archive could not be written.
    Save(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "meal index {index} out of range for {len} meal(s)")
            }
            Self::Save(err) => write!(f, "failed to save meals: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Save(err) => Some(err),
            Self::IndexOutOfRange { .. } => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Save(value)
    }
}

/// Where the list held by a freshly opened service came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealSource {
    /// Decoded from the archive.
    Saved,
    /// Built from sample data (no archive, or it could not be read).
    Sample,
}

/// Ordered meal list backed by a repository.
pub struct MealService<R: MealRepository> {
    repo: R,
    meals: Vec<Meal>,
    source: MealSource,
}

impl<R: MealRepository> MealService<R> {
    /// Loads saved meals, or sample meals when none can be loaded.
    ///
    /// `load_photo` resolves sample photo asset names and is only called
    /// on the sample path. Sample meals are not saved until the first edit.
    pub fn open(repo: R, load_photo: impl FnMut(&str) -> Option<Vec<u8>>) -> Self {
        let loaded = match repo.load_meals() {
            Ok(Some(meals)) => Some(meals),
            Ok(None) => None,
            Err(err) => {
                warn!(
                    "event=meals_open module=service status=fallback error_code={} error={}",
                    err.code(),
                    err
                );
                None
            }
        };

        let (meals, source) = match loaded {
            Some(meals) => (meals, MealSource::Saved),
            None => (sample_meals(load_photo), MealSource::Sample),
        };
        info!(
            "event=meals_open module=service status=ok source={} count={}",
            source_label(source),
            meals.len()
        );

        Self {
            repo,
            meals,
            source,
        }
    }

    pub fn source(&self) -> MealSource {
        self.source
    }

    /// Row count for the list view.
    pub fn len(&self) -> usize {
        self.meals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }

    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    /// Row data for `index`, if it exists.
    pub fn meal(&self, index: usize) -> Option<&Meal> {
        self.meals.get(index)
    }

    /// Appends a meal and saves. Returns the new row index.
    pub fn add(&mut self, meal: Meal) -> ServiceResult<usize> {
        self.meals.push(meal);
        let index = self.meals.len() - 1;
        self.persist("add")?;
        Ok(index)
    }

    /// Replaces the meal at `index` and saves.
    pub fn replace(&mut self, index: usize, meal: Meal) -> ServiceResult<()> {
        let len = self.meals.len();
        let slot = self
            .meals
            .get_mut(index)
            .ok_or(ServiceError::IndexOutOfRange { index, len })?;
        *slot = meal;
        self.persist("replace")
    }

    /// Removes the meal at `index`, saves, and returns the removed meal.
    pub fn remove(&mut self, index: usize) -> ServiceResult<Meal> {
        self.check_index(index)?;
        let removed = self.meals.remove(index);
        self.persist("remove")?;
        Ok(removed)
    }

    /// Writes the current list without editing it.
    pub fn save(&self) -> ServiceResult<()> {
        self.persist("save")
    }

    fn check_index(&self, index: usize) -> ServiceResult<()> {
        if index >= self.meals.len() {
            return Err(ServiceError::IndexOutOfRange {
                index,
                len: self.meals.len(),
            });
        }
        Ok(())
    }

    fn persist(&self, action: &'static str) -> ServiceResult<()> {
        if let Err(err) = self.repo.save_meals(&self.meals) {
            warn!(
                "event=meals_edit module=service status=save_failed action={} count={} error_code={}",
                action,
                self.meals.len(),
                err.code()
            );
            return Err(err.into());
        }
        Ok(())
    }
}

fn source_label(source: MealSource) -> &'static str {
    match source {
        MealSource::Saved => "saved",
        MealSource::Sample => "sample",
    }
}
