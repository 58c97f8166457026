//! Meal repository contract and file-backed implementation.

use crate::model::meal::Meal;
use crate::store::{archive_path, load_meals, save_meals, StoreResult};
use std::path::{Path, PathBuf};

/// Persistence contract for the ordered meal list.
pub trait MealRepository {
    /// Loads the stored list, or `None` when nothing has been saved yet.
    fn load_meals(&self) -> StoreResult<Option<Vec<Meal>>>;
    /// Replaces the stored list with `meals`.
    fn save_meals(&self, meals: &[Meal]) -> StoreResult<()>;
}

/// Repository bound to one archive file.
#[derive(Debug, Clone)]
pub struct FileMealRepository {
    path: PathBuf,
}

impl FileMealRepository {
    /// Uses `path` as the archive file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses the fixed `meals` archive inside the host documents directory.
    pub fn in_documents_dir(documents_dir: impl AsRef<Path>) -> Self {
        Self::new(archive_path(documents_dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MealRepository for FileMealRepository {
    fn load_meals(&self) -> StoreResult<Option<Vec<Meal>>> {
        load_meals(&self.path)
    }

    fn save_meals(&self, meals: &[Meal]) -> StoreResult<()> {
        save_meals(meals, &self.path)
    }
}

impl<R: MealRepository + ?Sized> MealRepository for &R {
    fn load_meals(&self) -> StoreResult<Option<Vec<Meal>>> {
        (**self).load_meals()
    }

    fn save_meals(&self, meals: &[Meal]) -> StoreResult<()> {
        (**self).save_meals(meals)
    }
}
