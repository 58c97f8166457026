//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the meal list (open, rows, add/update/delete) to Dart via FRB.
//! - Keep error semantics simple: envelopes with `ok` + message.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The process-wide meal list is only touched under `MEAL_LIST`'s lock,
//!   which serializes every archive load and save.

use foodtracker_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, FileMealRepository,
    LogLevel, Meal, MealService, MealSource,
};
use log::warn;
use std::sync::Mutex;

static MEAL_LIST: Mutex<Option<MealService<FileMealRepository>>> = Mutex::new(None);

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Default log level for the current build mode (`debug` or `info`).
#[flutter_rust_bridge::frb(sync)]
pub fn default_log_level() -> String {
    LogLevel::build_default().as_str().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Bundled sample photo, keyed by asset name (`meal1`, `meal2`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePhoto {
    pub asset_name: String,
    pub bytes: Vec<u8>,
}

/// Per-row data for the meal list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealRow {
    pub name: String,
    /// Raw image bytes; decoding is left to the UI.
    pub photo: Option<Vec<u8>>,
    /// Star rating in `0..=5`.
    pub rating: u32,
}

/// Response envelope for `meals_open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealsOpenResponse {
    pub ok: bool,
    /// `saved|sample` on success, empty on failure.
    pub source: String,
    /// Row count after opening.
    pub count: u32,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Response envelope for meal edits.
///
/// When `ok == false` because saving failed, the edit is still applied in
/// memory; callers should re-read rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealActionResponse {
    pub ok: bool,
    pub message: String,
}

impl MealActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Opens the meal list stored under `documents_dir`.
///
/// Falls back to sample meals when no archive exists or it cannot be read.
/// Reopening replaces the previously opened list.
///
/// # FFI contract
/// - `documents_dir` is used verbatim; empty or whitespace-padded paths are
///   rejected.
/// - Sync call; reads the archive file.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn meals_open(documents_dir: String, sample_photos: Vec<SamplePhoto>) -> MealsOpenResponse {
    let invalid_dir = if documents_dir.trim().is_empty() {
        Some("documents_dir cannot be empty")
    } else if documents_dir.trim() != documents_dir {
        Some("documents_dir must not have leading or trailing whitespace")
    } else {
        None
    };
    if let Some(reason) = invalid_dir {
        return MealsOpenResponse {
            ok: false,
            source: String::new(),
            count: 0,
            message: format!("meals_open failed: {reason}"),
        };
    }

    let mut guard = match MEAL_LIST.lock() {
        Ok(guard) => guard,
        Err(_) => {
            return MealsOpenResponse {
                ok: false,
                source: String::new(),
                count: 0,
                message: "meals_open failed: meal list lock poisoned".to_string(),
            };
        }
    };

    let repo = FileMealRepository::in_documents_dir(&documents_dir);
    let service = MealService::open(repo, |asset| {
        sample_photos
            .iter()
            .find(|photo| photo.asset_name == asset)
            .map(|photo| photo.bytes.clone())
    });
    let source = match service.source() {
        MealSource::Saved => "saved",
        MealSource::Sample => "sample",
    };
    let count = clamp_count(service.len());
    *guard = Some(service);

    MealsOpenResponse {
        ok: true,
        source: source.to_string(),
        count,
        message: format!("Opened {count} meal(s) from {source} data."),
    }
}

/// Row count of the open meal list; `0` when nothing is open.
#[flutter_rust_bridge::frb(sync)]
pub fn meals_count() -> u32 {
    with_meal_list(|service| Ok(clamp_count(service.len()))).unwrap_or(0)
}

/// Row data at `index`, or `None` when out of range or nothing is open.
#[flutter_rust_bridge::frb(sync)]
pub fn meal_at(index: u32) -> Option<MealRow> {
    with_meal_list(|service| Ok(service.meal(index as usize).map(to_meal_row)))
        .ok()
        .flatten()
}

/// Appends a new meal and saves the list.
///
/// # FFI contract
/// - `name` is stored verbatim; empty names are rejected.
/// - `rating` outside `0..=5` is rejected.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn meal_add(name: String, photo: Option<Vec<u8>>, rating: i64) -> MealActionResponse {
    let result = with_meal_list(|service| {
        let meal = Meal::new(name, photo, rating).map_err(|err| err.to_string())?;
        service.add(meal).map_err(|err| err.to_string())
    });
    match result {
        Ok(index) => MealActionResponse::success(format!("Meal added at row {index}.")),
        Err(err) => MealActionResponse::failure(format!("meal_add failed: {err}")),
    }
}

/// Replaces the meal at `index` and saves the list.
#[flutter_rust_bridge::frb(sync)]
pub fn meal_update(
    index: u32,
    name: String,
    photo: Option<Vec<u8>>,
    rating: i64,
) -> MealActionResponse {
    let result = with_meal_list(|service| {
        let meal = Meal::new(name, photo, rating).map_err(|err| err.to_string())?;
        service
            .replace(index as usize, meal)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(()) => MealActionResponse::success(format!("Meal at row {index} updated.")),
        Err(err) => MealActionResponse::failure(format!("meal_update failed: {err}")),
    }
}

/// Deletes the meal at `index` and saves the list.
#[flutter_rust_bridge::frb(sync)]
pub fn meal_delete(index: u32) -> MealActionResponse {
    let result = with_meal_list(|service| {
        service
            .remove(index as usize)
            .map(|_| ())
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(()) => MealActionResponse::success(format!("Meal at row {index} deleted.")),
        Err(err) => MealActionResponse::failure(format!("meal_delete failed: {err}")),
    }
}

fn with_meal_list<T>(
    f: impl FnOnce(&mut MealService<FileMealRepository>) -> Result<T, String>,
) -> Result<T, String> {
    let mut guard = MEAL_LIST.lock().map_err(|_| {
        warn!("event=meal_list_lock module=ffi status=error error_code=lock_poisoned");
        "meal list lock poisoned".to_string()
    })?;
    let service = guard
        .as_mut()
        .ok_or_else(|| "meal list not opened; call meals_open first".to_string())?;
    f(service)
}

fn to_meal_row(meal: &Meal) -> MealRow {
    MealRow {
        name: meal.name().to_string(),
        photo: meal.photo().map(<[u8]>::to_vec),
        rating: u32::from(meal.rating()),
    }
}

fn clamp_count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        clamp_count, core_version, default_log_level, init_logging, meal_add, meal_at, meal_delete, meal_update,
        meals_count, meals_open, to_meal_row, MealRow, SamplePhoto,
    };
    use foodtracker_core::Meal;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn default_log_level_matches_build_mode() {
        let expected = if cfg!(debug_assertions) { "debug" } else { "info" };
        assert_eq!(default_log_level(), expected);
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn meals_open_rejects_blank_documents_dir() {
        let response = meals_open("  ".to_string(), Vec::new());
        assert!(!response.ok);
        assert!(response.message.contains("documents_dir"));
    }

    #[test]
    fn meals_open_rejects_padded_documents_dir() {
        let dir = tempfile::tempdir().expect("temp dir");
        let padded = format!(" {} ", dir.path().display());

        let response = meals_open(padded, Vec::new());

        assert!(!response.ok);
        assert!(response.message.contains("whitespace"), "{}", response.message);
        assert_eq!(std::fs::read_dir(dir.path()).expect("read dir").count(), 0);
    }

    #[test]
    fn to_meal_row_copies_fields() {
        let meal = Meal::new("Soup", Some(vec![1, 2]), 3).unwrap();
        assert_eq!(
            to_meal_row(&meal),
            MealRow {
                name: "Soup".to_string(),
                photo: Some(vec![1, 2]),
                rating: 3,
            }
        );
    }

    #[test]
    fn clamp_count_saturates() {
        assert_eq!(clamp_count(7), 7);
        assert_eq!(clamp_count(usize::MAX), u32::MAX);
    }

    // The meal list is process-wide, so the whole lifecycle runs in one test.
    #[test]
    fn meal_list_lifecycle_persists_across_reopen() {
        let dir = tempfile::tempdir().expect("temp dir");
        let documents_dir = dir.path().to_str().expect("utf-8 temp dir").to_string();
        let photos = vec![SamplePhoto {
            asset_name: "meal1".to_string(),
            bytes: vec![0xff, 0xd8],
        }];

        let opened = meals_open(documents_dir.clone(), photos.clone());
        assert!(opened.ok, "{}", opened.message);
        assert_eq!(opened.source, "sample");
        assert_eq!(opened.count, 3);
        assert_eq!(meals_count(), 3);
        let first = meal_at(0).expect("first sample row");
        assert_eq!(first.name, "Caprese Salad");
        assert_eq!(first.photo, Some(vec![0xff, 0xd8]));
        assert!(meal_at(3).is_none());

        let rejected = meal_add(String::new(), None, 4);
        assert!(!rejected.ok);
        assert!(rejected.message.contains("name"));
        let rejected = meal_add("Salad".to_string(), None, 7);
        assert!(!rejected.ok);
        assert!(rejected.message.contains("(7)"));
        assert_eq!(meals_count(), 3);

        let added = meal_add("Pho".to_string(), Some(vec![1]), 5);
        assert!(added.ok, "{}", added.message);
        let updated = meal_update(1, "Roast Chicken".to_string(), None, 4);
        assert!(updated.ok, "{}", updated.message);
        let deleted = meal_delete(2);
        assert!(deleted.ok, "{}", deleted.message);
        let missing = meal_delete(10);
        assert!(!missing.ok);
        assert!(missing.message.contains("out of range"));

        let reopened = meals_open(documents_dir, photos);
        assert!(reopened.ok, "{}", reopened.message);
        assert_eq!(reopened.source, "saved");
        let names = (0..meals_count())
            .filter_map(meal_at)
            .map(|row| row.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Caprese Salad", "Roast Chicken", "Pho"]);
        assert_eq!(meal_at(2).map(|row| row.rating), Some(5));
    }
}
