//! Archive file load/save.
//!
//! # Responsibility
//! - Persist the encoded meal list with atomic replace-on-write.
//! - Distinguish "no archive yet" from read and decode failures.
//!
//! # Invariants
//! - Saves never leave a half-written archive at the target path.
//! - Temporary files are removed on every failed save.
//! - Log lines carry counts and timings only, never meal content.

use super::codec::{decode_meals, encode_meals_capped, MAX_BLOB_BYTES};
use super::{CorruptReason, StoreError, StoreResult};
use crate::model::meal::Meal;
use log::{error, info, warn};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;
use std::time::Instant;
use tempfile::NamedTempFile;

/// Writes the full meal list to `path`, replacing any existing archive.
///
/// The blob is written to a temporary file in the same directory, synced,
/// then renamed over `path`.
///
/// # Side effects
/// - Creates the parent directory when missing.
/// - Emits `meals_save` logging events with count and duration.
///
/// # Errors
/// - `StoreError::Io` on any filesystem failure.
/// - `StoreError::Corrupt(CorruptReason::TooLarge)` when the encoded list
///   exceeds the size `load_meals` accepts; the existing archive is kept.
pub fn save_meals(meals: &[Meal], path: impl AsRef<Path>) -> StoreResult<()> {
    save_meals_capped(meals, path.as_ref(), MAX_BLOB_BYTES)
}

fn save_meals_capped(meals: &[Meal], path: &Path, max_bytes: usize) -> StoreResult<()> {
    let started_at = Instant::now();

    match write_archive(meals, path, max_bytes) {
        Ok(bytes) => {
            info!(
                "event=meals_save module=store status=ok count={} bytes={} duration_ms={}",
                meals.len(),
                bytes,
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=meals_save module=store status=error count={} duration_ms={} error_code={} error={}",
                meals.len(),
                started_at.elapsed().as_millis(),
                err.code(),
                err
            );
            Err(err)
        }
    }
}

/// Reads the meal list stored at `path`.
///
/// Returns `Ok(None)` when no archive exists yet.
///
/// # Errors
/// - `StoreError::Io` when the file exists but cannot be read.
/// - `StoreError::Corrupt` when the file is over the size cap or its
///   contents do not decode. Oversized files are rejected before reading.
pub fn load_meals(path: impl AsRef<Path>) -> StoreResult<Option<Vec<Meal>>> {
    let path = path.as_ref();
    let started_at = Instant::now();

    let blob = match read_archive(path, MAX_BLOB_BYTES) {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            info!("event=meals_load module=store status=not_found");
            return Ok(None);
        }
        Err(err) => {
            error!(
                "event=meals_load module=store status=error duration_ms={} error_code={} error={}",
                started_at.elapsed().as_millis(),
                err.code(),
                err
            );
            return Err(err);
        }
    };

    match decode_meals(&blob) {
        Ok(meals) => {
            info!(
                "event=meals_load module=store status=ok count={} bytes={} duration_ms={}",
                meals.len(),
                blob.len(),
                started_at.elapsed().as_millis()
            );
            Ok(Some(meals))
        }
        Err(err) => {
            warn!(
                "event=meals_load module=store status=error bytes={} duration_ms={} error_code={} error={}",
                blob.len(),
                started_at.elapsed().as_millis(),
                err.code(),
                err
            );
            Err(err)
        }
    }
}

fn read_archive(path: &Path, max_bytes: usize) -> StoreResult<Option<Vec<u8>>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(StoreError::io(path, err)),
    };

    let len = file.metadata().map_err(|err| StoreError::io(path, err))?.len();
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    if len > limit {
        return Err(too_large(len, max_bytes));
    }

    // The file may grow after the metadata check; never read past the cap.
    let mut blob = Vec::with_capacity(usize::try_from(len).unwrap_or(max_bytes));
    file.take(limit.saturating_add(1))
        .read_to_end(&mut blob)
        .map_err(|err| StoreError::io(path, err))?;
    if blob.len() > max_bytes {
        return Err(too_large(blob.len() as u64, max_bytes));
    }

    Ok(Some(blob))
}

fn too_large(len: u64, max_bytes: usize) -> StoreError {
    CorruptReason::TooLarge {
        len: usize::try_from(len).unwrap_or(usize::MAX),
        max: max_bytes,
    }
    .into()
}

fn write_archive(meals: &[Meal], path: &Path, max_bytes: usize) -> StoreResult<usize> {
    let blob = encode_meals_capped(meals, max_bytes)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|err| StoreError::io(dir, err))?;

    // Dropping `tmp` before `persist` succeeds deletes the temp file.
    let mut tmp = NamedTempFile::new_in(dir).map_err(|err| StoreError::io(dir, err))?;
    tmp.write_all(&blob)
        .map_err(|err| StoreError::io(tmp.path(), err))?;
    tmp.as_file()
        .sync_all()
        .map_err(|err| StoreError::io(tmp.path(), err))?;
    tmp.persist(path)
        .map_err(|err| StoreError::io(path, err.error))?;

    Ok(blob.len())
}
