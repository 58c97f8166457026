//! Meal archive storage.
//!
//! # Responsibility
//! - Encode/decode the ordered meal list as one binary blob (`codec`).
//! - Read and atomically replace the archive file on disk (`file`).
//!
//! # Invariants
//! - The archive always holds the whole list; there is no append log.
//! - A missing archive is a normal first-run state, not an error.
//! - Decoding never yields a partially populated list.

use crate::model::meal::MealValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

pub mod codec;
mod file;

pub use codec::{decode_meals, encode_meals};
pub use file::{load_meals, save_meals};

/// Fixed archive file name inside the host documents directory.
pub const ARCHIVE_FILE_NAME: &str = "meals";

pub type StoreResult<T> = Result<T, StoreError>;

/// Returns the archive location for a documents directory.
pub fn archive_path(documents_dir: impl AsRef<Path>) -> PathBuf {
    documents_dir.as_ref().join(ARCHIVE_FILE_NAME)
}

/// Storage-level failure for meal archive operations.
#[derive(Debug)]
pub enum StoreError {
    /// Filesystem failure while reading or writing `path`.
    Io { path: PathBuf, source: io::Error },
    /// Archive bytes are malformed or were not produced by `encode_meals`.
    Corrupt(CorruptReason),
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Stable short code used in log lines and FFI messages.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io_error",
            Self::Corrupt(_) => "corrupt_store",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "meal archive I/O failed at `{}`: {source}", path.display())
            }
            Self::Corrupt(reason) => write!(f, "meal archive is corrupt: {reason}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Corrupt(reason) => reason.source(),
        }
    }
}

impl From<CorruptReason> for StoreError {
    fn from(value: CorruptReason) -> Self {
        Self::Corrupt(value)
    }
}

/// Why an archive blob was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorruptReason {
    /// Blob exceeds the decode size cap.
    TooLarge { len: usize, max: usize },
    /// Envelope bytes could not be decoded.
    Envelope(String),
    /// Bytes remain after the envelope.
    TrailingBytes { extra: usize },
    /// Blob does not start with the archive magic.
    BadMagic,
    /// Archive was written by an unknown format version.
    UnsupportedVersion(u32),
    /// Payload digest does not match the stored digest.
    DigestMismatch,
    /// Payload bytes could not be decoded.
    Payload(String),
    /// Meal at `index` has no decodable `name` field.
    MissingName { index: usize },
    /// Field `tag` of meal `index` carries the wrong value kind.
    FieldType { index: usize, tag: &'static str },
    /// Field `tag` appears more than once in meal `index`.
    DuplicateField { index: usize, tag: String },
    /// Meal at `index` failed record validation.
    InvalidMeal {
        index: usize,
        error: MealValidationError,
    },
    /// Encoder failure while producing a blob.
    Encode(String),
}

impl Display for CorruptReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooLarge { len, max } => {
                write!(f, "blob of {len} bytes exceeds limit of {max} bytes")
            }
            Self::Envelope(message) => write!(f, "unreadable envelope: {message}"),
            Self::TrailingBytes { extra } => {
                write!(f, "{extra} unexpected trailing byte(s) after envelope")
            }
            Self::BadMagic => write!(f, "missing meal archive magic"),
            Self::UnsupportedVersion(version) => {
                write!(f, "unsupported archive format version {version}")
            }
            Self::DigestMismatch => write!(f, "payload digest mismatch"),
            Self::Payload(message) => write!(f, "unreadable payload: {message}"),
            Self::MissingName { index } => write!(f, "meal #{index} has no decodable name"),
            Self::FieldType { index, tag } => {
                write!(f, "meal #{index} field `{tag}` has unexpected type")
            }
            Self::DuplicateField { index, tag } => {
                write!(f, "meal #{index} repeats field `{tag}`")
            }
            Self::InvalidMeal { index, error } => write!(f, "meal #{index} is invalid: {error}"),
            Self::Encode(message) => write!(f, "failed to encode meals: {message}"),
        }
    }
}

impl Error for CorruptReason {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidMeal { error, .. } => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{archive_path, CorruptReason, StoreError, ARCHIVE_FILE_NAME};
    use crate::model::meal::MealValidationError;
    use std::error::Error;
    use std::path::Path;

    #[test]
    fn archive_path_appends_fixed_file_name() {
        let path = archive_path("/data/app/Documents");
        assert_eq!(path, Path::new("/data/app/Documents").join(ARCHIVE_FILE_NAME));
        assert!(path.ends_with("meals"));
    }

    #[test]
    fn corrupt_error_chains_validation_source() {
        let err = StoreError::from(CorruptReason::InvalidMeal {
            index: 2,
            error: MealValidationError::RatingOutOfRange(9),
        });
        assert_eq!(err.code(), "corrupt_store");
        assert!(err.to_string().contains("meal #2"));
        let source = err.source().expect("validation error should be chained");
        assert!(source.to_string().contains("(9)"));
    }
}
