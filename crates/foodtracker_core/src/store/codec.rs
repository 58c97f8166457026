//! Binary codec for the meal archive.
//!
//! # Responsibility
//! - Turn an ordered meal list into one self-describing blob and back.
//! - Rebuild every decoded meal through `Meal::new`.
//!
//! # Invariants
//! - Meal fields are stored as `(tag, value)` pairs with stable tags, so
//!   field order is free and unknown tags are skipped on decode.
//! - The payload is sealed with a SHA-256 digest; truncated or mutated
//!   blobs are rejected instead of decoding to different meals.
//! - A missing or mistyped `name` fails the whole decode, while a
//!   missing or mistyped `photo` decodes as no photo.
//!
//! # Wire layout
//! ```text
//! bincode(ArchiveEnvelope {
//!     magic: b"FTMEALS\0",
//!     format_version: 1,
//!     digest: sha256(payload),
//!     payload: bincode(Vec<ArchivedMeal>),
//! })
//! ```

use super::{CorruptReason, StoreResult};
use crate::model::meal::Meal;
use bincode::config::Config;
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const ARCHIVE_MAGIC: [u8; 8] = *b"FTMEALS\0";
const FORMAT_VERSION: u32 = 1;
pub(crate) const MAX_BLOB_BYTES: usize = 256 * 1024 * 1024;

const TAG_NAME: &str = "name";
const TAG_PHOTO: &str = "photo";
const TAG_RATING: &str = "rating";

#[derive(Debug, Serialize, Deserialize)]
struct ArchiveEnvelope {
    magic: [u8; 8],
    format_version: u32,
    digest: [u8; 32],
    payload: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ArchivedMeal {
    fields: Vec<ArchivedField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ArchivedField {
    tag: String,
    value: FieldValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum FieldValue {
    Text(String),
    Bytes(Vec<u8>),
    Integer(i64),
    Absent,
}

/// Encodes the whole meal list, preserving order.
///
/// Output is deterministic for a given input.
///
/// # Errors
/// - `StoreError::Corrupt(CorruptReason::TooLarge)` if the blob would exceed
///   the size `decode_meals` accepts.
/// - `StoreError::Corrupt(CorruptReason::Encode)` if the encoder fails.
pub fn encode_meals(meals: &[Meal]) -> StoreResult<Vec<u8>> {
    encode_meals_capped(meals, MAX_BLOB_BYTES)
}

pub(crate) fn encode_meals_capped(meals: &[Meal], max_bytes: usize) -> StoreResult<Vec<u8>> {
    let archived = meals.iter().map(archive_meal).collect::<Vec<_>>();
    seal(&archived, max_bytes)
}

/// Decodes a blob produced by [`encode_meals`].
///
/// # Errors
/// - `StoreError::Corrupt` when the blob is malformed, was not produced by
///   `encode_meals`, or any stored meal fails validation.
pub fn decode_meals(blob: &[u8]) -> StoreResult<Vec<Meal>> {
    let archived = unseal(blob)?;
    let mut meals = Vec::with_capacity(archived.len());
    for (index, meal) in archived.into_iter().enumerate() {
        meals.push(restore_meal(index, meal)?);
    }
    Ok(meals)
}

fn config() -> impl Config {
    bincode::config::standard().with_limit::<MAX_BLOB_BYTES>()
}

fn archive_meal(meal: &Meal) -> ArchivedMeal {
    let photo = match meal.photo() {
        Some(bytes) => FieldValue::Bytes(bytes.to_vec()),
        None => FieldValue::Absent,
    };

    ArchivedMeal {
        fields: vec![
            ArchivedField {
                tag: TAG_NAME.to_string(),
                value: FieldValue::Text(meal.name().to_string()),
            },
            ArchivedField {
                tag: TAG_PHOTO.to_string(),
                value: photo,
            },
            ArchivedField {
                tag: TAG_RATING.to_string(),
                value: FieldValue::Integer(i64::from(meal.rating())),
            },
        ],
    }
}

fn restore_meal(index: usize, archived: ArchivedMeal) -> StoreResult<Meal> {
    let mut name = None;
    let mut photo = None;
    let mut rating = None;

    for field in archived.fields {
        let slot = match field.tag.as_str() {
            TAG_NAME => &mut name,
            TAG_PHOTO => &mut photo,
            TAG_RATING => &mut rating,
            // Unknown tags come from newer writers.
            _ => continue,
        };
        if slot.is_some() {
            return Err(CorruptReason::DuplicateField {
                index,
                tag: field.tag,
            }
            .into());
        }
        *slot = Some(field.value);
    }

    let name = match name {
        Some(FieldValue::Text(name)) => name,
        _ => {
            debug!("event=meal_decode module=store status=error reason=missing_name index={index}");
            return Err(CorruptReason::MissingName { index }.into());
        }
    };

    let photo = match photo {
        Some(FieldValue::Bytes(bytes)) => Some(bytes),
        _ => None,
    };

    let rating = match rating {
        Some(FieldValue::Integer(rating)) => rating,
        None => 0,
        Some(_) => {
            return Err(CorruptReason::FieldType {
                index,
                tag: TAG_RATING,
            }
            .into());
        }
    };

    Meal::new(name, photo, rating)
        .map_err(|error| CorruptReason::InvalidMeal { index, error }.into())
}

fn seal(archived: &[ArchivedMeal], max_bytes: usize) -> StoreResult<Vec<u8>> {
    let payload = bincode::serde::encode_to_vec(archived, config())
        .map_err(|err| CorruptReason::Encode(err.to_string()))?;

    let envelope = ArchiveEnvelope {
        magic: ARCHIVE_MAGIC,
        format_version: FORMAT_VERSION,
        digest: payload_digest(&payload),
        payload,
    };

    let blob = bincode::serde::encode_to_vec(&envelope, config())
        .map_err(|err| CorruptReason::Encode(err.to_string()))?;
    // Never hand out a blob that decoding would refuse.
    if blob.len() > max_bytes {
        return Err(CorruptReason::TooLarge {
            len: blob.len(),
            max: max_bytes,
        }
        .into());
    }
    Ok(blob)
}

fn unseal(blob: &[u8]) -> StoreResult<Vec<ArchivedMeal>> {
    if blob.len() > MAX_BLOB_BYTES {
        return Err(CorruptReason::TooLarge {
            len: blob.len(),
            max: MAX_BLOB_BYTES,
        }
        .into());
    }

    let (envelope, read): (ArchiveEnvelope, usize) =
        bincode::serde::decode_from_slice(blob, config())
            .map_err(|err| CorruptReason::Envelope(err.to_string()))?;
    if read != blob.len() {
        return Err(CorruptReason::TrailingBytes {
            extra: blob.len() - read,
        }
        .into());
    }
    if envelope.magic != ARCHIVE_MAGIC {
        return Err(CorruptReason::BadMagic.into());
    }
    if envelope.format_version != FORMAT_VERSION {
        return Err(CorruptReason::UnsupportedVersion(envelope.format_version).into());
    }
    if payload_digest(&envelope.payload) != envelope.digest {
        return Err(CorruptReason::DigestMismatch.into());
    }

    let (archived, read): (Vec<ArchivedMeal>, usize) =
        bincode::serde::decode_from_slice(&envelope.payload, config())
            .map_err(|err| CorruptReason::Payload(err.to_string()))?;
    if read != envelope.payload.len() {
        return Err(CorruptReason::Payload(format!(
            "{} trailing byte(s) after meal list",
            envelope.payload.len() - read
        ))
        .into());
    }

    Ok(archived)
}

fn payload_digest(payload: &[u8]) -> [u8; 32] {
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&Sha256::digest(payload));
    digest
}
