//! Meal domain model.
//!
//! # Responsibility
//! - Define the meal record (name, optional photo, star rating).
//! - Enforce record invariants at the only construction entry point.
//!
//! # Invariants
//! - `name` is non-empty and kept verbatim (no trimming).
//! - `rating` is within `MIN_RATING..=MAX_RATING`.
//! - `photo` is opaque bytes; core never decodes image content.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lowest accepted star rating.
pub const MIN_RATING: i64 = 0;
/// Highest accepted star rating.
pub const MAX_RATING: i64 = 5;

/// Validation failures for meal construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MealValidationError {
    /// `name` was the empty string.
    EmptyName,
    /// `rating` fell outside `MIN_RATING..=MAX_RATING`.
    RatingOutOfRange(i64),
}

impl Display for MealValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "meal name must not be empty"),
            Self::RatingOutOfRange(rating) => write!(
                f,
                "meal rating ({rating}) must be between {MIN_RATING} and {MAX_RATING}"
            ),
        }
    }
}

impl Error for MealValidationError {}

/// One recorded meal.
///
/// Fields are private so every instance goes through [`Meal::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meal {
    name: String,
    photo: Option<Vec<u8>>,
    rating: u8,
}

impl Meal {
    /// Builds a validated meal.
    ///
    /// `rating` is taken as a signed integer so out-of-range input coming
    /// from UI controls or disk is representable and rejected here.
    ///
    /// # Errors
    /// - `EmptyName` when `name` is empty (checked first).
    /// - `RatingOutOfRange` when `rating` is outside `0..=5`.
    pub fn new(
        name: impl Into<String>,
        photo: Option<Vec<u8>>,
        rating: i64,
    ) -> Result<Self, MealValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(MealValidationError::EmptyName);
        }
        let rating = validate_rating(rating)?;

        Ok(Self {
            name,
            photo,
            rating,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw photo payload, if one was attached.
    pub fn photo(&self) -> Option<&[u8]> {
        self.photo.as_deref()
    }

    pub fn has_photo(&self) -> bool {
        self.photo.is_some()
    }

    /// Star rating in `0..=5`.
    pub fn rating(&self) -> u8 {
        self.rating
    }

    /// Consumes the meal and returns `(name, photo, rating)`.
    pub fn into_parts(self) -> (String, Option<Vec<u8>>, u8) {
        (self.name, self.photo, self.rating)
    }
}

fn validate_rating(rating: i64) -> Result<u8, MealValidationError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(MealValidationError::RatingOutOfRange(rating));
    }
    u8::try_from(rating).map_err(|_| MealValidationError::RatingOutOfRange(rating))
}
