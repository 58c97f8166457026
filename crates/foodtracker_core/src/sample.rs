//! Built-in sample meals shown on first launch.
//!
//! # Invariants
//! - Sample entries are literals that always pass `Meal::new`.
//! - Photo bytes are supplied by the host, looked up by asset name.

use crate::model::meal::Meal;

/// One literal sample entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleMeal {
    pub name: &'static str,
    /// Host asset name holding the sample photo.
    pub photo_asset: &'static str,
    pub rating: i64,
}

pub const SAMPLE_MEALS: &[SampleMeal] = &[
    SampleMeal {
        name: "Caprese Salad",
        photo_asset: "meal1",
        rating: 4,
    },
    SampleMeal {
        name: "Chicken and Potatoes",
        photo_asset: "meal2",
        rating: 5,
    },
    SampleMeal {
        name: "Pasta with Meatballs",
        photo_asset: "meal3",
        rating: 3,
    },
];

/// Builds the sample meals, asking `load_photo` for each asset's bytes.
///
/// # Panics
/// - If a literal in `SAMPLE_MEALS` fails validation. This cannot be
///   triggered by user input or disk contents.
pub fn sample_meals(mut load_photo: impl FnMut(&str) -> Option<Vec<u8>>) -> Vec<Meal> {
    SAMPLE_MEALS
        .iter()
        .map(|sample| {
            Meal::new(sample.name, load_photo(sample.photo_asset), sample.rating)
                .unwrap_or_else(|err| panic!("sample meal `{}` is invalid: {err}", sample.name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{sample_meals, SAMPLE_MEALS};

    #[test]
    fn sample_meals_follow_literal_order() {
        let meals = sample_meals(|_| None);
        let names = meals.iter().map(|meal| meal.name()).collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["Caprese Salad", "Chicken and Potatoes", "Pasta with Meatballs"]
        );
        assert_eq!(
            meals.iter().map(|meal| meal.rating()).collect::<Vec<_>>(),
            vec![4, 5, 3]
        );
    }

    #[test]
    fn sample_meals_request_each_asset_once() {
        let mut requested = Vec::new();
        let meals = sample_meals(|asset| {
            requested.push(asset.to_string());
            (asset == "meal2").then(|| vec![2; 4])
        });

        assert_eq!(requested, vec!["meal1", "meal2", "meal3"]);
        assert_eq!(meals[0].photo(), None);
        assert_eq!(meals[1].photo(), Some(&[2u8, 2, 2, 2][..]));
        assert_eq!(meals.len(), SAMPLE_MEALS.len());
    }
}
