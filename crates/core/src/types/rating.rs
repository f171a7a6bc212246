//! Review star rating.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when a rating is outside the accepted scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RatingError {
    /// The value has a fractional part.
    #[error("rating must be a whole number")]
    NotInteger,
    /// The value is outside 1..=5.
    #[error("rating must be between {min} and {max}", min = Rating::MIN, max = Rating::MAX)]
    OutOfRange,
}

/// A 1-5 star rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: u8 = 1;
    /// Highest accepted rating.
    pub const MAX: u8 = 5;

    /// Validate a JSON number as a rating.
    ///
    /// `4.0` is accepted, `4.5` is not.
    ///
    /// # Errors
    ///
    /// Returns `RatingError` for fractional or out-of-range values.
    pub fn from_number(value: f64) -> Result<Self, RatingError> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(RatingError::NotInteger);
        }
        if value < f64::from(Self::MIN) || value > f64::from(Self::MAX) {
            return Err(RatingError::OutOfRange);
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // range checked above
        Ok(Self(value as u8))
    }

    /// The rating value.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<f64> for Rating {
    type Error = RatingError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_number(value)
    }
}

impl TryFrom<i16> for Rating {
    type Error = RatingError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::from_number(f64::from(value))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}
