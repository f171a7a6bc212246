//! Type-safe unit price representation using decimal arithmetic.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when constructing or using a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// Prices must be strictly greater than zero.
    #[error("price must be a positive number")]
    NotPositive,
    /// Prices are stored to the cent.
    #[error("price cannot have more than 2 decimal places")]
    TooPrecise,
    /// Prices must stay below [`Price::CEILING`].
    #[error("price must be less than 10000000000")]
    TooLarge,
    /// The computed amount does not fit the processor's integer range.
    #[error("amount overflows the minor currency unit range")]
    Overflow,
}

/// A positive unit price in the store currency's standard unit (dollars, not cents).
///
/// Serialized as a plain JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Exclusive upper bound, matching the `NUMERIC(12, 2)` price columns.
    pub const CEILING: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

    /// Create a price, rejecting zero and negative amounts, sub-cent
    /// precision and amounts at or above [`Price::CEILING`].
    ///
    /// # Errors
    ///
    /// - `PriceError::NotPositive` if `amount <= 0`
    /// - `PriceError::TooPrecise` if `amount` has more than 2 significant
    ///   decimal places
    /// - `PriceError::TooLarge` if `amount >= Price::CEILING`
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        if amount.normalize().scale() > 2 {
            return Err(PriceError::TooPrecise);
        }
        if amount >= Self::CEILING {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(amount))
    }

    /// The amount in standard units.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Total for `quantity` units, expressed in minor currency units (cents)
    /// and rounded half away from zero.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the total does not fit in an `i64`.
    ///
    /// # Example
    ///
    /// ```
    /// use pc_house_core::Price;
    /// use rust_decimal::Decimal;
    ///
    /// let price = Price::new(Decimal::new(1999, 2)).unwrap(); // 19.99
    /// assert_eq!(price.minor_units_for(3).unwrap(), 5997);
    /// ```
    pub fn minor_units_for(&self, quantity: u32) -> Result<i64, PriceError> {
        self.0
            .checked_mul(Decimal::from(quantity))
            .and_then(|total| total.checked_mul(Decimal::ONE_HUNDRED))
            .map(|cents| cents.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|cents| cents.to_i64())
            .ok_or(PriceError::Overflow)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

/// ISO 4217 currency codes accepted by the payment processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyCode {
    #[default]
    Usd,
    Eur,
    Gbp,
    Cad,
    Aud,
}

impl CurrencyCode {
    /// Lowercase code as the payment processor expects it.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Usd => "usd",
            Self::Eur => "eur",
            Self::Gbp => "gbp",
            Self::Cad => "cad",
            Self::Aud => "aud",
        }
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "usd" => Ok(Self::Usd),
            "eur" => Ok(Self::Eur),
            "gbp" => Ok(Self::Gbp),
            "cad" => Ok(Self::Cad),
            "aud" => Ok(Self::Aud),
            other => Err(format!("unsupported currency: {other}")),
        }
    }
}
