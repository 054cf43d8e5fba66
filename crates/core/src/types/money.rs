//! Fixed-point money representation using decimal arithmetic.
//!
//! Prices are always held at two decimal places. All arithmetic happens on
//! [`rust_decimal::Decimal`], never on floats, so cart and order totals are
//! exact.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Money`] amount.
#[derive(thiserror::Error, Debug, Clone)]
pub enum MoneyError {
    /// The input string is not a decimal number.
    #[error("invalid money amount: {0}")]
    Invalid(String),
}

/// A monetary amount, normalized to two decimal places.
///
/// The half-up rounding used by [`Money::from_decimal`] matches how the
/// storefront rounds computed totals (e.g. `115.994` → `115.99`,
/// `115.995` → `116.00`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a `Money` from a decimal, rounding half-up to two places.
    ///
    /// The result always carries exactly two decimal places, so `5` and
    /// `5.00` serialize identically.
    #[must_use]
    pub fn from_decimal(amount: Decimal) -> Self {
        let mut amount = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        amount.rescale(2);
        Self(amount)
    }

    /// Create a `Money` from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Parse a `Money` from a decimal string such as `"12.99"`.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Invalid` if the string is not a decimal number.
    pub fn parse(s: &str) -> Result<Self, MoneyError> {
        let amount: Decimal = s
            .trim()
            .parse()
            .map_err(|_| MoneyError::Invalid(s.to_owned()))?;
        Ok(Self::from_decimal(amount))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiply a unit price by a quantity, e.g. for a cart line total.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self::from_decimal(self.0 * Decimal::from(quantity))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl std::str::FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
