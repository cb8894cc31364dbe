//! Points type for displaying and parsing ledger figures.
//!
//! This module provides the `Points` type which wraps `Decimal` and handles values that may or may
//! not include commas as thousands separators.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents a quantity of points (the monetary unit moved between branches) or a commission.
///
/// Displays with commas and two decimal places. Parsing accepts values with or without commas.
///
/// # Examples
///
/// ```
/// # use angadia_ledger::model::Points;
/// # use std::str::FromStr;
/// let points = Points::from_str("-1,234.5").unwrap();
/// assert_eq!(points.to_string(), "-1,234.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Points(Decimal);

impl Points {
    pub const ZERO: Points = Points(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the value is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true if the value is strictly less than zero.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }
}

/// An error that can occur when parsing strings into `Points`.
pub struct PointsError(rust_decimal::Error);

impl Debug for PointsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for PointsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Error for PointsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Points {
    type Err = PointsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Points::default());
        }
        let without_commas = trimmed.replace(',', "");
        let value = Decimal::from_str(&without_commas).map_err(PointsError)?;
        Ok(Points(value))
    }
}

impl Display for Points {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (sign, num) = if self.is_negative() {
            ("-", self.0.abs())
        } else {
            ("", self.0)
        };
        write!(
            f,
            "{sign}{}",
            format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
        )
    }
}

impl Serialize for Points {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Serialize::serialize(&self.0, serializer)
    }
}

impl From<Decimal> for Points {
    fn from(value: Decimal) -> Self {
        Points(value)
    }
}

impl From<Points> for Decimal {
    fn from(points: Points) -> Self {
        points.value()
    }
}
