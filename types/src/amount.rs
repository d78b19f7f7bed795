//! Monetary amount type.
//!
//! Amounts are real numbers (`f64`) denominated in the session's unit (BTC by
//! default). Payouts are computed as `amount * share` with no rounding beyond
//! what the floating-point representation imposes.

use crate::error::TypesError;
use crate::share::Share;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

/// An amount of money flowing through the revenue router.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
    pub const ZERO: Self = Self(0.0);

    /// Wrap a raw value. No validation: the distribution engine is total over
    /// its inputs, gating belongs to the caller.
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Wrap a value supplied by a user, rejecting NaN and infinities.
    pub fn try_new(value: f64) -> Result<Self, TypesError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(TypesError::NonFiniteAmount(value))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0.0
    }

    /// Render with a fixed number of decimals, e.g. `1.2500` for 4.
    pub fn format_fixed(&self, decimals: usize) -> String {
        format!("{:.*}", decimals, self.0)
    }

    /// Shortest decimal form, with at least one fractional digit: `1.0`, `0.375`.
    pub fn decimal_label(&self) -> String {
        if self.0.is_finite() && self.0.fract() == 0.0 {
            format!("{:.1}", self.0)
        } else {
            self.0.to_string()
        }
    }
}

impl Add for Amount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Mul<Share> for Amount {
    type Output = Self;
    fn mul(self, rhs: Share) -> Self {
        Self(self.0 * rhs.fraction())
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
