//! Stakeholder share fractions.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stakeholder's claim on incoming revenue, as a fraction in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Share(f64);

impl Share {
    pub const ZERO: Self = Self(0.0);
    pub const WHOLE: Self = Self(1.0);

    /// Create a share, rejecting values outside `[0, 1]` and non-finite input.
    pub fn new(fraction: f64) -> Result<Self, TypesError> {
        if fraction.is_finite() && (0.0..=1.0).contains(&fraction) {
            Ok(Self(fraction))
        } else {
            Err(TypesError::ShareOutOfRange(fraction))
        }
    }

    /// Create a share from a percentage, e.g. `20.0` for one fifth.
    pub fn from_percent(percent: f64) -> Result<Self, TypesError> {
        Self::new(percent / 100.0)
    }

    pub fn fraction(&self) -> f64 {
        self.0
    }

    /// `share * 100`, unrounded.
    pub fn percent(&self) -> f64 {
        self.0 * 100.0
    }

    /// The percentage as it appears in payout notes: whole values keep one
    /// decimal place (`20.0`), anything else prints its shortest exact form.
    pub fn percent_label(&self) -> String {
        let p = self.percent();
        if p.fract() == 0.0 {
            format!("{p:.1}")
        } else {
            format!("{p}")
        }
    }
}

impl TryFrom<f64> for Share {
    type Error = TypesError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Share> for f64 {
    fn from(share: Share) -> Self {
        share.0
    }
}

impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent_label())
    }
}
