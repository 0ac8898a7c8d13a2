//! Monetary amounts.

use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// A per-unit or aggregate money amount in the smallest currency unit (e.g. kobo, cents).
///
/// Arithmetic saturates instead of wrapping.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn new(minor_units: u64) -> Self {
        Self(minor_units)
    }

    pub fn minor_units(self) -> u64 {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// `self × units`, saturating.
    pub fn times(self, units: u64) -> Money {
        Money(self.0.saturating_mul(units))
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Signed difference `self - other`, saturating at the `i64` bounds.
    pub fn signed_diff(self, other: Money) -> i64 {
        let diff = i128::from(self.0) - i128::from(other.0);
        diff.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }
}

impl ValueObject for Money {}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for Money {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn times_saturates() {
        assert_eq!(Money::new(15).times(4), Money::new(60));
        assert_eq!(Money::new(u64::MAX).times(2), Money::new(u64::MAX));
    }

    #[test]
    fn signed_diff_goes_negative() {
        assert_eq!(Money::new(10).signed_diff(Money::new(25)), -15);
        assert_eq!(Money::new(u64::MAX).signed_diff(Money::ZERO), i64::MAX);
    }
}
