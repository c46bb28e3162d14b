//! Integer minor-unit currency.
//!
//! All amounts are stored as signed 64-bit minor units (cents). Fee and
//! payout arithmetic stays exact — no floating point, no decimal rounding
//! modes. Wallet balances are never persisted negative; [`Amount`] itself
//! can hold a negative value only transiently (e.g. audit deltas).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::MINOR_UNITS_PER_MAJOR;

/// A currency amount in minor units (cents).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(pub i64);

impl Amount {
    /// Zero.
    pub const ZERO: Amount = Amount(0);

    /// Construct from minor units (cents).
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Construct from whole major units (dollars).
    #[must_use]
    pub const fn from_major(major: i64) -> Self {
        Self(major * MINOR_UNITS_PER_MAJOR)
    }

    /// The raw minor-unit value.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition. `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Checked subtraction. `None` on overflow.
    #[must_use]
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per_major = MINOR_UNITS_PER_MAJOR.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / per_major, abs % per_major)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_major_scales() {
        assert_eq!(Amount::from_major(20), Amount::from_minor(2_000));
    }

    #[test]
    fn display_formats_minor_units() {
        assert_eq!(Amount::from_minor(1_234).to_string(), "12.34");
        assert_eq!(Amount::from_minor(5).to_string(), "0.05");
        assert_eq!(Amount::ZERO.to_string(), "0.00");
        assert_eq!(Amount::from_minor(-1_050).to_string(), "-10.50");
    }

    #[test]
    fn checked_arithmetic() {
        let a = Amount::from_minor(100);
        let b = Amount::from_minor(40);
        assert_eq!(a.checked_add(b), Some(Amount::from_minor(140)));
        assert_eq!(a.checked_sub(b), Some(Amount::from_minor(60)));
        assert_eq!(Amount(i64::MAX).checked_add(Amount(1)), None);
    }

    #[test]
    fn sign_predicates() {
        assert!(Amount::from_minor(1).is_positive());
        assert!(Amount::from_minor(-1).is_negative());
        assert!(Amount::ZERO.is_zero());
        assert!(!Amount::ZERO.is_positive());
    }

    #[test]
    fn serde_roundtrip_is_transparent() {
        let a = Amount::from_minor(2_000);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, "2000");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(a, back);
    }
}
