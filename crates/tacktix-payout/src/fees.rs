//! Platform fee arithmetic.
//!
//! Fees are a basis-point share of the prize, computed in exact integer
//! minor units. The fee rounds down, so `fee + net == prize` always and
//! rounding never creates or destroys a minor unit.

use tacktix_types::constants::{BPS_SCALE, DEFAULT_FEE_BPS};
use tacktix_types::Amount;

/// A prize split into the platform's share and the winner's net credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSplit {
    pub fee: Amount,
    pub net: Amount,
}

/// Basis-point fee policy (1000 bps == 10%).
#[derive(Debug, Clone, Copy)]
pub struct FeePolicy {
    fee_bps: u32,
}

impl FeePolicy {
    /// Create a policy.
    ///
    /// # Panics
    /// Panics if `fee_bps` exceeds 100% — a misconfiguration, not an input.
    #[must_use]
    pub fn new(fee_bps: u32) -> Self {
        assert!(fee_bps <= BPS_SCALE, "fee_bps must be <= {BPS_SCALE}");
        Self { fee_bps }
    }

    #[must_use]
    pub fn fee_bps(&self) -> u32 {
        self.fee_bps
    }

    /// Split a prize into fee and net. The caller guarantees a positive
    /// prize; the split itself cannot fail or overflow.
    #[must_use]
    pub fn split(&self, prize: Amount) -> FeeSplit {
        // i128 headroom: i64::MAX * 10_000 overflows i64 but not i128.
        let fee_minor = i128::from(prize.minor()) * i128::from(self.fee_bps)
            / i128::from(BPS_SCALE);
        #[allow(clippy::cast_possible_truncation)]
        let fee = Amount::from_minor(fee_minor as i64);
        FeeSplit {
            fee,
            net: Amount::from_minor(prize.minor() - fee.minor()),
        }
    }
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_FEE_BPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minor(v: i64) -> Amount {
        Amount::from_minor(v)
    }

    #[test]
    fn ten_percent_of_1000() {
        let split = FeePolicy::default().split(minor(1_000));
        assert_eq!(split.fee, minor(100));
        assert_eq!(split.net, minor(900));
    }

    #[test]
    fn ten_percent_of_2000() {
        let split = FeePolicy::default().split(minor(2_000));
        assert_eq!(split.fee, minor(200));
        assert_eq!(split.net, minor(1_800));
    }

    #[test]
    fn fee_rounds_down_and_conserves() {
        let policy = FeePolicy::default();
        for prize in [1, 7, 99, 999, 1_001, 123_457] {
            let split = policy.split(minor(prize));
            assert_eq!(
                split.fee.minor() + split.net.minor(),
                prize,
                "prize {prize} not conserved"
            );
            assert_eq!(split.fee.minor(), prize / 10);
        }
    }

    #[test]
    fn zero_bps_takes_nothing() {
        let split = FeePolicy::new(0).split(minor(1_000));
        assert_eq!(split.fee, Amount::ZERO);
        assert_eq!(split.net, minor(1_000));
    }

    #[test]
    fn custom_bps() {
        // 250 bps == 2.5%
        let split = FeePolicy::new(250).split(minor(10_000));
        assert_eq!(split.fee, minor(250));
        assert_eq!(split.net, minor(9_750));
    }

    #[test]
    fn large_prize_does_not_overflow() {
        let split = FeePolicy::default().split(Amount::from_minor(i64::MAX));
        assert_eq!(split.fee.minor() + split.net.minor(), i64::MAX);
    }

    #[test]
    #[should_panic(expected = "fee_bps must be <=")]
    fn over_100_percent_panics() {
        let _ = FeePolicy::new(10_001);
    }
}
