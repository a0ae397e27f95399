//! Shared helpers for rounding f64 values through `Decimal`.
//!
//! Displayed quantities are rounded through `Decimal` so the midpoint rule is
//! explicit:
//!
//! - `round_1dp`: weather values (temperature, wind, wave height)
//! - `round_2dp`: distances in km
//!
//! Both return `0.0` for non-finite inputs (NaN, ±Inf).

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

fn round_dp(v: f64, dp: u32, label: &str) -> f64 {
    if !v.is_finite() {
        tracing::warn!("{} received non-finite value {}, defaulting to 0", label, v);
        return 0.0;
    }
    Decimal::from_f64(v)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(0.0)
}

/// Round to 1 decimal place, halves away from zero.
pub(crate) fn round_1dp(v: f64) -> f64 {
    round_dp(v, 1, "round_1dp")
}

/// Round to 2 decimal places, halves away from zero.
pub(crate) fn round_2dp(v: f64) -> f64 {
    round_dp(v, 2, "round_2dp")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_1dp_normal() {
        assert_eq!(round_1dp(3.14), 3.1);
        assert_eq!(round_1dp(3.16), 3.2);
    }

    #[test]
    fn test_round_1dp_negative() {
        assert_eq!(round_1dp(-4.75), -4.8);
    }

    #[test]
    fn test_round_2dp_normal() {
        assert_eq!(round_2dp(111.19493), 111.19);
        assert_eq!(round_2dp(0.0), 0.0);
    }

    #[test]
    fn test_round_2dp_midpoint() {
        // 0.125 is exact in binary
        assert_eq!(round_2dp(0.125), 0.13);
        assert_eq!(round_2dp(-0.125), -0.13);
    }

    #[test]
    fn test_round_2dp_nan() {
        assert_eq!(round_2dp(f64::NAN), 0.0);
    }

    #[test]
    fn test_round_1dp_infinity() {
        assert_eq!(round_1dp(f64::INFINITY), 0.0);
        assert_eq!(round_1dp(f64::NEG_INFINITY), 0.0);
    }
}
