//! Cent rounding and the divide-by-zero guard.
//!
//! Every reported figure is rounded to cents before it is combined with
//! another figure, so sums of rounded values are what the reports carry.

use crate::types::Money;

/// Round to 2 decimal places, halves away from zero.
pub fn round_cents(value: Money) -> Money {
    // Nudge by a tiny epsilon so 0.125-style values that are stored as
    // 0.12499999... still round up.
    let scaled = value * 100.0;
    let nudged = scaled + scaled.signum() * 1e-9;
    nudged.round() / 100.0
}

/// `numerator / denominator`, or 0 when the denominator is zero.
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up_to_cents() {
        assert_eq!(round_cents(700.000_000_1), 700.0);
        assert_eq!(round_cents(0.125), 0.13);
        assert_eq!(round_cents(10.005), 10.01);
        assert_eq!(round_cents(-0.125), -0.13);
        assert_eq!(round_cents(0.0), 0.0);
    }

    #[test]
    fn zero_denominator_yields_zero() {
        assert_eq!(ratio_or_zero(1500.0, 0.0), 0.0);
        assert_eq!(ratio_or_zero(0.0, 0.0), 0.0);
        assert_eq!(ratio_or_zero(10.0, 4.0), 2.5);
    }
}
