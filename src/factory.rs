// ============================================================================
// Money Factory
// Construction entry points and double-to-decimal decomposition
// ============================================================================

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use tracing::trace;

use crate::errors::{MoneyError, MoneyResult};
use crate::money::{Money, Repr};
use crate::scaled::{div_round_half_up, pow10_i128, ScaledMoney};
use crate::unbounded::{ten_pow, BigMoney};

// ============================================================================
// Double Decomposition
// ============================================================================

/// Decompose a finite double into `(digits, exp10)` such that the value is
/// exactly `digits x 10^exp10`, using the double's shortest decimal form.
///
/// Rust's `Display` for floats emits the shortest decimal digits that
/// round-trip, so `0.1f64` decomposes to `(1, -1)` — the literal a human
/// wrote, not the nearest binary fraction. Rounding the binary value
/// directly would be a correctness bug.
///
/// The shortest form has at most 17 significant digits, so `digits` always
/// fits i64.
///
/// # Errors
/// Returns `NonFinite` for NaN or infinity.
pub(crate) fn decompose_f64(value: f64) -> MoneyResult<(i64, i32)> {
    if !value.is_finite() {
        return Err(MoneyError::NonFinite);
    }
    Ok(parse_decimal_digits(&value.to_string()))
}

fn parse_decimal_digits(text: &str) -> (i64, i32) {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    // `Display` never emits an exponent for finite floats, but accept one
    // so the parser also covers `{:e}`-style input
    let (mantissa_text, exp) = match rest.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (
            mantissa,
            exponent
                .parse::<i32>()
                .expect("float formatting yields a valid exponent"),
        ),
        None => (rest, 0),
    };
    let (int_text, frac_text) = match mantissa_text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (mantissa_text, ""),
    };

    let digits = format!("{}{}", int_text, frac_text);
    let significant = digits.trim_end_matches('0');
    if significant.trim_start_matches('0').is_empty() {
        return (0, 0);
    }
    let exp10 = exp - frac_text.len() as i32 + (digits.len() - significant.len()) as i32;
    let magnitude: i64 = significant
        .parse()
        .expect("shortest f64 decimal fits i64");
    (if negative { -magnitude } else { magnitude }, exp10)
}

// ============================================================================
// Construction
// ============================================================================

impl Money {
    /// Build from an exact integer count of minimal units: `from_units(199, 2)`
    /// is `1.99`. Always takes the scaled-integer representation — the caller
    /// already supplied an exact i64 mantissa.
    #[inline]
    pub fn from_units(units: i64, scale: u32) -> Money {
        Money::from_scaled(ScaledMoney::new(units, scale))
    }

    /// Build from a double, rounding its shortest exact decimal form half-up
    /// to `scale` digits: `from_f64(0.555, 1)` is `0.6`.
    ///
    /// The result is scaled-integer-backed whenever the rounded mantissa
    /// fits i64, arbitrary-precision-backed otherwise.
    ///
    /// # Errors
    /// Returns `NonFinite` for NaN or infinity.
    pub fn from_f64(value: f64, scale: u32) -> MoneyResult<Money> {
        let (digits, exp10) = decompose_f64(value)?;
        // mantissa = round(digits x 10^(exp10 + scale))
        let shift = i64::from(exp10) + i64::from(scale);
        if shift >= 0 {
            let widened = u32::try_from(shift)
                .ok()
                .and_then(pow10_i128)
                .and_then(|p| i128::from(digits).checked_mul(p));
            return Ok(match widened {
                Some(mantissa) => match i64::try_from(mantissa) {
                    Ok(m) => Money::from_scaled(ScaledMoney::new(m, scale)),
                    Err(_) => Money::from_big(BigMoney::new(BigInt::from(mantissa), scale)),
                },
                None => {
                    trace!(value, scale, "from_f64 fell back to arbitrary precision");
                    let unscaled = BigInt::from(digits) * ten_pow(shift.unsigned_abs());
                    Money::from_big(BigMoney::new(unscaled, scale))
                },
            });
        }
        let mantissa = match u32::try_from(shift.unsigned_abs()).ok().and_then(pow10_i128) {
            Some(den) => div_round_half_up(i128::from(digits), den),
            // the divisor dwarfs any 17-digit mantissa; rounds to zero
            None => 0,
        };
        // |mantissa| <= |digits| < 10^18, so the cast is lossless
        Ok(Money::from_scaled(ScaledMoney::new(mantissa as i64, scale)))
    }

    // ========================================================================
    // Conversion against rust_decimal (for API boundaries)
    // ========================================================================

    /// Convert from `rust_decimal::Decimal`, preserving mantissa and scale
    /// exactly. Intended for API boundaries (parsed user input, quotes).
    pub fn from_decimal(value: Decimal) -> Money {
        let scale = value.scale();
        match i64::try_from(value.mantissa()) {
            Ok(mantissa) => Money::from_scaled(ScaledMoney::new(mantissa, scale)),
            Err(_) => Money::from_big(BigMoney::new(BigInt::from(value.mantissa()), scale)),
        }
    }

    /// Convert to `rust_decimal::Decimal`, or `None` when the value exceeds
    /// `Decimal`'s 96-bit mantissa or 28-digit scale envelope.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match &self.0 {
            Repr::Scaled(scaled) => {
                Decimal::try_from_i128_with_scale(i128::from(scaled.mantissa), scaled.scale).ok()
            },
            Repr::Big(big) => big
                .unscaled
                .to_i128()
                .and_then(|m| Decimal::try_from_i128_with_scale(m, big.scale).ok()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
