// ============================================================================
// Money Abstraction
// Representation dispatch and promotion/demotion rules
// ============================================================================

use std::cmp::Ordering;
use std::fmt;

use num_bigint::BigInt;
use num_traits::Signed;
use tracing::trace;

use crate::errors::{MoneyError, MoneyResult};
use crate::factory::decompose_f64;
use crate::scaled::ScaledMoney;
use crate::unbounded::BigMoney;

/// Exact decimal money amount `unscaled x 10^-scale`.
///
/// Immutable: every operation returns a new value. Internally backed by
/// either a scaled i64 mantissa (the common case) or an arbitrary-precision
/// integer; which one is an optimization, never part of the contract. Any
/// fast-path operation that would overflow is recomputed in arbitrary
/// precision, and arbitrary-precision results are demoted back whenever the
/// unscaled value fits i64.
///
/// Equality and ordering compare the represented decimal value, so `1.50`
/// at scale 2 equals `1.5` at scale 1 regardless of backing.
///
/// # Example
/// ```rust
/// use exact_money::Money;
///
/// let price = Money::from_units(199, 2); // 1.99
/// let total = price.multiply(3);         // 5.97 exactly
/// assert_eq!(total, Money::from_units(597, 2));
/// ```
#[derive(Clone)]
pub struct Money(pub(crate) Repr);

#[derive(Clone)]
pub(crate) enum Repr {
    Scaled(ScaledMoney),
    Big(BigMoney),
}

impl Money {
    // ========================================================================
    // Internal Constructors
    // ========================================================================

    #[inline]
    pub(crate) fn from_scaled(value: ScaledMoney) -> Self {
        Money(Repr::Scaled(value))
    }

    /// Wrap an arbitrary-precision result, demoting to the scaled
    /// representation when the unscaled value fits i64. The scale is never
    /// altered here: demotion changes the backing, not the decimal value.
    pub(crate) fn from_big(value: BigMoney) -> Self {
        match value.to_scaled() {
            Some(scaled) => Money(Repr::Scaled(scaled)),
            None => Money(Repr::Big(value)),
        }
    }

    fn to_big(&self) -> BigMoney {
        match &self.0 {
            Repr::Scaled(scaled) => BigMoney::from_scaled(*scaled),
            Repr::Big(big) => big.clone(),
        }
    }

    /// Force the arbitrary-precision backing, bypassing demotion. Test hook
    /// for exercising representation transparency.
    #[cfg(test)]
    pub(crate) fn promoted(&self) -> Self {
        Money(Repr::Big(self.to_big()))
    }

    #[cfg(test)]
    pub(crate) fn is_scaled(&self) -> bool {
        matches!(self.0, Repr::Scaled(_))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of digits right of the decimal point.
    #[inline]
    pub fn scale(&self) -> u32 {
        match &self.0 {
            Repr::Scaled(scaled) => scaled.scale,
            Repr::Big(big) => big.scale,
        }
    }

    /// The integer that, divided by `10^scale`, yields this value.
    /// This is the hook for formatting/serialization collaborators.
    pub fn unscaled_value(&self) -> BigInt {
        match &self.0 {
            Repr::Scaled(scaled) => BigInt::from(scaled.mantissa),
            Repr::Big(big) => big.unscaled.clone(),
        }
    }

    /// Check if the value is zero.
    pub fn is_zero(&self) -> bool {
        match &self.0 {
            Repr::Scaled(scaled) => scaled.mantissa == 0,
            Repr::Big(big) => num_traits::Zero::is_zero(&big.unscaled),
        }
    }

    /// Check if the value is negative.
    pub fn is_negative(&self) -> bool {
        match &self.0 {
            Repr::Scaled(scaled) => scaled.mantissa < 0,
            Repr::Big(big) => big.unscaled.is_negative(),
        }
    }

    // ========================================================================
    // Arithmetic Operations
    // ========================================================================

    /// Sum of two amounts at `max(self.scale(), other.scale())`.
    ///
    /// Total: overflow on the fast path silently recomputes the sum in
    /// arbitrary precision.
    pub fn add(&self, other: &Money) -> Money {
        if let (Repr::Scaled(lhs), Repr::Scaled(rhs)) = (&self.0, &other.0) {
            if let Some(sum) = lhs.try_add(*rhs) {
                return Money::from_scaled(sum);
            }
            trace!(
                lhs_scale = lhs.scale,
                rhs_scale = rhs.scale,
                "add fell back to arbitrary precision"
            );
        }
        Money::from_big(self.to_big().add(&other.to_big()))
    }

    /// Exact multiplication by an integer factor, scale unchanged.
    pub fn multiply(&self, factor: i64) -> Money {
        match &self.0 {
            Repr::Scaled(scaled) => match scaled.try_multiply(factor) {
                Some(product) => Money::from_scaled(product),
                None => {
                    trace!(factor, "multiply fell back to arbitrary precision");
                    Money::from_big(BigMoney::from_scaled(*scaled).multiply(factor))
                },
            },
            Repr::Big(big) => Money::from_big(big.multiply(factor)),
        }
    }

    /// Multiply by a double, keeping the receiver's scale and rounding the
    /// true product half-up.
    ///
    /// The factor is first converted to its shortest exact decimal form, so
    /// multiplying by `0.1` behaves like the literal `0.1`, not like the
    /// nearest binary double.
    ///
    /// # Errors
    /// Returns `NonFinite` for NaN or infinity.
    pub fn multiply_f64(&self, factor: f64) -> MoneyResult<Money> {
        let (digits, exp10) = decompose_f64(factor)?;
        Ok(match &self.0 {
            Repr::Scaled(scaled) => match scaled.try_multiply_decimal(digits, exp10) {
                Some(product) => Money::from_scaled(product),
                None => {
                    trace!(factor, "multiply_f64 fell back to arbitrary precision");
                    Money::from_big(
                        BigMoney::from_scaled(*scaled).multiply_decimal(digits, exp10),
                    )
                },
            },
            Repr::Big(big) => Money::from_big(big.multiply_decimal(digits, exp10)),
        })
    }

    /// Divide by an integer, producing `result_scale` decimal places with
    /// half-up rounding.
    ///
    /// # Errors
    /// Returns `DivisionByZero` when `divisor` is 0.
    pub fn divide(&self, divisor: i64, result_scale: u32) -> MoneyResult<Money> {
        if divisor == 0 {
            return Err(MoneyError::DivisionByZero);
        }
        Ok(match &self.0 {
            Repr::Scaled(scaled) => match scaled.try_divide(divisor, result_scale) {
                Some(quotient) => Money::from_scaled(quotient),
                None => {
                    trace!(divisor, result_scale, "divide fell back to arbitrary precision");
                    Money::from_big(BigMoney::from_scaled(*scaled).divide(divisor, result_scale))
                },
            },
            Repr::Big(big) => Money::from_big(big.divide(divisor, result_scale)),
        })
    }

    /// Divide by a double at `result_scale`, half-up. The divisor is
    /// converted to its shortest exact decimal form first, like
    /// [`multiply_f64`](Self::multiply_f64).
    ///
    /// # Errors
    /// Returns `NonFinite` for NaN or infinity, `DivisionByZero` for ±0.0.
    pub fn divide_f64(&self, divisor: f64, result_scale: u32) -> MoneyResult<Money> {
        let (digits, exp10) = decompose_f64(divisor)?;
        if digits == 0 {
            return Err(MoneyError::DivisionByZero);
        }
        Ok(match &self.0 {
            Repr::Scaled(scaled) => {
                match scaled.try_divide_decimal(digits, exp10, result_scale) {
                    Some(quotient) => Money::from_scaled(quotient),
                    None => {
                        trace!(divisor, result_scale, "divide_f64 fell back to arbitrary precision");
                        Money::from_big(
                            BigMoney::from_scaled(*scaled)
                                .divide_decimal(digits, exp10, result_scale),
                        )
                    },
                }
            },
            Repr::Big(big) => Money::from_big(big.divide_decimal(digits, exp10, result_scale)),
        })
    }

    /// Drop digits beyond `scale` without rounding, truncating toward zero:
    /// `1.99` truncated to one place is `1.9`, `-1.99` is `-1.9`.
    ///
    /// A no-op when `scale >= self.scale()` — truncation cannot add
    /// precision.
    pub fn truncate(&self, scale: u32) -> Money {
        match &self.0 {
            Repr::Scaled(scaled) => Money::from_scaled(scaled.truncate(scale)),
            Repr::Big(big) => Money::from_big(big.truncate(scale)),
        }
    }
}

// ============================================================================
// Comparison
// ============================================================================

impl PartialEq for Money {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Money {}

impl PartialOrd for Money {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    /// Numeric ordering after scale alignment, independent of backing.
    fn cmp(&self, other: &Self) -> Ordering {
        if let (Repr::Scaled(lhs), Repr::Scaled(rhs)) = (&self.0, &other.0) {
            if let Some(ordering) = lhs.try_cmp(*rhs) {
                return ordering;
            }
        }
        self.to_big().cmp_value(&other.to_big())
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    #[inline]
    fn add(self, rhs: Money) -> Money {
        Money::add(&self, &rhs)
    }
}

impl std::ops::Add for &Money {
    type Output = Money;

    #[inline]
    fn add(self, rhs: &Money) -> Money {
        Money::add(self, rhs)
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (digits, negative) = match &self.0 {
            Repr::Scaled(scaled) => {
                (scaled.mantissa.unsigned_abs().to_string(), scaled.mantissa < 0)
            },
            Repr::Big(big) => (big.unscaled.magnitude().to_string(), big.unscaled.is_negative()),
        };
        let sign = if negative { "-" } else { "" };
        let scale = self.scale() as usize;
        if scale == 0 {
            write!(f, "{}{}", sign, digits)
        } else {
            // pad so there is always at least one integer digit
            let padded = if digits.len() <= scale {
                format!("{:0>width$}", digits, width = scale + 1)
            } else {
                digits
            };
            let (int_part, frac_part) = padded.split_at(padded.len() - scale);
            write!(f, "{}{}.{}", sign, int_part, frac_part)
        }
    }
}

impl fmt::Debug for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match &self.0 {
            Repr::Scaled(_) => "scaled",
            Repr::Big(_) => "big",
        };
        write!(f, "Money({}, scale={}, repr={})", self, self.scale(), repr)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_same_scale() {
        let a = Money::from_units(150, 2);
        let b = Money::from_units(250, 2);
        assert_eq!(a.add(&b), Money::from_units(400, 2));
    }

    #[test]
    fn test_add_aligns_to_max_scale() {
        // 1.5 + 0.25 = 1.75
        let a = Money::from_units(15, 1);
        let b = Money::from_units(25, 2);
        let sum = a.add(&b);
        assert_eq!(sum, Money::from_units(175, 2));
        assert_eq!(sum.scale(), 2);
        assert_eq!(b.add(&a), sum);
    }

    #[test]
    fn test_add_operator() {
        let a = Money::from_units(100, 2);
        let b = Money::from_units(99, 2);
        assert_eq!(&a + &b, Money::from_units(199, 2));
        assert_eq!(a + b, Money::from_units(199, 2));
    }

    #[test]
    fn test_add_overflow_falls_back() {
        let a = Money::from_units(9_000_000_000_000_000_000, 0);
        let sum = a.add(&a);
        assert_eq!(sum.to_string(), "18000000000000000000");
        assert!(!sum.is_scaled());
        assert_eq!(
            sum.unscaled_value(),
            BigInt::from(9_000_000_000_000_000_000i64) * 2
        );
    }

    #[test]
    fn test_add_fallback_result_demotes_when_it_fits() {
        // rescaling 922337203685477581 by 10 overflows i64, but adding the
        // negative operand brings the aligned sum back into range
        let a = Money::from_units(922_337_203_685_477_581, 0);
        let b = Money::from_units(-50, 1);
        let sum = a.add(&b);
        assert!(sum.is_scaled());
        assert_eq!(sum, Money::from_units(9_223_372_036_854_775_760, 1));
        assert_eq!(sum.scale(), 1);
    }

    #[test]
    fn test_add_mixed_representations() {
        let big = Money::from_units(9_000_000_000_000_000_000, 0)
            .add(&Money::from_units(9_000_000_000_000_000_000, 0));
        let back = big.add(&Money::from_units(-9_000_000_000_000_000_000, 0));
        assert!(back.is_scaled());
        assert_eq!(back, Money::from_units(9_000_000_000_000_000_000, 0));
        // more precise operand wins the result scale
        let cents = Money::from_units(50, 2);
        assert_eq!(big.add(&cents).scale(), 2);
    }

    #[test]
    fn test_multiply_exact() {
        // 3.33 * 3 = 9.99, no drift
        let a = Money::from_units(333, 2);
        assert_eq!(a.multiply(3), Money::from_units(999, 2));
        assert_eq!(a.multiply(0), Money::from_units(0, 2));
        assert_eq!(a.multiply(-3), Money::from_units(-999, 2));
    }

    #[test]
    fn test_multiply_overflow_falls_back() {
        let a = Money::from_units(i64::MAX, 2);
        let product = a.multiply(10);
        assert!(!product.is_scaled());
        assert_eq!(product.unscaled_value(), BigInt::from(i64::MAX) * 10);
        assert_eq!(product.scale(), 2);
    }

    #[test]
    fn test_multiply_f64_keeps_receiver_scale() {
        // 100.00 * 97.5 = 9750.00
        let a = Money::from_units(10_000, 2);
        let product = a.multiply_f64(97.5).unwrap();
        assert_eq!(product, Money::from_units(975_000, 2));
        assert_eq!(product.scale(), 2);
    }

    #[test]
    fn test_multiply_f64_uses_decimal_form_of_double() {
        // 0.1 is not exact in binary; the literal decimal form must win:
        // 1.00 * 0.1 = 0.10 exactly
        let a = Money::from_units(100, 2);
        assert_eq!(a.multiply_f64(0.1).unwrap(), Money::from_units(10, 2));
        assert_eq!(a.multiply_f64(0.2).unwrap(), Money::from_units(20, 2));
        assert_eq!(a.multiply_f64(0.3).unwrap(), Money::from_units(30, 2));
    }

    #[test]
    fn test_multiply_f64_rounds_half_up() {
        // 0.05 * 0.5 = 0.025 -> 0.03 at scale 2
        let a = Money::from_units(5, 2);
        assert_eq!(a.multiply_f64(0.5).unwrap(), Money::from_units(3, 2));
        // -0.05 * 0.5 = -0.025 -> -0.03 (away from zero)
        let b = Money::from_units(-5, 2);
        assert_eq!(b.multiply_f64(0.5).unwrap(), Money::from_units(-3, 2));
    }

    #[test]
    fn test_multiply_f64_non_finite() {
        let a = Money::from_units(100, 2);
        assert_eq!(a.multiply_f64(f64::NAN), Err(MoneyError::NonFinite));
        assert_eq!(a.multiply_f64(f64::INFINITY), Err(MoneyError::NonFinite));
        assert_eq!(a.multiply_f64(f64::NEG_INFINITY), Err(MoneyError::NonFinite));
    }

    #[test]
    fn test_divide_rounds_half_up() {
        // 1.00 / 3 = 0.33
        let a = Money::from_units(100, 2);
        assert_eq!(a.divide(3, 2).unwrap(), Money::from_units(33, 2));
        // 2.00 / 3 = 0.67
        let b = Money::from_units(200, 2);
        assert_eq!(b.divide(3, 2).unwrap(), Money::from_units(67, 2));
        // 0.5 / 2 = 0.25 -> 0 at scale 0
        let c = Money::from_units(5, 1);
        assert_eq!(c.divide(2, 0).unwrap(), Money::from_units(0, 0));
    }

    #[test]
    fn test_divide_result_scale_above_receiver() {
        // 1.00 / 97 at scale 4 = 0.0103
        let a = Money::from_units(100, 2);
        assert_eq!(a.divide(97, 4).unwrap(), Money::from_units(103, 4));
    }

    #[test]
    fn test_divide_f64() {
        let a = Money::from_units(100, 2);
        assert_eq!(a.divide_f64(3.0, 2).unwrap(), Money::from_units(33, 2));
        // 1.00 / 2.5 = 0.40
        assert_eq!(a.divide_f64(2.5, 2).unwrap(), Money::from_units(40, 2));
        // 1.00 / 0.1 = 10.00
        assert_eq!(a.divide_f64(0.1, 2).unwrap(), Money::from_units(1000, 2));
    }

    #[test]
    fn test_divide_by_zero() {
        let a = Money::from_units(100, 2);
        assert_eq!(a.divide(0, 2), Err(MoneyError::DivisionByZero));
        assert_eq!(a.divide_f64(0.0, 2), Err(MoneyError::DivisionByZero));
        assert_eq!(a.divide_f64(-0.0, 2), Err(MoneyError::DivisionByZero));
    }

    #[test]
    fn test_divide_f64_non_finite() {
        let a = Money::from_units(100, 2);
        assert_eq!(a.divide_f64(f64::NAN, 2), Err(MoneyError::NonFinite));
        assert_eq!(a.divide_f64(f64::INFINITY, 2), Err(MoneyError::NonFinite));
    }

    #[test]
    fn test_truncate_drops_without_rounding() {
        // 1.99 -> 1.9, never 2.0
        let a = Money::from_units(199, 2);
        let truncated = a.truncate(1);
        assert_eq!(truncated, Money::from_units(19, 1));
        assert_eq!(truncated.to_string(), "1.9");
        // sign-preserving toward zero
        let b = Money::from_units(-199, 2);
        assert_eq!(b.truncate(1), Money::from_units(-19, 1));
    }

    #[test]
    fn test_truncate_idempotent_and_noop() {
        let a = Money::from_units(199, 2);
        assert_eq!(a.truncate(1).truncate(1), a.truncate(1));
        // cannot gain precision
        assert_eq!(a.truncate(2), a);
        assert_eq!(a.truncate(5), a);
        assert_eq!(a.truncate(5).scale(), 2);
    }

    #[test]
    fn test_truncate_big_demotes_when_it_fits() {
        let big = Money::from_units(9_000_000_000_000_000_000, 0)
            .add(&Money::from_units(9_000_000_000_000_000_000, 0));
        // 18000000000000000000 has 20 digits; dropping nothing keeps it big
        assert!(!big.truncate(0).is_scaled());
        // 180000000000000000.00 stays big at scale 2 but fits i64 once a
        // digit is dropped
        let fractional = big.divide(100, 2).unwrap();
        assert!(!fractional.is_scaled());
        let truncated = fractional.truncate(1);
        assert!(truncated.is_scaled());
        assert_eq!(truncated, Money::from_units(1_800_000_000_000_000_000, 1));
    }

    #[test]
    fn test_equality_ignores_internal_scale() {
        assert_eq!(Money::from_units(150, 2), Money::from_units(15, 1));
        assert_eq!(Money::from_units(0, 5), Money::from_units(0, 0));
        assert_ne!(Money::from_units(151, 2), Money::from_units(15, 1));
    }

    #[test]
    fn test_equality_ignores_representation() {
        let a = Money::from_units(199, 2);
        assert_eq!(a, a.promoted());
        assert_eq!(a.promoted(), a);
    }

    #[test]
    fn test_ordering_is_numeric() {
        let mut values = vec![
            Money::from_units(-1, 0),
            Money::from_units(199, 2),
            Money::from_units(15, 1),
            Money::from_units(0, 3),
        ];
        values.sort();
        let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        assert_eq!(rendered, vec!["-1", "0.000", "1.5", "1.99"]);
        // ordering across representations and magnitudes
        let big = Money::from_units(9_000_000_000_000_000_000, 0)
            .add(&Money::from_units(9_000_000_000_000_000_000, 0));
        assert!(big > Money::from_units(i64::MAX, 0));
        assert!(Money::from_units(i64::MIN, 0) < Money::from_units(0, 18));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_units(199, 2).to_string(), "1.99");
        assert_eq!(Money::from_units(-5, 2).to_string(), "-0.05");
        assert_eq!(Money::from_units(5, 0).to_string(), "5");
        assert_eq!(Money::from_units(0, 2).to_string(), "0.00");
        assert_eq!(Money::from_units(1500, 3).to_string(), "1.500");
    }

    #[test]
    fn test_accessors() {
        let a = Money::from_units(-199, 2);
        assert_eq!(a.scale(), 2);
        assert_eq!(a.unscaled_value(), BigInt::from(-199));
        assert!(a.is_negative());
        assert!(!a.is_zero());
        assert!(Money::from_units(0, 4).is_zero());
    }
}

// ============================================================================
// Property Tests
// ============================================================================
