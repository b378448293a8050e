// ============================================================================
// Arbitrary-Precision Representation
// Ground-truth decimal arithmetic on a BigInt unscaled value
// ============================================================================

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use super::scaled::ScaledMoney;

/// 10^k as a BigInt.
pub(crate) fn ten_pow(k: u64) -> BigInt {
    num_traits::pow(BigInt::from(10), k as usize)
}

/// Half-up rounded division, identical rule to the fast path's
/// `div_round_half_up`: exact midpoints round away from zero.
fn div_round_half_up_big(num: &BigInt, den: &BigInt) -> BigInt {
    debug_assert!(!den.is_zero(), "caller must reject zero divisors");
    let quotient = num / den;
    let remainder = num % den;
    if remainder.is_zero() {
        return quotient;
    }
    if remainder.magnitude() * 2u32 >= *den.magnitude() {
        if num.is_negative() == den.is_negative() {
            quotient + 1
        } else {
            quotient - 1
        }
    } else {
        quotient
    }
}

/// Exact decimal amount `unscaled x 10^-scale` with no magnitude bound.
///
/// The fallback representation: every operation the fast path refuses is
/// recomputed here and must succeed. Allocates, so only reached when the
/// scaled representation cannot guarantee exactness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BigMoney {
    pub(crate) unscaled: BigInt,
    pub(crate) scale: u32,
}

impl BigMoney {
    pub(crate) fn new(unscaled: BigInt, scale: u32) -> Self {
        Self { unscaled, scale }
    }

    pub(crate) fn from_scaled(value: ScaledMoney) -> Self {
        Self::new(BigInt::from(value.mantissa), value.scale)
    }

    /// Demote to the scaled representation when the unscaled value fits i64.
    /// The scale is carried over untouched: demotion never renormalizes.
    pub(crate) fn to_scaled(&self) -> Option<ScaledMoney> {
        self.unscaled
            .to_i64()
            .map(|mantissa| ScaledMoney::new(mantissa, self.scale))
    }

    /// Sum after aligning both operands to `max(self.scale, other.scale)`.
    pub(crate) fn add(&self, other: &Self) -> Self {
        let scale = self.scale.max(other.scale);
        let lhs = rescale(&self.unscaled, scale - self.scale);
        let rhs = rescale(&other.unscaled, scale - other.scale);
        Self::new(lhs + rhs, scale)
    }

    /// Exact integer multiplication, scale unchanged.
    pub(crate) fn multiply(&self, factor: i64) -> Self {
        Self::new(&self.unscaled * factor, self.scale)
    }

    /// Multiply by an exact decimal `digits x 10^exp10`, keeping the
    /// receiver's scale and rounding the true product half-up.
    pub(crate) fn multiply_decimal(&self, digits: i64, exp10: i32) -> Self {
        let product = &self.unscaled * digits;
        let unscaled = if exp10 >= 0 {
            product * ten_pow(u64::from(exp10.unsigned_abs()))
        } else {
            div_round_half_up_big(&product, &ten_pow(u64::from(exp10.unsigned_abs())))
        };
        Self::new(unscaled, self.scale)
    }

    /// Divide by a non-zero integer at `result_scale`, half-up.
    pub(crate) fn divide(&self, divisor: i64, result_scale: u32) -> Self {
        debug_assert!(divisor != 0);
        self.divide_parts(BigInt::from(divisor), 0, result_scale)
    }

    /// Divide by an exact decimal `digits x 10^exp10` at `result_scale`.
    pub(crate) fn divide_decimal(&self, digits: i64, exp10: i32, result_scale: u32) -> Self {
        debug_assert!(digits != 0);
        self.divide_parts(BigInt::from(digits), exp10, result_scale)
    }

    /// Shared quotient kernel, mirroring `ScaledMoney::try_divide_parts`:
    /// `round(unscaled * 10^k / digits)` with `k = result_scale - scale - exp10`.
    fn divide_parts(&self, digits: BigInt, exp10: i32, result_scale: u32) -> Self {
        let k = i64::from(result_scale) - i64::from(self.scale) - i64::from(exp10);
        let (num, den) = if k >= 0 {
            (&self.unscaled * ten_pow(k.unsigned_abs()), digits)
        } else {
            (self.unscaled.clone(), digits * ten_pow(k.unsigned_abs()))
        };
        Self::new(div_round_half_up_big(&num, &den), result_scale)
    }

    /// Drop digits beyond `scale` toward zero (BigInt division truncates
    /// toward zero, matching the fast path).
    pub(crate) fn truncate(&self, scale: u32) -> Self {
        if scale >= self.scale {
            return self.clone();
        }
        let unscaled = &self.unscaled / ten_pow(u64::from(self.scale - scale));
        Self::new(unscaled, scale)
    }

    /// Numeric comparison after scale alignment.
    pub(crate) fn cmp_value(&self, other: &Self) -> Ordering {
        let scale = self.scale.max(other.scale);
        let lhs = rescale(&self.unscaled, scale - self.scale);
        let rhs = rescale(&other.unscaled, scale - other.scale);
        lhs.cmp(&rhs)
    }
}

fn rescale(unscaled: &BigInt, k: u32) -> BigInt {
    if k == 0 {
        unscaled.clone()
    } else {
        unscaled * ten_pow(u64::from(k))
    }
}
