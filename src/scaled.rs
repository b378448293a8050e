// ============================================================================
// Scaled-Integer Representation
// Fast-path decimal arithmetic on an i64 mantissa with overflow guards
// ============================================================================

use std::cmp::Ordering;

// ============================================================================
// Power-of-Ten Tables
// ============================================================================

/// Largest exponent for which 10^k fits an i64
pub(crate) const MAX_POW10_I64: u32 = 18;

/// Largest exponent for which 10^k fits an i128
pub(crate) const MAX_POW10_I128: u32 = 38;

const fn pow10_table_i64() -> [i64; (MAX_POW10_I64 + 1) as usize] {
    let mut table = [1i64; (MAX_POW10_I64 + 1) as usize];
    let mut i = 1;
    while i < table.len() {
        table[i] = table[i - 1] * 10;
        i += 1;
    }
    table
}

const fn pow10_table_i128() -> [i128; (MAX_POW10_I128 + 1) as usize] {
    let mut table = [1i128; (MAX_POW10_I128 + 1) as usize];
    let mut i = 1;
    while i < table.len() {
        table[i] = table[i - 1] * 10;
        i += 1;
    }
    table
}

const POW10_I64: [i64; (MAX_POW10_I64 + 1) as usize] = pow10_table_i64();
const POW10_I128: [i128; (MAX_POW10_I128 + 1) as usize] = pow10_table_i128();

/// 10^k as i64, or `None` beyond the table.
#[inline]
pub(crate) fn pow10_i64(k: u32) -> Option<i64> {
    POW10_I64.get(k as usize).copied()
}

/// 10^k as i128, or `None` beyond the table.
#[inline]
pub(crate) fn pow10_i128(k: u32) -> Option<i128> {
    POW10_I128.get(k as usize).copied()
}

// ============================================================================
// Rounded Division
// ============================================================================

/// Divide with half-up rounding: exact midpoints round away from zero.
///
/// This is the single rounding rule of the crate; the arbitrary-precision
/// path implements the identical rule so that representation switching never
/// changes an observable result.
#[inline]
pub(crate) fn div_round_half_up(num: i128, den: i128) -> i128 {
    debug_assert!(den != 0, "caller must reject zero divisors");
    let quotient = num / den;
    let remainder = num % den;
    if remainder == 0 {
        return quotient;
    }
    // |remainder| < |den| <= 2^127, so doubling cannot overflow u128
    if remainder.unsigned_abs() * 2 >= den.unsigned_abs() {
        if (num < 0) == (den < 0) {
            quotient + 1
        } else {
            quotient - 1
        }
    } else {
        quotient
    }
}

// ============================================================================
// Scaled Value
// ============================================================================

/// Exact decimal amount `mantissa x 10^-scale` backed by machine integers.
///
/// Every operation here is a guarded attempt: `None` means the result (or an
/// intermediate) would leave the safe i64/i128 range, and the caller must
/// redo the computation on the arbitrary-precision representation. No
/// operation ever wraps or truncates silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScaledMoney {
    pub(crate) mantissa: i64,
    pub(crate) scale: u32,
}

impl ScaledMoney {
    #[inline]
    pub(crate) const fn new(mantissa: i64, scale: u32) -> Self {
        Self { mantissa, scale }
    }

    /// Multiply the mantissa by 10^k, guarding against overflow.
    #[inline]
    pub(crate) fn checked_rescale(mantissa: i64, k: u32) -> Option<i64> {
        if k == 0 {
            return Some(mantissa);
        }
        mantissa.checked_mul(pow10_i64(k)?)
    }

    /// Sum after aligning both operands to `max(self.scale, other.scale)`.
    #[inline]
    pub(crate) fn try_add(self, other: Self) -> Option<Self> {
        let scale = self.scale.max(other.scale);
        let lhs = Self::checked_rescale(self.mantissa, scale - self.scale)?;
        let rhs = Self::checked_rescale(other.mantissa, scale - other.scale)?;
        lhs.checked_add(rhs).map(|mantissa| Self::new(mantissa, scale))
    }

    /// Exact integer multiplication, scale unchanged.
    #[inline]
    pub(crate) fn try_multiply(self, factor: i64) -> Option<Self> {
        self.mantissa
            .checked_mul(factor)
            .map(|mantissa| Self::new(mantissa, self.scale))
    }

    /// Multiply by an exact decimal `digits x 10^exp10`, keeping the
    /// receiver's scale and rounding the true product half-up.
    ///
    /// The result mantissa is `round(self.mantissa * digits * 10^exp10)`:
    /// the 10^-scale factors of receiver and result cancel out.
    pub(crate) fn try_multiply_decimal(self, digits: i64, exp10: i32) -> Option<Self> {
        // i64 x i64 always fits i128
        let product = i128::from(self.mantissa) * i128::from(digits);
        let mantissa = if exp10 >= 0 {
            product.checked_mul(pow10_i128(exp10 as u32)?)?
        } else {
            match pow10_i128(exp10.unsigned_abs()) {
                Some(den) => div_round_half_up(product, den),
                // |product| < 10^38 / 2 < den, so the quotient rounds to zero
                None => 0,
            }
        };
        i64::try_from(mantissa)
            .ok()
            .map(|m| Self::new(m, self.scale))
    }

    /// Divide by a non-zero integer, producing `result_scale` decimal places
    /// with half-up rounding.
    pub(crate) fn try_divide(self, divisor: i64, result_scale: u32) -> Option<Self> {
        debug_assert!(divisor != 0);
        self.try_divide_parts(i128::from(divisor), 0, result_scale)
    }

    /// Divide by an exact decimal `digits x 10^exp10` at `result_scale`.
    pub(crate) fn try_divide_decimal(
        self,
        digits: i64,
        exp10: i32,
        result_scale: u32,
    ) -> Option<Self> {
        debug_assert!(digits != 0);
        self.try_divide_parts(i128::from(digits), exp10, result_scale)
    }

    /// Shared quotient kernel: `round(mantissa * 10^k / digits)` where
    /// `k = result_scale - scale - exp10` carries all three decimal shifts.
    fn try_divide_parts(self, digits: i128, exp10: i32, result_scale: u32) -> Option<Self> {
        let k = i64::from(result_scale) - i64::from(self.scale) - i64::from(exp10);
        let (num, den) = if k >= 0 {
            let shift = pow10_i128(u32::try_from(k).ok()?)?;
            (i128::from(self.mantissa).checked_mul(shift)?, digits)
        } else {
            let shift = pow10_i128(u32::try_from(-k).ok()?)?;
            (i128::from(self.mantissa), digits.checked_mul(shift)?)
        };
        i64::try_from(div_round_half_up(num, den))
            .ok()
            .map(|m| Self::new(m, result_scale))
    }

    /// Drop digits beyond `scale` toward zero. Total on this representation:
    /// truncation only ever shrinks the mantissa.
    pub(crate) fn truncate(self, scale: u32) -> Self {
        if scale >= self.scale {
            return self;
        }
        let mantissa = match pow10_i64(self.scale - scale) {
            Some(p) => self.mantissa / p,
            // dropping more digits than i64 can hold leaves nothing
            None => 0,
        };
        Self::new(mantissa, scale)
    }

    /// Numeric comparison after scale alignment, carried in i128.
    /// `None` when alignment would overflow even i128.
    pub(crate) fn try_cmp(self, other: Self) -> Option<Ordering> {
        let scale = self.scale.max(other.scale);
        let lhs =
            i128::from(self.mantissa).checked_mul(pow10_i128(scale - self.scale)?)?;
        let rhs =
            i128::from(other.mantissa).checked_mul(pow10_i128(scale - other.scale)?)?;
        Some(lhs.cmp(&rhs))
    }
}
