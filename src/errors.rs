// ============================================================================
// Money Errors
// Domain errors for exact decimal money operations
// ============================================================================

use std::fmt;

/// Errors that can occur during money construction or arithmetic.
///
/// Overflow on the scaled-integer fast path is deliberately absent: it is an
/// internal signal that triggers a silent fallback to arbitrary precision,
/// never a caller-visible failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoneyError {
    /// Attempted division by zero (integer or double divisor)
    DivisionByZero,
    /// NaN or infinity passed to double-based construction or arithmetic
    NonFinite,
}

impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyError::DivisionByZero => write!(f, "division by zero"),
            MoneyError::NonFinite => {
                write!(f, "non-finite input: NaN and infinity have no decimal value")
            },
        }
    }
}

impl std::error::Error for MoneyError {}

/// Result type alias for money operations
pub type MoneyResult<T> = Result<T, MoneyError>;
