// ============================================================================
// Exact Money Library
// Exact decimal arithmetic with a scaled-integer fast path and
// arbitrary-precision fallback
// ============================================================================

//! # Exact Money
//!
//! An exact decimal money type for financial computation: addition, scalar
//! multiplication, scalar division with rounding, and truncation — without
//! floating-point error accumulation.
//!
//! ## Features
//!
//! - **Dual representation**: amounts within i64 range run entirely on
//!   machine integers; anything beyond falls back to arbitrary precision
//! - **Silent fallback**: fast-path overflow is never an error and never
//!   wraps — the operation is recomputed exactly and demoted back when the
//!   result fits
//! - **Half-up rounding** everywhere a result must be rounded (division,
//!   multiplication by a double), identical on both paths
//! - **Shortest-decimal double handling**: `0.1f64` means the literal `0.1`,
//!   not its binary approximation
//! - **Immutable values**: freely shareable across threads, no locking
//!
//! ## Example
//!
//! ```rust
//! use exact_money::Money;
//!
//! let price = Money::from_units(199, 2);             // 1.99
//! let total = price.multiply(3);                     // 5.97 exactly
//! assert_eq!(total, Money::from_units(597, 2));
//!
//! let third = total.divide(3, 2).unwrap();           // back to 1.99
//! assert_eq!(third, price);
//!
//! let rate = Money::from_f64(0.1, 1).unwrap();       // the decimal 0.1
//! assert_eq!(rate.add(&rate).add(&rate), Money::from_f64(0.3, 1).unwrap());
//!
//! assert_eq!(price.truncate(1).to_string(), "1.9");  // dropped, not rounded
//! ```

mod errors;
mod factory;
mod money;
mod scaled;
mod unbounded;

pub use errors::{MoneyError, MoneyResult};
pub use money::Money;
