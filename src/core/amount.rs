//! Monetary tolerance shared by every balance comparison.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// One cent. Any balance or transfer whose magnitude is at or below this
/// value counts as settled.
pub const TOLERANCE: Decimal = dec!(0.01);

/// Returns true if `amount` is within [`TOLERANCE`] of zero.
///
/// # Examples
///
/// ```
/// use settle_engine::core::amount::is_settled;
/// use rust_decimal_macros::dec;
///
/// assert!(is_settled(dec!(0.01)));
/// assert!(is_settled(dec!(-0.004)));
/// assert!(!is_settled(dec!(0.02)));
/// ```
pub fn is_settled(amount: Decimal) -> bool {
    amount.abs() <= TOLERANCE
}

/// Returns true if `amount` is a real credit (strictly above tolerance).
pub fn is_credit(amount: Decimal) -> bool {
    amount > TOLERANCE
}

/// Returns true if `amount` is a real debt (strictly below -tolerance).
pub fn is_debt(amount: Decimal) -> bool {
    amount < -TOLERANCE
}
