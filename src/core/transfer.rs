use crate::core::user::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directed payment obligation produced by debt simplification.
///
/// `from` should pay `to` the given `amount`. Transfers coming out of the
/// simplifier always have distinct endpoints and an amount above tolerance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    from: UserId,
    to: UserId,
    amount: Decimal,
}

impl Transfer {
    pub fn new(from: UserId, to: UserId, amount: Decimal) -> Self {
        Self { from, to, amount }
    }

    pub fn from(&self) -> &UserId {
        &self.from
    }

    pub fn to(&self) -> &UserId {
        &self.to
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Whether this transfer has `user` on either side.
    pub fn involves(&self, user: &UserId) -> bool {
        &self.from == user || &self.to == user
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.from, self.to, self.amount.round_dp(2))
    }
}
