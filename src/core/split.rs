use crate::core::error::LedgerError;
use crate::core::user::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One participant's share of one expense.
///
/// Reads as "`debtor` owes `payer` this `share`". A split where the debtor
/// is also the payer is spending on oneself and never becomes debt.
///
/// # Examples
///
/// ```
/// use settle_engine::core::split::ExpenseSplit;
/// use settle_engine::core::user::UserId;
/// use rust_decimal_macros::dec;
///
/// let split = ExpenseSplit::new(UserId::new("alice"), UserId::new("bob"), dec!(25.50)).unwrap();
/// assert_eq!(split.share(), dec!(25.50));
/// assert!(!split.is_self_split());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSplit {
    payer: UserId,
    debtor: UserId,
    share: Decimal,
}

impl ExpenseSplit {
    /// Create a split. Negative shares are rejected.
    pub fn new(payer: UserId, debtor: UserId, share: Decimal) -> Result<Self, LedgerError> {
        if share < Decimal::ZERO {
            return Err(LedgerError::NegativeShare { debtor, share });
        }
        Ok(Self {
            payer,
            debtor,
            share,
        })
    }

    pub fn payer(&self) -> &UserId {
        &self.payer
    }

    pub fn debtor(&self) -> &UserId {
        &self.debtor
    }

    pub fn share(&self) -> Decimal {
        self.share
    }

    /// True when the payer covered their own share.
    pub fn is_self_split(&self) -> bool {
        self.payer == self.debtor
    }
}
