use crate::core::error::LedgerError;
use crate::core::user::UserId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A real-world payment already made from one user to another.
///
/// Settlements are append-only facts. Recording one reduces what `from`
/// owed and what `to` was owed by the same amount.
///
/// # Examples
///
/// ```
/// use settle_engine::core::settlement::Settlement;
/// use settle_engine::core::user::UserId;
/// use rust_decimal_macros::dec;
///
/// let paid = Settlement::new(UserId::new("bob"), UserId::new("alice"), dec!(30)).unwrap();
/// assert_eq!(paid.amount(), dec!(30));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    id: Uuid,
    from: UserId,
    to: UserId,
    amount: Decimal,
    settled_at: DateTime<Utc>,
}

impl Settlement {
    /// Record a payment. The amount must be positive.
    pub fn new(from: UserId, to: UserId, amount: Decimal) -> Result<Self, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveSettlement { from, to, amount });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            from,
            to,
            amount,
            settled_at: Utc::now(),
        })
    }

    /// Override the settlement timestamp (imports, tests).
    pub fn with_settled_at(mut self, settled_at: DateTime<Utc>) -> Self {
        self.settled_at = settled_at;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
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

    pub fn settled_at(&self) -> DateTime<Utc> {
        self.settled_at
    }
}
