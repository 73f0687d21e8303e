use crate::core::amount::is_settled;
use crate::core::error::LedgerError;
use crate::core::settlement::Settlement;
use crate::core::transfer::Transfer;
use crate::core::user::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One user's view of the simplified transfers.
///
/// Each counterparty maps to a signed amount: positive means the
/// counterparty owes this user, negative means this user owes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBalances {
    user: UserId,
    counterparties: BTreeMap<UserId, Decimal>,
}

impl UserBalances {
    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// Position against `other`; zero when no transfer links the two.
    pub fn get(&self, other: &UserId) -> Decimal {
        self.counterparties
            .get(other)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UserId, Decimal)> {
        self.counterparties
            .iter()
            .map(|(user, amount)| (user, *amount))
    }

    /// Entries worth showing: settled amounts are hidden.
    pub fn visible(&self) -> impl Iterator<Item = (&UserId, Decimal)> {
        self.iter().filter(|(_, amount)| !is_settled(*amount))
    }

    pub fn len(&self) -> usize {
        self.counterparties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counterparties.is_empty()
    }

    /// Total other users owe this user.
    pub fn owed_to_user(&self) -> Decimal {
        self.counterparties
            .values()
            .filter(|v| **v > Decimal::ZERO)
            .sum()
    }

    /// Total this user owes others, as a positive number.
    pub fn owed_by_user(&self) -> Decimal {
        -self
            .counterparties
            .values()
            .filter(|v| **v < Decimal::ZERO)
            .sum::<Decimal>()
    }

    /// The settlement that clears this user's position against `other`.
    ///
    /// A positive entry means `other` pays this user, a negative one means
    /// this user pays `other`. `None` when the pair is already settled.
    pub fn settlement_with(&self, other: &UserId) -> Option<Result<Settlement, LedgerError>> {
        let amount = self.get(other);
        if is_settled(amount) {
            return None;
        }
        let settlement = if amount > Decimal::ZERO {
            Settlement::new(other.clone(), self.user.clone(), amount)
        } else {
            Settlement::new(self.user.clone(), other.clone(), amount.abs())
        };
        Some(settlement)
    }

    /// Overall position of the user.
    pub fn net(&self) -> Decimal {
        self.counterparties.values().sum()
    }
}

impl fmt::Display for UserBalances {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Balances for {} ===", self.user)?;
        let mut shown = 0;
        for (other, amount) in self.visible() {
            if amount > Decimal::ZERO {
                writeln!(f, "  {} owes you {}", other, amount.round_dp(2))?;
            } else {
                writeln!(f, "  you owe {} {}", other, amount.abs().round_dp(2))?;
            }
            shown += 1;
        }
        if shown == 0 {
            writeln!(f, "  all settled up")?;
        }
        Ok(())
    }
}

/// Narrow a global transfer list to what concerns `user`.
///
/// Transfers paid by `user` become negative entries for the receiver,
/// transfers received by `user` become positive entries for the payer.
/// Several transfers with the same counterparty are summed.
///
/// # Examples
///
/// ```
/// use settle_engine::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let a = UserId::new("A");
/// let b = UserId::new("B");
/// let transfers = vec![Transfer::new(b.clone(), a.clone(), dec!(50))];
///
/// assert_eq!(project_for_user(&transfers, &a).get(&b), dec!(50));
/// assert_eq!(project_for_user(&transfers, &b).get(&a), dec!(-50));
/// ```
pub fn project_for_user(transfers: &[Transfer], user: &UserId) -> UserBalances {
    let mut counterparties: BTreeMap<UserId, Decimal> = BTreeMap::new();

    for transfer in transfers {
        if transfer.from() == user {
            *counterparties
                .entry(transfer.to().clone())
                .or_insert(Decimal::ZERO) -= transfer.amount();
        } else if transfer.to() == user {
            *counterparties
                .entry(transfer.from().clone())
                .or_insert(Decimal::ZERO) += transfer.amount();
        }
    }

    UserBalances {
        user: user.clone(),
        counterparties,
    }
}
