//! Random ledger generation for load and property testing.

use crate::core::expense::{Expense, SplitRule};
use crate::core::settlement::Settlement;
use crate::core::user::UserId;
use crate::ledger::source::InMemoryLedger;
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const CATEGORIES: [&str; 5] = ["General", "Food", "Travel", "Rent", "Entertainment"];

/// Configuration for generating a random ledger.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Number of users sharing expenses.
    pub user_count: usize,
    /// Number of expenses to record.
    pub expense_count: usize,
    /// Number of settlements to record.
    pub settlement_count: usize,
    /// Minimum expense or settlement amount.
    pub min_amount: Decimal,
    /// Maximum expense or settlement amount.
    pub max_amount: Decimal,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            user_count: 5,
            expense_count: 20,
            settlement_count: 5,
            min_amount: Decimal::from(1),
            max_amount: Decimal::from(500),
        }
    }
}

/// Generate a random ledger of equally split expenses and settlements.
///
/// Amounts are whole cents between `min_amount` and `max_amount`.
pub fn generate_random_ledger(config: &LedgerConfig) -> InMemoryLedger {
    let mut rng = rand::thread_rng();
    let mut ledger = InMemoryLedger::new();

    let users: Vec<UserId> = (0..config.user_count)
        .map(|i| UserId::new(format!("USER-{:03}", i)))
        .collect();
    if users.is_empty() {
        return ledger;
    }

    let min_cents = to_cents(config.min_amount).max(1);
    let max_cents = to_cents(config.max_amount).max(min_cents);

    for i in 0..config.expense_count {
        let payer = users[rng.gen_range(0..users.len())].clone();
        let size = rng.gen_range(1..=users.len());
        let participants: Vec<UserId> = users
            .choose_multiple(&mut rng, size)
            .cloned()
            .collect();
        let amount = Decimal::new(rng.gen_range(min_cents..=max_cents), 2);
        let category = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];

        match Expense::new(
            format!("Expense #{}", i + 1),
            amount,
            payer,
            SplitRule::Equal(participants),
        ) {
            Ok(expense) => ledger.record_expense(expense.with_category(category)),
            Err(e) => log::warn!("skipping generated expense: {}", e),
        }
    }

    if users.len() > 1 {
        for _ in 0..config.settlement_count {
            let from_idx = rng.gen_range(0..users.len());
            let mut to_idx = rng.gen_range(0..users.len());
            while to_idx == from_idx {
                to_idx = rng.gen_range(0..users.len());
            }
            let amount = Decimal::new(rng.gen_range(min_cents..=max_cents), 2);

            match Settlement::new(users[from_idx].clone(), users[to_idx].clone(), amount) {
                Ok(settlement) => ledger.record_settlement(settlement),
                Err(e) => log::warn!("skipping generated settlement: {}", e),
            }
        }
    }

    ledger
}

fn to_cents(amount: Decimal) -> i64 {
    (amount * Decimal::from(100))
        .trunc()
        .to_i64()
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::engine::BalanceEngine;
    use crate::core::amount::TOLERANCE;

    #[test]
    fn test_random_ledger_generation() {
        let config = LedgerConfig {
            user_count: 4,
            expense_count: 10,
            settlement_count: 3,
            ..Default::default()
        };

        let ledger = generate_random_ledger(&config);
        assert_eq!(ledger.expenses().len(), 10);
        assert_eq!(ledger.settlements().len(), 3);
        for settlement in ledger.settlements() {
            assert_ne!(settlement.from(), settlement.to());
        }
    }

    #[test]
    fn test_random_ledger_balances() {
        let config = LedgerConfig {
            user_count: 12,
            expense_count: 60,
            ..Default::default()
        };

        let report = BalanceEngine::report(&generate_random_ledger(&config)).unwrap();
        assert!(report.is_valid());
        assert!(report.net_total() <= report.gross_total());
        assert!(report.transfers().iter().all(|t| t.amount() > TOLERANCE));
    }

    #[test]
    fn test_single_user_has_no_settlements() {
        let config = LedgerConfig {
            user_count: 1,
            ..Default::default()
        };
        let ledger = generate_random_ledger(&config);
        assert!(ledger.settlements().is_empty());
    }
}
