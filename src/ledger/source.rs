//! The read side of the expense ledger.
//!
//! The balance engine never talks to storage directly. Anything that can
//! list every split and every settlement implements [`LedgerSource`].

use crate::core::error::LedgerError;
use crate::core::expense::Expense;
use crate::core::settlement::Settlement;
use crate::core::split::ExpenseSplit;
use serde::{Deserialize, Serialize};

/// Data-access seam the balance engine reads its inputs through.
pub trait LedgerSource {
    /// Every split row of every recorded expense.
    fn list_all_splits(&self) -> Result<Vec<ExpenseSplit>, LedgerError>;

    /// Every recorded settlement.
    fn list_all_settlements(&self) -> Result<Vec<Settlement>, LedgerError>;
}

/// Immutable copy of split and settlement rows.
///
/// Hand each concurrent caller its own snapshot; the engine only reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub splits: Vec<ExpenseSplit>,
    pub settlements: Vec<Settlement>,
}

impl LedgerSnapshot {
    pub fn new(splits: Vec<ExpenseSplit>, settlements: Vec<Settlement>) -> Self {
        Self {
            splits,
            settlements,
        }
    }
}

impl LedgerSource for LedgerSnapshot {
    fn list_all_splits(&self) -> Result<Vec<ExpenseSplit>, LedgerError> {
        Ok(self.splits.clone())
    }

    fn list_all_settlements(&self) -> Result<Vec<Settlement>, LedgerError> {
        Ok(self.settlements.clone())
    }
}

/// Append-only in-process ledger of expenses and settlements.
///
/// # Examples
///
/// ```
/// use settle_engine::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let mut ledger = InMemoryLedger::new();
/// let alice = UserId::new("alice");
/// let bob = UserId::new("bob");
///
/// ledger.record_expense(Expense::new(
///     "Tickets", dec!(40), alice.clone(), SplitRule::Equal(vec![alice.clone(), bob.clone()]),
/// ).unwrap());
/// ledger.record_settlement(Settlement::new(bob, alice, dec!(20)).unwrap());
///
/// assert_eq!(ledger.list_all_splits().unwrap().len(), 2);
/// assert_eq!(ledger.list_all_settlements().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryLedger {
    expenses: Vec<Expense>,
    settlements: Vec<Settlement>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_expense(&mut self, expense: Expense) {
        log::debug!(
            "recording expense {} ({}) paid by {}",
            expense.id(),
            expense.amount(),
            expense.payer()
        );
        self.expenses.push(expense);
    }

    pub fn record_settlement(&mut self, settlement: Settlement) {
        log::debug!(
            "recording settlement {} -> {} ({})",
            settlement.from(),
            settlement.to(),
            settlement.amount()
        );
        self.settlements.push(settlement);
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty() && self.settlements.is_empty()
    }

    /// Copy out the current rows for an independent computation.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::new(self.splits(), self.settlements.clone())
    }

    fn splits(&self) -> Vec<ExpenseSplit> {
        self.expenses
            .iter()
            .flat_map(|e| e.splits().iter().cloned())
            .collect()
    }
}

impl LedgerSource for InMemoryLedger {
    fn list_all_splits(&self) -> Result<Vec<ExpenseSplit>, LedgerError> {
        Ok(self.splits())
    }

    fn list_all_settlements(&self) -> Result<Vec<Settlement>, LedgerError> {
        Ok(self.settlements.clone())
    }
}
