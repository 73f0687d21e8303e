//! # settle-engine
//!
//! Shared-expense balance engine.
//!
//! Given every expense split and every settlement recorded among a group of
//! people, this engine works out who owes whom and reduces it to a short
//! list of transfers using greedy debt simplification.
//!
//! ## Architecture
//!
//! - **core** — Users, expenses and their splits, settlements, transfers, tolerance
//! - **ledger** — The read seam the engine pulls rows through, plus an in-memory ledger
//! - **balance** — Net balance aggregation, debt simplification, per-user projection
//! - **analysis** — Per-user spending summaries
//! - **simulation** — Random ledger generation for load testing
//!
//! All amounts are `rust_decimal::Decimal`. Balances within one cent of
//! zero count as settled.

pub mod analysis;
pub mod balance;
pub mod core;
pub mod ledger;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::balance::aggregator::{compute_net_balances, ConservationAnomaly, NetBalances};
    pub use crate::balance::engine::{BalanceEngine, BalanceReport};
    pub use crate::balance::projector::{project_for_user, UserBalances};
    pub use crate::balance::simplifier::simplify_debts;
    pub use crate::core::amount::TOLERANCE;
    pub use crate::core::error::LedgerError;
    pub use crate::core::expense::{Expense, SplitRule, SplitType};
    pub use crate::core::settlement::Settlement;
    pub use crate::core::split::ExpenseSplit;
    pub use crate::core::transfer::Transfer;
    pub use crate::core::user::UserId;
    pub use crate::ledger::source::{InMemoryLedger, LedgerSnapshot, LedgerSource};
}
