use crate::core::user::UserId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised when building ledger rows or reading them from a source.
///
/// The balance computation itself never fails; these are all rejected
/// at the edges, before rows reach the engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LedgerError {
    #[error("share owed by {debtor} must not be negative, got {share}")]
    NegativeShare { debtor: UserId, share: Decimal },
    #[error("settlement from {from} to {to} must be positive, got {amount}")]
    NonPositiveSettlement {
        from: UserId,
        to: UserId,
        amount: Decimal,
    },
    #[error("expense total must be positive, got {amount}")]
    NonPositiveExpense { amount: Decimal },
    #[error("an expense needs at least one participant")]
    NoParticipants,
    #[error("percentage for {user} must not be negative, got {percent}")]
    NegativePercentage { user: UserId, percent: Decimal },
    #[error("exact shares sum to {actual}, expected {expected}")]
    ExactSharesMismatch { expected: Decimal, actual: Decimal },
    #[error("percentages sum to {total}, expected 100")]
    PercentagesMismatch { total: Decimal },
    #[error("ledger source unavailable: {0}")]
    SourceUnavailable(String),
}
