use crate::core::error::LedgerError;
use crate::core::split::ExpenseSplit;
use crate::core::user::UserId;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Largest gap allowed between exact shares and the expense total.
pub const EXACT_SHARE_TOLERANCE: Decimal = dec!(0.05);

/// Largest gap allowed between the sum of percentages and 100.
pub const PERCENT_TOLERANCE: Decimal = dec!(0.5);

const CENT: Decimal = dec!(0.01);
const HUNDRED: Decimal = dec!(100);

/// How an expense total is divided among its participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SplitRule {
    /// Everyone listed pays the same share.
    Equal(Vec<UserId>),
    /// Each participant pays the amount given.
    Exact(Vec<(UserId, Decimal)>),
    /// Each participant pays the given percentage of the total.
    Percent(Vec<(UserId, Decimal)>),
}

impl SplitRule {
    pub fn split_type(&self) -> SplitType {
        match self {
            SplitRule::Equal(_) => SplitType::Equal,
            SplitRule::Exact(_) => SplitType::Exact,
            SplitRule::Percent(_) => SplitType::Percent,
        }
    }

    /// Resolve the rule into per-user shares of `total`.
    pub fn shares(&self, total: Decimal) -> Result<Vec<(UserId, Decimal)>, LedgerError> {
        match self {
            SplitRule::Equal(participants) => equal_shares(total, participants),
            SplitRule::Exact(shares) => exact_shares(total, shares),
            SplitRule::Percent(percentages) => percent_shares(total, percentages),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    Equal,
    Exact,
    Percent,
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SplitType::Equal => "equal",
            SplitType::Exact => "exact",
            SplitType::Percent => "percent",
        };
        f.write_str(label)
    }
}

/// Truncates each share to cents and hands the leftover out one cent at a
/// time, so the shares always add up to `total` exactly.
fn equal_shares(
    total: Decimal,
    participants: &[UserId],
) -> Result<Vec<(UserId, Decimal)>, LedgerError> {
    if participants.is_empty() {
        return Err(LedgerError::NoParticipants);
    }
    let count = Decimal::from(participants.len());
    let base = (total / count).round_dp_with_strategy(2, RoundingStrategy::ToZero);
    let mut leftover = total - base * count;

    Ok(participants
        .iter()
        .map(|user| {
            let extra = leftover.min(CENT);
            leftover -= extra;
            (user.clone(), base + extra)
        })
        .collect())
}

fn exact_shares(
    total: Decimal,
    shares: &[(UserId, Decimal)],
) -> Result<Vec<(UserId, Decimal)>, LedgerError> {
    if shares.is_empty() {
        return Err(LedgerError::NoParticipants);
    }
    if let Some((user, share)) = shares.iter().find(|(_, share)| *share < Decimal::ZERO) {
        return Err(LedgerError::NegativeShare {
            debtor: user.clone(),
            share: *share,
        });
    }
    let actual: Decimal = shares.iter().map(|(_, share)| *share).sum();
    if (actual - total).abs() > EXACT_SHARE_TOLERANCE {
        return Err(LedgerError::ExactSharesMismatch {
            expected: total,
            actual,
        });
    }
    Ok(shares.to_vec())
}

fn percent_shares(
    total: Decimal,
    percentages: &[(UserId, Decimal)],
) -> Result<Vec<(UserId, Decimal)>, LedgerError> {
    if percentages.is_empty() {
        return Err(LedgerError::NoParticipants);
    }
    if let Some((user, percent)) = percentages.iter().find(|(_, p)| *p < Decimal::ZERO) {
        return Err(LedgerError::NegativePercentage {
            user: user.clone(),
            percent: *percent,
        });
    }
    let sum: Decimal = percentages.iter().map(|(_, p)| *p).sum();
    if (sum - HUNDRED).abs() > PERCENT_TOLERANCE {
        return Err(LedgerError::PercentagesMismatch { total: sum });
    }
    Ok(percentages
        .iter()
        .map(|(user, percent)| (user.clone(), total * *percent / HUNDRED))
        .collect())
}

/// A shared purchase paid by one user and divided among participants.
///
/// Building an expense validates the split rule and produces one
/// [`ExpenseSplit`] per participant, payer included. The payer's own row is
/// kept for spending reports and ignored when computing balances.
///
/// # Examples
///
/// ```
/// use settle_engine::core::expense::{Expense, SplitRule};
/// use settle_engine::core::user::UserId;
/// use rust_decimal_macros::dec;
///
/// let alice = UserId::new("alice");
/// let bob = UserId::new("bob");
/// let dinner = Expense::new(
///     "Dinner",
///     dec!(90),
///     alice.clone(),
///     SplitRule::Equal(vec![alice, bob]),
/// ).unwrap();
///
/// assert_eq!(dinner.splits().len(), 2);
/// assert_eq!(dinner.splits()[1].share(), dec!(45));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    id: Uuid,
    description: String,
    amount: Decimal,
    category: String,
    payer: UserId,
    group: Option<String>,
    split_type: SplitType,
    splits: Vec<ExpenseSplit>,
    created_at: DateTime<Utc>,
}

impl Expense {
    pub const DEFAULT_CATEGORY: &'static str = "General";

    /// Create an expense, rejecting non-positive totals and invalid rules.
    pub fn new(
        description: impl Into<String>,
        amount: Decimal,
        payer: UserId,
        rule: SplitRule,
    ) -> Result<Self, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveExpense { amount });
        }

        let splits = rule
            .shares(amount)?
            .into_iter()
            .map(|(debtor, share)| ExpenseSplit::new(payer.clone(), debtor, share))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount,
            category: Self::DEFAULT_CATEGORY.to_string(),
            payer,
            group: None,
            split_type: rule.split_type(),
            splits,
            created_at: Utc::now(),
        })
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn payer(&self) -> &UserId {
        &self.payer
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn split_type(&self) -> SplitType {
        self.split_type
    }

    pub fn splits(&self) -> &[ExpenseSplit] {
        &self.splits
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The share `user` carries in this expense, zero if not a participant.
    pub fn share_of(&self, user: &UserId) -> Decimal {
        self.splits
            .iter()
            .filter(|s| s.debtor() == user)
            .map(|s| s.share())
            .sum()
    }

    /// Whether `user` paid for or takes part in this expense.
    pub fn involves(&self, user: &UserId) -> bool {
        &self.payer == user || self.splits.iter().any(|s| s.debtor() == user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users(ids: &[&str]) -> Vec<UserId> {
        ids.iter().map(|id| UserId::new(*id)).collect()
    }

    #[test]
    fn test_equal_split_divides_evenly() {
        let expense = Expense::new(
            "Groceries",
            dec!(90),
            UserId::new("A"),
            SplitRule::Equal(users(&["A", "B", "C"])),
        )
        .unwrap();

        assert_eq!(expense.split_type(), SplitType::Equal);
        for split in expense.splits() {
            assert_eq!(split.share(), dec!(30));
            assert_eq!(split.payer().as_str(), "A");
        }
    }

    #[test]
    fn test_equal_split_distributes_leftover_cents() {
        let expense = Expense::new(
            "Taxi",
            dec!(100),
            UserId::new("A"),
            SplitRule::Equal(users(&["A", "B", "C"])),
        )
        .unwrap();

        let shares: Vec<Decimal> = expense.splits().iter().map(|s| s.share()).collect();
        assert_eq!(shares, vec![dec!(33.34), dec!(33.33), dec!(33.33)]);
        assert_eq!(shares.iter().sum::<Decimal>(), dec!(100));
    }

    #[test]
    fn test_equal_split_requires_participants() {
        let result = Expense::new("Nothing", dec!(10), UserId::new("A"), SplitRule::Equal(vec![]));
        assert_eq!(result.unwrap_err(), LedgerError::NoParticipants);
    }

    #[test]
    fn test_exact_split_within_tolerance() {
        let rule = SplitRule::Exact(vec![
            (UserId::new("A"), dec!(40)),
            (UserId::new("B"), dec!(59.97)),
        ]);
        let expense = Expense::new("Hotel", dec!(100), UserId::new("A"), rule).unwrap();
        assert_eq!(expense.share_of(&UserId::new("B")), dec!(59.97));
    }

    #[test]
    fn test_exact_split_mismatch_rejected() {
        let rule = SplitRule::Exact(vec![
            (UserId::new("A"), dec!(40)),
            (UserId::new("B"), dec!(50)),
        ]);
        let err = Expense::new("Hotel", dec!(100), UserId::new("A"), rule).unwrap_err();
        assert_eq!(
            err,
            LedgerError::ExactSharesMismatch {
                expected: dec!(100),
                actual: dec!(90),
            }
        );
    }

    #[test]
    fn test_exact_split_negative_rejected() {
        let rule = SplitRule::Exact(vec![
            (UserId::new("A"), dec!(110)),
            (UserId::new("B"), dec!(-10)),
        ]);
        let err = Expense::new("Hotel", dec!(100), UserId::new("A"), rule).unwrap_err();
        assert!(matches!(err, LedgerError::NegativeShare { .. }));
    }

    #[test]
    fn test_percent_split() {
        let rule = SplitRule::Percent(vec![
            (UserId::new("A"), dec!(25)),
            (UserId::new("B"), dec!(75)),
        ]);
        let expense = Expense::new("Rent", dec!(2000), UserId::new("A"), rule).unwrap();
        assert_eq!(expense.share_of(&UserId::new("A")), dec!(500));
        assert_eq!(expense.share_of(&UserId::new("B")), dec!(1500));
    }

    #[test]
    fn test_percent_split_mismatch_rejected() {
        let rule = SplitRule::Percent(vec![
            (UserId::new("A"), dec!(25)),
            (UserId::new("B"), dec!(70)),
        ]);
        let err = Expense::new("Rent", dec!(2000), UserId::new("A"), rule).unwrap_err();
        assert_eq!(err, LedgerError::PercentagesMismatch { total: dec!(95) });
    }

    #[test]
    fn test_non_positive_total_rejected() {
        let err = Expense::new(
            "Free lunch",
            Decimal::ZERO,
            UserId::new("A"),
            SplitRule::Equal(users(&["A"])),
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::NonPositiveExpense { .. }));
    }

    #[test]
    fn test_builders_and_involvement() {
        let expense = Expense::new(
            "Museum",
            dec!(30),
            UserId::new("A"),
            SplitRule::Equal(users(&["B", "C"])),
        )
        .unwrap()
        .with_category("Entertainment")
        .with_group("Trip");

        assert_eq!(expense.category(), "Entertainment");
        assert_eq!(expense.group(), Some("Trip"));
        assert!(expense.involves(&UserId::new("A")));
        assert!(expense.involves(&UserId::new("C")));
        assert!(!expense.involves(&UserId::new("D")));
        assert_eq!(expense.share_of(&UserId::new("A")), Decimal::ZERO);
    }
}
