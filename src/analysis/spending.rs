//! What a user spent, as opposed to what they owe.
//!
//! These figures count the user's own shares of expenses, including the
//! share of anything they paid for themselves. Settlements do not count as
//! spending.

use crate::core::expense::Expense;
use crate::core::user::UserId;
use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A user's share totals for this calendar month and the one before.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub current_month: Decimal,
    pub previous_month: Decimal,
}

impl MonthlySummary {
    pub fn change(&self) -> Decimal {
        self.current_month - self.previous_month
    }

    /// Month-over-month change in percent; zero when last month was empty.
    pub fn change_percent(&self) -> f64 {
        if self.previous_month == Decimal::ZERO {
            return 0.0;
        }
        let pct = self.change() * Decimal::from(100) / self.previous_month;
        pct.to_f64().unwrap_or(0.0)
    }
}

/// Spending overview for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingSummary {
    pub user: UserId,
    /// Sum of the user's shares across every expense.
    pub total_share: Decimal,
    pub by_category: BTreeMap<String, Decimal>,
    pub monthly: MonthlySummary,
}

impl SpendingSummary {
    pub fn for_user(expenses: &[Expense], user: &UserId, now: DateTime<Utc>) -> Self {
        let by_category = category_breakdown(expenses, user);
        SpendingSummary {
            user: user.clone(),
            total_share: by_category.values().sum(),
            by_category,
            monthly: monthly_summary(expenses, user, now),
        }
    }
}

impl std::fmt::Display for SpendingSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Spending for {} ===", self.user)?;
        writeln!(f, "Total Share:    {}", self.total_share.round_dp(2))?;
        writeln!(f, "This Month:     {}", self.monthly.current_month.round_dp(2))?;
        writeln!(f, "Last Month:     {}", self.monthly.previous_month.round_dp(2))?;
        writeln!(f, "Change:         {:.1}%", self.monthly.change_percent())?;

        writeln!(f, "\nBy Category:")?;
        for (category, amount) in &self.by_category {
            writeln!(f, "  {:<15} {:>12}", category, amount.round_dp(2))?;
        }
        Ok(())
    }
}

/// Sum of `user`'s shares per expense category.
pub fn category_breakdown(expenses: &[Expense], user: &UserId) -> BTreeMap<String, Decimal> {
    let mut breakdown: BTreeMap<String, Decimal> = BTreeMap::new();
    for expense in expenses {
        if !expense.splits().iter().any(|s| s.debtor() == user) {
            continue;
        }
        *breakdown
            .entry(expense.category().to_string())
            .or_insert(Decimal::ZERO) += expense.share_of(user);
    }
    breakdown
}

/// `user`'s share totals for the month containing `now` (up to `now`) and
/// for the whole previous month.
pub fn monthly_summary(expenses: &[Expense], user: &UserId, now: DateTime<Utc>) -> MonthlySummary {
    let current_start = month_start(now);
    let previous_start = month_start(current_start - Duration::days(1));

    let share_between = |start: DateTime<Utc>, end: DateTime<Utc>, inclusive: bool| -> Decimal {
        expenses
            .iter()
            .filter(|e| {
                let at = e.created_at();
                at >= start && (at < end || (inclusive && at == end))
            })
            .map(|e| e.share_of(user))
            .sum()
    };

    MonthlySummary {
        current_month: share_between(current_start, now, true),
        previous_month: share_between(previous_start, current_start, false),
    }
}

/// Expenses `user` paid for or shares in, newest first.
pub fn expenses_for_user<'a>(
    expenses: &'a [Expense],
    user: &UserId,
    limit: Option<usize>,
) -> Vec<&'a Expense> {
    let mut involved: Vec<&Expense> = expenses.iter().filter(|e| e.involves(user)).collect();
    involved.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    if let Some(limit) = limit {
        involved.truncate(limit);
    }
    involved
}

/// Expenses recorded under `group`, newest first.
pub fn expenses_for_group<'a>(expenses: &'a [Expense], group: &str) -> Vec<&'a Expense> {
    let mut in_group: Vec<&Expense> = expenses
        .iter()
        .filter(|e| e.group() == Some(group))
        .collect();
    in_group.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    in_group
}

fn month_start(at: DateTime<Utc>) -> DateTime<Utc> {
    let first = at.date_naive() - Duration::days(i64::from(at.day0()));
    Utc.from_utc_datetime(&first.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expense::SplitRule;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    fn expense(
        amount: Decimal,
        payer: &str,
        participants: &[&str],
        category: &str,
        when: DateTime<Utc>,
    ) -> Expense {
        Expense::new(
            "test",
            amount,
            UserId::new(payer),
            SplitRule::Equal(participants.iter().map(|p| UserId::new(*p)).collect()),
        )
        .unwrap()
        .with_category(category)
        .with_created_at(when)
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense(dec!(60), "A", &["A", "B"], "Food", at(2024, 3, 5)),
            expense(dec!(90), "B", &["A", "B", "C"], "Travel", at(2024, 3, 20)),
            expense(dec!(40), "A", &["A", "B"], "Food", at(2024, 2, 14)),
            expense(dec!(100), "C", &["B", "C"], "Rent", at(2024, 3, 1)),
        ]
    }

    #[test]
    fn test_category_breakdown_counts_own_shares() {
        let breakdown = category_breakdown(&sample(), &UserId::new("A"));
        assert_eq!(breakdown.get("Food"), Some(&dec!(50)));
        assert_eq!(breakdown.get("Travel"), Some(&dec!(30)));
        assert!(!breakdown.contains_key("Rent"));
    }

    #[test]
    fn test_monthly_summary() {
        let summary = monthly_summary(&sample(), &UserId::new("A"), at(2024, 3, 25));
        assert_eq!(summary.current_month, dec!(60));
        assert_eq!(summary.previous_month, dec!(20));
        assert_eq!(summary.change(), dec!(40));
        assert_relative_eq!(summary.change_percent(), 200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_monthly_summary_excludes_future_rows() {
        let summary = monthly_summary(&sample(), &UserId::new("A"), at(2024, 3, 10));
        assert_eq!(summary.current_month, dec!(30));
    }

    #[test]
    fn test_monthly_summary_crosses_year_boundary() {
        let expenses = vec![
            expense(dec!(10), "A", &["A"], "Food", at(2023, 12, 31)),
            expense(dec!(20), "A", &["A"], "Food", at(2024, 1, 2)),
        ];
        let summary = monthly_summary(&expenses, &UserId::new("A"), at(2024, 1, 15));
        assert_eq!(summary.current_month, dec!(20));
        assert_eq!(summary.previous_month, dec!(10));
    }

    #[test]
    fn test_expenses_for_user_newest_first() {
        let expenses = sample();
        let involved = expenses_for_user(&expenses, &UserId::new("C"), None);
        assert_eq!(involved.len(), 2);
        assert_eq!(involved[0].created_at(), at(2024, 3, 20));

        let limited = expenses_for_user(&expenses, &UserId::new("A"), Some(1));
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_expenses_for_group_newest_first() {
        let mut expenses = sample();
        expenses[0] = expenses[0].clone().with_group("Flat");
        expenses[3] = expenses[3].clone().with_group("Flat");
        expenses[1] = expenses[1].clone().with_group("Trip");

        let flat = expenses_for_group(&expenses, "Flat");
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].created_at(), at(2024, 3, 5));
        assert_eq!(flat[1].created_at(), at(2024, 3, 1));

        assert_eq!(expenses_for_group(&expenses, "Trip").len(), 1);
        assert!(expenses_for_group(&expenses, "Office").is_empty());
    }

    #[test]
    fn test_spending_summary_total() {
        let summary = SpendingSummary::for_user(&sample(), &UserId::new("B"), at(2024, 3, 25));
        // 30 + 30 + 20 + 50
        assert_eq!(summary.total_share, dec!(130));
        assert_eq!(summary.monthly.previous_month, dec!(20));
        assert!(summary.to_string().contains("Rent"));
    }
}
