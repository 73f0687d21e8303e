use crate::core::amount::{is_settled, TOLERANCE};
use crate::core::settlement::Settlement;
use crate::core::split::ExpenseSplit;
use crate::core::user::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Each user's position against the whole group.
///
/// A positive balance means the group owes the user (net creditor).
/// A negative balance means the user owes the group (net debtor).
/// Users within tolerance of zero are not stored at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetBalances {
    balances: BTreeMap<UserId, Decimal>,
    /// Exact sum of every balance before settled users were dropped.
    imbalance: Decimal,
}

impl NetBalances {
    /// Net balance of `user`. Users absent from the mapping are settled, so
    /// the lookup answers zero for them.
    pub fn get(&self, user: &UserId) -> Decimal {
        self.balances.get(user).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn contains(&self, user: &UserId) -> bool {
        self.balances.contains_key(user)
    }

    /// Unsettled users in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&UserId, Decimal)> {
        self.balances.iter().map(|(user, amount)| (user, *amount))
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Sum of the balances that survived the tolerance filter.
    pub fn total(&self) -> Decimal {
        self.balances.values().sum()
    }

    /// Exact sum of all balances before filtering. Zero for any ledger made
    /// of well-formed rows.
    pub fn imbalance(&self) -> Decimal {
        self.imbalance
    }

    /// Total owed to creditors (equivalently, owed by debtors).
    pub fn total_outstanding(&self) -> Decimal {
        self.balances
            .values()
            .filter(|v| **v > Decimal::ZERO)
            .sum()
    }

    /// Reports money that appeared or vanished during aggregation.
    pub fn conservation_anomaly(&self) -> Option<ConservationAnomaly> {
        if is_settled(self.imbalance) {
            None
        } else {
            Some(ConservationAnomaly {
                imbalance: self.imbalance,
            })
        }
    }
}

/// Build balances directly, e.g. from another system's totals. Entries for
/// the same user are summed and settled users are dropped.
impl FromIterator<(UserId, Decimal)> for NetBalances {
    fn from_iter<T: IntoIterator<Item = (UserId, Decimal)>>(iter: T) -> Self {
        let mut raw: BTreeMap<UserId, Decimal> = BTreeMap::new();
        for (user, amount) in iter {
            *raw.entry(user).or_insert(Decimal::ZERO) += amount;
        }
        let imbalance = raw.values().sum();
        Self {
            balances: raw
                .into_iter()
                .filter(|(_, amount)| !is_settled(*amount))
                .collect(),
            imbalance,
        }
    }
}

/// Net balances did not sum to zero.
///
/// Points at corrupted upstream rows. It is a warning attached to the
/// result; the computation still completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("net balances sum to {imbalance}, expected zero within {}", TOLERANCE)]
pub struct ConservationAnomaly {
    pub imbalance: Decimal,
}

/// Fold every split and settlement into per-user net balances.
///
/// # Algorithm
///
/// 1. For each split whose payer is not the debtor: the payer gains the
///    share, the debtor loses it. Self splits are skipped.
/// 2. For each settlement: the payer of the settlement gains the amount,
///    the receiver loses it.
/// 3. Users whose balance ends within tolerance of zero are dropped.
///
/// # Examples
///
/// ```
/// use settle_engine::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let a = UserId::new("A");
/// let b = UserId::new("B");
/// let splits = vec![ExpenseSplit::new(a.clone(), b.clone(), dec!(50)).unwrap()];
///
/// let net = compute_net_balances(&splits, &[]);
/// assert_eq!(net.get(&a), dec!(50));
/// assert_eq!(net.get(&b), dec!(-50));
/// ```
pub fn compute_net_balances(splits: &[ExpenseSplit], settlements: &[Settlement]) -> NetBalances {
    let mut raw: BTreeMap<UserId, Decimal> = BTreeMap::new();
    let mut skipped = 0usize;

    for split in splits {
        if split.is_self_split() {
            skipped += 1;
            continue;
        }
        *raw.entry(split.payer().clone()).or_insert(Decimal::ZERO) += split.share();
        *raw.entry(split.debtor().clone()).or_insert(Decimal::ZERO) -= split.share();
    }

    for settlement in settlements {
        *raw.entry(settlement.from().clone()).or_insert(Decimal::ZERO) += settlement.amount();
        *raw.entry(settlement.to().clone()).or_insert(Decimal::ZERO) -= settlement.amount();
    }

    let imbalance: Decimal = raw.values().sum();
    let seen = raw.len();
    let balances: BTreeMap<UserId, Decimal> = raw
        .into_iter()
        .filter(|(_, amount)| !is_settled(*amount))
        .collect();

    log::debug!(
        "aggregated {} users ({} unsettled), skipped {} self splits",
        seen,
        balances.len(),
        skipped
    );

    NetBalances {
        balances,
        imbalance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn split(payer: &str, debtor: &str, share: Decimal) -> ExpenseSplit {
        ExpenseSplit::new(UserId::new(payer), UserId::new(debtor), share).unwrap()
    }

    fn settle(from: &str, to: &str, amount: Decimal) -> Settlement {
        Settlement::new(UserId::new(from), UserId::new(to), amount).unwrap()
    }

    #[test]
    fn test_single_split() {
        let net = compute_net_balances(&[split("A", "B", dec!(50))], &[]);
        assert_eq!(net.get(&UserId::new("A")), dec!(50));
        assert_eq!(net.get(&UserId::new("B")), dec!(-50));
        assert_eq!(net.total(), Decimal::ZERO);
        assert_eq!(net.total_outstanding(), dec!(50));
    }

    #[test]
    fn test_self_split_ignored() {
        let net = compute_net_balances(&[split("A", "A", dec!(75))], &[]);
        assert!(net.is_empty());
        assert_eq!(net.get(&UserId::new("A")), Decimal::ZERO);
    }

    #[test]
    fn test_settlement_cancels_split() {
        let net = compute_net_balances(&[split("A", "B", dec!(30))], &[settle("B", "A", dec!(30))]);
        assert!(net.is_empty());
        assert_eq!(net.imbalance(), Decimal::ZERO);
    }

    #[test]
    fn test_partial_settlement() {
        let net = compute_net_balances(&[split("A", "B", dec!(30))], &[settle("B", "A", dec!(10))]);
        assert_eq!(net.get(&UserId::new("A")), dec!(20));
        assert_eq!(net.get(&UserId::new("B")), dec!(-20));
    }

    #[test]
    fn test_three_way_cycle_cancels() {
        let splits = [
            split("B", "A", dec!(10)),
            split("C", "B", dec!(10)),
            split("A", "C", dec!(10)),
        ];
        let net = compute_net_balances(&splits, &[]);
        assert!(net.is_empty());
    }

    #[test]
    fn test_dust_is_dropped() {
        let splits = [split("A", "B", dec!(10.00)), split("B", "A", dec!(9.995))];
        let net = compute_net_balances(&splits, &[]);
        assert!(net.is_empty());
        assert!(net.conservation_anomaly().is_none());
    }

    #[test]
    fn test_empty_input() {
        let net = compute_net_balances(&[], &[]);
        assert!(net.is_empty());
        assert_eq!(net.total(), Decimal::ZERO);
    }

    #[test]
    fn test_from_iter_sums_and_filters() {
        let net: NetBalances = vec![
            (UserId::new("A"), dec!(40)),
            (UserId::new("A"), dec!(60)),
            (UserId::new("B"), dec!(-100)),
            (UserId::new("C"), dec!(0.004)),
        ]
        .into_iter()
        .collect();
        assert_eq!(net.get(&UserId::new("A")), dec!(100));
        assert!(!net.contains(&UserId::new("C")));
        assert_eq!(net.imbalance(), dec!(0.004));
        assert!(net.conservation_anomaly().is_none());
    }

    #[test]
    fn test_anomaly_reported_for_unbalanced_mapping() {
        let net: NetBalances = vec![(UserId::new("A"), dec!(5))].into_iter().collect();
        let anomaly = net.conservation_anomaly().unwrap();
        assert_eq!(anomaly.imbalance, dec!(5));
        assert_eq!(
            anomaly.to_string(),
            "net balances sum to 5, expected zero within 0.01"
        );
    }
}
