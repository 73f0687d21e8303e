use crate::balance::aggregator::NetBalances;
use crate::core::amount::{is_credit, is_debt, is_settled};
use crate::core::transfer::Transfer;
use crate::core::user::UserId;
use rust_decimal::Decimal;

/// Turn net balances into point-to-point transfers that settle everyone.
///
/// Greedy minimum cash-flow: the largest debt is matched against the
/// largest credit first. This tends to keep the transfer count low but is
/// not a guaranteed minimum; finding the true minimum is a set-partition
/// problem.
///
/// # Algorithm
///
/// 1. Debtors (below -tolerance) sorted most negative first; creditors
///    (above tolerance) sorted largest first. Ties break on user id.
/// 2. Two cursors walk the sorted lists. Each step moves
///    `min(remaining debt, remaining credit)` from the current debtor to the
///    current creditor.
/// 3. A cursor advances once its remaining amount is settled. Every step
///    empties at least one side, so each ordered pair appears at most once.
/// 4. The walk stops when either list runs out. Users within tolerance of
///    zero were dropped from the balances, so their sub-cent dust can leave
///    the other side with a small unmatched residue. That residue is logged
///    and dropped; a real imbalance is reported by
///    [`NetBalances::conservation_anomaly`].
///
/// # Examples
///
/// ```
/// use settle_engine::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let net: NetBalances = vec![
///     (UserId::new("A"), dec!(100)),
///     (UserId::new("B"), dec!(-40)),
///     (UserId::new("C"), dec!(-60)),
/// ].into_iter().collect();
///
/// let transfers = simplify_debts(&net);
/// assert_eq!(transfers.len(), 2);
/// assert_eq!(transfers[0].from().as_str(), "C");
/// assert_eq!(transfers[0].amount(), dec!(60));
/// ```
pub fn simplify_debts(balances: &NetBalances) -> Vec<Transfer> {
    let mut debtors: Vec<(&UserId, Decimal)> = balances
        .iter()
        .filter(|(_, amount)| is_debt(*amount))
        .map(|(user, amount)| (user, amount.abs()))
        .collect();
    let mut creditors: Vec<(&UserId, Decimal)> = balances
        .iter()
        .filter(|(_, amount)| is_credit(*amount))
        .collect();

    // Both lists hold magnitudes, so "most negative first" is descending too.
    debtors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    creditors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut transfers = Vec::with_capacity(debtors.len().max(creditors.len()));
    let (mut i, mut j) = (0, 0);
    let mut debt = debtors.first().map(|d| d.1).unwrap_or(Decimal::ZERO);
    let mut credit = creditors.first().map(|c| c.1).unwrap_or(Decimal::ZERO);

    while i < debtors.len() && j < creditors.len() {
        let amount = debt.min(credit);
        transfers.push(Transfer::new(
            debtors[i].0.clone(),
            creditors[j].0.clone(),
            amount,
        ));
        debt -= amount;
        credit -= amount;

        if is_settled(debt) {
            i += 1;
            debt = debtors.get(i).map(|d| d.1).unwrap_or(Decimal::ZERO);
        }
        if is_settled(credit) {
            j += 1;
            credit = creditors.get(j).map(|c| c.1).unwrap_or(Decimal::ZERO);
        }
    }

    let unmatched_debt = remaining(&debtors, i, debt);
    let unmatched_credit = remaining(&creditors, j, credit);
    if !is_settled(unmatched_debt) || !is_settled(unmatched_credit) {
        log::warn!(
            "debt simplification left {} owed and {} due unmatched; \
             residue from balances dropped as settled",
            unmatched_debt,
            unmatched_credit
        );
    }

    log::debug!(
        "simplified {} debtors and {} creditors into {} transfers",
        debtors.len(),
        creditors.len(),
        transfers.len()
    );

    transfers
}

/// What is still open from `cursor` onwards, given the current entry has
/// `current` left.
fn remaining(entries: &[(&UserId, Decimal)], cursor: usize, current: Decimal) -> Decimal {
    if cursor >= entries.len() {
        return Decimal::ZERO;
    }
    current
        + entries[cursor + 1..]
            .iter()
            .map(|(_, amount)| *amount)
            .sum::<Decimal>()
}
