use crate::balance::aggregator::{compute_net_balances, ConservationAnomaly, NetBalances};
use crate::balance::projector::{project_for_user, UserBalances};
use crate::balance::simplifier::simplify_debts;
use crate::core::error::LedgerError;
use crate::core::settlement::Settlement;
use crate::core::split::ExpenseSplit;
use crate::core::transfer::Transfer;
use crate::core::user::UserId;
use crate::ledger::source::LedgerSource;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Result of running the whole pipeline over one ledger snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceReport {
    /// Net position of every unsettled user.
    net_balances: NetBalances,
    /// Simplified transfers that settle every position.
    transfers: Vec<Transfer>,
    /// Non-self shares plus settlements, before netting.
    gross_total: Decimal,
    /// Set when the net balances do not sum to zero.
    anomaly: Option<ConservationAnomaly>,
}

impl BalanceReport {
    pub fn net_balances(&self) -> &NetBalances {
        &self.net_balances
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn anomaly(&self) -> Option<&ConservationAnomaly> {
        self.anomaly.as_ref()
    }

    /// Everything that changed hands or was owed, before netting.
    pub fn gross_total(&self) -> Decimal {
        self.gross_total
    }

    /// Money that still has to move after simplification.
    pub fn net_total(&self) -> Decimal {
        self.transfers.iter().map(|t| t.amount()).sum()
    }

    pub fn savings(&self) -> Decimal {
        self.gross_total - self.net_total()
    }

    /// Savings as a percentage of gross.
    pub fn savings_percent(&self) -> f64 {
        if self.gross_total == Decimal::ZERO {
            return 0.0;
        }
        let pct = self.savings() * Decimal::from(100) / self.gross_total;
        pct.to_f64().unwrap_or(0.0)
    }

    /// Per-counterparty view for one user.
    pub fn project_for(&self, user: &UserId) -> UserBalances {
        project_for_user(&self.transfers, user)
    }

    /// True when balances were conserved.
    pub fn is_valid(&self) -> bool {
        self.anomaly.is_none()
    }
}

impl std::fmt::Display for BalanceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Balance Report ===")?;
        writeln!(f, "Gross Total:    {}", self.gross_total.round_dp(2))?;
        writeln!(f, "Net Total:      {}", self.net_total().round_dp(2))?;
        writeln!(f, "Savings:        {:.1}%", self.savings_percent())?;
        writeln!(f, "Transfers:      {}", self.transfers.len())?;
        if let Some(anomaly) = &self.anomaly {
            writeln!(f, "WARNING:        {}", anomaly)?;
        }

        writeln!(f, "\n--- Net Balances ---")?;
        for (user, amount) in self.net_balances.iter() {
            writeln!(f, "  {:<15} {:>12}", user.as_str(), amount.round_dp(2))?;
        }

        writeln!(f, "\n--- Transfers ---")?;
        for transfer in &self.transfers {
            writeln!(f, "  {}", transfer)?;
        }
        Ok(())
    }
}

/// Runs the aggregate → simplify → project pipeline.
///
/// Every call recomputes from the rows it is given; nothing is cached and
/// the inputs are only read.
pub struct BalanceEngine;

impl BalanceEngine {
    /// Compute the full report from raw rows.
    ///
    /// A conservation anomaly is logged and attached to the report; the
    /// transfers are still computed from whatever the aggregation produced.
    pub fn compute(splits: &[ExpenseSplit], settlements: &[Settlement]) -> BalanceReport {
        let net_balances = compute_net_balances(splits, settlements);
        let anomaly = net_balances.conservation_anomaly();
        if let Some(anomaly) = &anomaly {
            log::warn!("data-integrity warning: {}", anomaly);
        }

        let transfers = simplify_debts(&net_balances);

        let gross_total = splits
            .iter()
            .filter(|s| !s.is_self_split())
            .map(|s| s.share())
            .sum::<Decimal>()
            + settlements.iter().map(|s| s.amount()).sum::<Decimal>();

        log::info!(
            "computed balances: {} splits, {} settlements, {} transfers",
            splits.len(),
            settlements.len(),
            transfers.len()
        );

        BalanceReport {
            net_balances,
            transfers,
            gross_total,
            anomaly,
        }
    }

    /// Read every row from `source` and compute the full report.
    pub fn report<S: LedgerSource + ?Sized>(source: &S) -> Result<BalanceReport, LedgerError> {
        let splits = source.list_all_splits()?;
        let settlements = source.list_all_settlements()?;
        Ok(Self::compute(&splits, &settlements))
    }

    /// Who owes `user` and whom `user` owes, after simplification.
    pub fn balances_for_user<S: LedgerSource + ?Sized>(
        source: &S,
        user: &UserId,
    ) -> Result<UserBalances, LedgerError> {
        Ok(Self::report(source)?.project_for(user))
    }
}
