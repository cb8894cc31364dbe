use crate::ledger::sum;
use crate::model::Branch;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A branch that earned commission today.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CommissionRow {
    pub branch_id: String,
    pub branch_name: String,
    pub today_commission: Decimal,
}

/// Today's commission across the branches that earned any.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CommissionFooter {
    pub branches: Vec<CommissionRow>,
    pub total_branches: usize,
    pub total_today_commission: Decimal,
}

/// Sums `today_commission` over the branches where it is present and nonzero.
pub fn branch_commission_footer(branches: &[Branch]) -> CommissionFooter {
    let rows: Vec<CommissionRow> = branches
        .iter()
        .filter(|b| !b.today_commission().is_zero())
        .map(|b| CommissionRow {
            branch_id: b.id().to_string(),
            branch_name: b.name().to_string(),
            today_commission: b.today_commission(),
        })
        .collect();
    CommissionFooter {
        total_branches: rows.len(),
        total_today_commission: sum(rows.iter().map(|r| r.today_commission)),
        branches: rows,
    }
}
