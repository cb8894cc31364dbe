//! Head-office balance: the net position across every branch, used as a reconciliation check.

use crate::ledger::{add, sub, sum};
use crate::model::Branch;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One branch's contribution to a `BalancePartition`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HoRow {
    pub branch_id: String,
    pub branch_name: String,
    pub transaction_balance: Decimal,
    pub remaining_transfer_commission: Decimal,
    /// `transaction_balance + remaining_transfer_commission`
    pub row_total: Decimal,
}

impl HoRow {
    fn new(branch: &Branch) -> Self {
        let transaction_balance = branch.transaction_balance();
        let remaining_transfer_commission = branch.remaining_transfer_commission();
        Self {
            branch_id: branch.id().to_string(),
            branch_name: branch.name().to_string(),
            transaction_balance,
            remaining_transfer_commission,
            row_total: add(transaction_balance, remaining_transfer_commission),
        }
    }
}

/// The branches on one side of zero, with their totals.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BalancePartition {
    pub rows: Vec<HoRow>,
    pub balance_total: Decimal,
    pub commission_total: Decimal,
    /// `balance_total + commission_total`
    pub total: Decimal,
}

impl BalancePartition {
    fn from_rows(rows: Vec<HoRow>) -> Self {
        let balance_total = sum(rows.iter().map(|r| r.transaction_balance));
        let commission_total = sum(rows.iter().map(|r| r.remaining_transfer_commission));
        Self {
            rows,
            balance_total,
            commission_total,
            total: add(balance_total, commission_total),
        }
    }
}

/// Splits branches into those with a strictly positive and those with a strictly negative
/// `transaction_balance`, returned as `(positive, negative)`. Branches at exactly zero (including
/// those with no balance at all) are left out of both.
pub fn partition_by_balance(branches: &[Branch]) -> (BalancePartition, BalancePartition) {
    let (positive, negative): (Vec<HoRow>, Vec<HoRow>) = branches
        .iter()
        .filter(|b| !b.transaction_balance().is_zero())
        .map(HoRow::new)
        .partition(|r| r.transaction_balance.is_sign_positive());
    (
        BalancePartition::from_rows(positive),
        BalancePartition::from_rows(negative),
    )
}

/// The head-office balance.
///
/// Commission is added into each partition's `total` and taken back out here, so the result is
/// `positive.balance_total - |negative.balance_total|`.
pub fn ho_balance(positive: &BalancePartition, negative: &BalancePartition) -> Decimal {
    sub(
        add(positive.total, negative.total),
        add(positive.commission_total, negative.commission_total),
    )
}

/// Both partitions and the head-office balance they produce.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct HoReport {
    pub positive: BalancePartition,
    pub negative: BalancePartition,
    pub ho_balance: Decimal,
}

impl HoReport {
    pub fn new(branches: &[Branch]) -> Self {
        let (positive, negative) = partition_by_balance(branches);
        let ho_balance = ho_balance(&positive, &negative);
        Self {
            positive,
            negative,
            ho_balance,
        }
    }

    /// True when the head-office balance equals the positive balances less the magnitude of the
    /// negative ones. False means the partitions were built from inconsistent data.
    pub fn identity_holds(&self) -> bool {
        self.ho_balance == sub(self.positive.balance_total, self.negative.balance_total.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branches() -> Vec<Branch> {
        vec![
            Branch::new("b1", "Surat")
                .with_transaction_balance(500)
                .with_remaining_transfer_commission(10),
            Branch::new("b2", "Mumbai")
                .with_transaction_balance(-300)
                .with_remaining_transfer_commission(4),
        ]
    }

    #[test]
    fn test_ho_balance_scenario() {
        let report = HoReport::new(&branches());
        assert_eq!(report.positive.total, Decimal::from(510));
        assert_eq!(report.negative.total, Decimal::from(-296));
        assert_eq!(report.positive.commission_total, Decimal::from(10));
        assert_eq!(report.negative.commission_total, Decimal::from(4));
        assert_eq!(report.ho_balance, Decimal::from(200));
        assert!(report.identity_holds());
    }

    #[test]
    fn test_zero_balance_branches_are_excluded() {
        let mut list = branches();
        list.push(
            Branch::new("b3", "Rajkot")
                .with_transaction_balance(0)
                .with_remaining_transfer_commission(99),
        );
        list.push(Branch::new("b4", "No balance").with_remaining_transfer_commission(50));
        let (positive, negative) = partition_by_balance(&list);
        assert_eq!(positive.rows.len(), 1);
        assert_eq!(negative.rows.len(), 1);
        assert!(positive
            .rows
            .iter()
            .chain(negative.rows.iter())
            .all(|r| r.branch_id != "b3" && r.branch_id != "b4"));
        assert_eq!(ho_balance(&positive, &negative), Decimal::from(200));
        assert_eq!(positive.commission_total, Decimal::from(10));
    }

    #[test]
    fn test_identity_over_many_branches() {
        let list: Vec<Branch> = (-5i64..=5)
            .map(|i| {
                Branch::new(format!("b{i}"), "x")
                    .with_transaction_balance(i * 137)
                    .with_remaining_transfer_commission(i.abs() * 3 + 1)
            })
            .collect();
        let report = HoReport::new(&list);
        assert_eq!(report.positive.rows.len(), 5);
        assert_eq!(report.negative.rows.len(), 5);
        assert!(report.identity_holds());
        // The balances are symmetric around zero.
        assert!(report.ho_balance.is_zero());
    }

    #[test]
    fn test_row_total() {
        let report = HoReport::new(&branches());
        assert_eq!(report.positive.rows[0].row_total, Decimal::from(510));
        assert_eq!(report.negative.rows[0].row_total, Decimal::from(-296));
    }

    #[test]
    fn test_overflowing_balances_do_not_panic() {
        let list: Vec<Branch> = serde_json::from_str(
            r#"[
                {"_id": "b1", "transaction_balance": "50000000000000000000000000000"},
                {"_id": "b2", "transaction_balance": "50000000000000000000000000000"},
                {"_id": "b3", "transaction_balance": -300, "remaining_transfer_commission": 4}
            ]"#,
        )
        .unwrap();
        let report = HoReport::new(&list);
        assert_eq!(report.positive.rows.len(), 2);
        assert!(report.positive.balance_total.is_zero());
        assert_eq!(report.negative.total, Decimal::from(-296));
        assert_eq!(report.ho_balance, Decimal::from(-300));
    }

    #[test]
    fn test_no_branches() {
        let report = HoReport::new(&[]);
        assert!(report.ho_balance.is_zero());
        assert!(report.identity_holds());
    }
}
