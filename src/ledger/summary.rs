use crate::ledger::{
    add, resolve_numeric, sub, DirectionTotals, RECEIVER_COMMISSION, SENDER_COMMISSION,
};
use crate::model::{Branch, Direction, Transaction, TransactionState};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The derived ledger figures of one branch.
///
/// Two forms of the post-commission balance are carried:
/// - `balance_after_commission` is computed here from the transactions.
/// - `balance_after_commission_alt` is taken from the figures the API pre-aggregates.
///
/// They are expected to agree but are not forced to. See `divergence`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub branch_id: String,
    pub branch_name: String,
    pub opening_balance: Decimal,
    pub gross_sent_points: Decimal,
    pub gross_received_points: Decimal,
    /// Received minus sent. Inflow is positive.
    pub net_points: Decimal,
    pub sent_commission: Decimal,
    pub received_commission: Decimal,
    /// Commission is always an inflow, whichever side earned it.
    pub net_commission: Decimal,
    pub balance_before_commission: Decimal,
    pub balance_after_commission: Decimal,
    pub balance_after_commission_alt: Decimal,
}

impl LedgerSummary {
    /// Returns `balance_after_commission - balance_after_commission_alt` when the two forms
    /// disagree. A disagreement is a data problem to raise with the API owner.
    pub fn divergence(&self) -> Option<Decimal> {
        let difference = sub(self.balance_after_commission, self.balance_after_commission_alt);
        if difference.is_zero() {
            None
        } else {
            Some(difference)
        }
    }
}

/// Combines a branch with the totals of its sent and received transactions.
pub fn branch_ledger(
    branch: &Branch,
    sent: &DirectionTotals,
    received: &DirectionTotals,
) -> LedgerSummary {
    let opening_balance = branch.opening_balance();
    let net_points = sub(received.gross_points_total, sent.gross_points_total);
    let net_commission = add(sent.commission_total, received.commission_total);
    let balance_before_commission = add(opening_balance, net_points);
    LedgerSummary {
        branch_id: branch.id().to_string(),
        branch_name: branch.name().to_string(),
        opening_balance,
        gross_sent_points: sent.gross_points_total,
        gross_received_points: received.gross_points_total,
        net_points,
        sent_commission: sent.commission_total,
        received_commission: received.commission_total,
        net_commission,
        balance_before_commission,
        balance_after_commission: add(balance_before_commission, net_commission),
        balance_after_commission_alt: add(
            branch.transaction_balance(),
            branch.remaining_transfer_commission(),
        ),
    }
}

/// One line of a branch statement.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    pub transaction_id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub direction: Direction,
    pub state: TransactionState,
    /// The other party: the receiver's name on a sent line, the sender's on a received line.
    pub counterparty: String,
    pub points: Decimal,
    pub commission: Decimal,
    /// Running balance after this line, starting from the opening balance.
    pub balance: Decimal,
}

/// Builds a running-balance statement for `branch` over `transactions`, in the order given.
///
/// Received points add to the balance, sent points subtract from it and the branch's commission
/// share adds to it. Over the same transactions, the last row's balance equals
/// `branch_ledger(..).balance_after_commission`.
pub fn statement<'a, I>(branch: &Branch, transactions: I) -> Vec<StatementRow>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut balance = branch.opening_balance();
    transactions
        .into_iter()
        .map(|t| {
            let direction = t.direction(branch.id());
            let points = t.points().unwrap_or_default();
            let (signed, commission, counterparty) = match direction {
                Direction::Sent => (
                    -points,
                    resolve_numeric(t, SENDER_COMMISSION, Decimal::ZERO),
                    t.receiver_name(),
                ),
                Direction::Received => (
                    points,
                    resolve_numeric(t, RECEIVER_COMMISSION, Decimal::ZERO),
                    t.sender_name(),
                ),
            };
            balance = add(balance, add(signed, commission));
            StatementRow {
                transaction_id: t.id().to_string(),
                created_at: t.created_at(),
                direction,
                state: t.state(),
                counterparty: counterparty.to_string(),
                points,
                commission,
                balance,
            }
        })
        .collect()
}
