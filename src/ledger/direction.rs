use crate::ledger::{add, resolve_numeric, RECEIVER_COMMISSION, SENDER_COMMISSION};
use crate::model::{Direction, Transaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How `partition_by_direction` orders each side.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    /// Keep the order the transactions were given in.
    #[default]
    AsGiven,
    /// Most recent `createdAt` first. Transactions without a timestamp go last, in the order they
    /// were given.
    NewestFirst,
}

/// The transactions of one branch split by which side the branch was on.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct DirectionSplit<'a> {
    pub sent: Vec<&'a Transaction>,
    pub received: Vec<&'a Transaction>,
}

impl DirectionSplit<'_> {
    pub fn len(&self) -> usize {
        self.sent.len() + self.received.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Splits `transactions` into those sent by `branch_id` and everything else.
pub fn partition_by_direction<'a>(
    transactions: &'a [Transaction],
    branch_id: &str,
    order: Order,
) -> DirectionSplit<'a> {
    let (mut sent, mut received): (Vec<&Transaction>, Vec<&Transaction>) = transactions
        .iter()
        .partition(|t| t.direction(branch_id) == Direction::Sent);
    if order == Order::NewestFirst {
        sort_newest_first(&mut sent);
        sort_newest_first(&mut received);
    }
    DirectionSplit { sent, received }
}

fn sort_newest_first(transactions: &mut [&Transaction]) {
    transactions.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
}

/// Totals of one side of a branch's transactions.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct DirectionTotals {
    pub direction: Direction,
    /// Sum of points, always positive. Used for display totals.
    pub gross_points_total: Decimal,
    /// Sum of points with the ledger sign applied: positive when sent, negative when received.
    pub signed_points_total: Decimal,
    /// Sum of the commission share for this side. Always positive.
    pub commission_total: Decimal,
    pub count: usize,
}

impl DirectionTotals {
    pub fn empty(direction: Direction) -> Self {
        Self {
            direction,
            gross_points_total: Decimal::ZERO,
            signed_points_total: Decimal::ZERO,
            commission_total: Decimal::ZERO,
            count: 0,
        }
    }
}

/// Folds `transactions` as if they were all on the `direction` side.
///
/// The caller passes one side of a `DirectionSplit`; no filtering happens here.
pub fn totals_for_direction<'a, I>(transactions: I, direction: Direction) -> DirectionTotals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let commission_chain = match direction {
        Direction::Sent => SENDER_COMMISSION,
        Direction::Received => RECEIVER_COMMISSION,
    };
    let mut totals = DirectionTotals::empty(direction);
    for t in transactions {
        totals.gross_points_total =
            add(totals.gross_points_total, t.points().unwrap_or_default());
        totals.commission_total = add(
            totals.commission_total,
            resolve_numeric(t, commission_chain, Decimal::ZERO),
        );
        totals.count += 1;
    }
    totals.signed_points_total = match direction {
        Direction::Sent => totals.gross_points_total,
        Direction::Received => -totals.gross_points_total,
    };
    totals
}
