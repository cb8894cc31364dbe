//! Pure functions that turn decoded branch and transaction records into the ledger figures shown
//! in reports.
//!
//! Nothing in this module fails or mutates its inputs. Missing or malformed numbers are folded as
//! zero so that a bad record produces a wrong-looking total rather than a failed report.

mod direction;
mod footer;
mod ho;
mod summary;

use crate::model::Transaction;
use rust_decimal::Decimal;
use tracing::warn;

pub use direction::{
    partition_by_direction, totals_for_direction, DirectionSplit, DirectionTotals, Order,
};
pub use footer::{branch_commission_footer, CommissionFooter, CommissionRow};
pub use ho::{ho_balance, partition_by_balance, BalancePartition, HoReport, HoRow};
pub use summary::{branch_ledger, statement, LedgerSummary, StatementRow};

/// Reads one numeric field of a record, `None` when the field is absent or malformed.
pub type Accessor<T> = fn(&T) -> Option<Decimal>;

/// The commission attributed to the sending side, falling back to the single commission field
/// carried by older records.
pub const SENDER_COMMISSION: &[Accessor<Transaction>] =
    &[Transaction::sender_commision, Transaction::commission];

/// The commission attributed to the receiving side, falling back to the single commission field
/// carried by older records.
pub const RECEIVER_COMMISSION: &[Accessor<Transaction>] =
    &[Transaction::receiver_commision, Transaction::commission];

/// Evaluates `accessors` left to right and returns the first value present, or `default` when
/// none is.
///
/// # Examples
///
/// ```
/// # use angadia_ledger::ledger::{resolve_numeric, SENDER_COMMISSION};
/// # use angadia_ledger::model::Transaction;
/// # use rust_decimal::Decimal;
/// let old = Transaction::new("t1", "b1", "b2", 100).with_commission(3);
/// assert_eq!(resolve_numeric(&old, SENDER_COMMISSION, Decimal::ZERO), Decimal::from(3));
/// ```
pub fn resolve_numeric<T>(record: &T, accessors: &[Accessor<T>], default: Decimal) -> Decimal {
    accessors
        .iter()
        .find_map(|accessor| accessor(record))
        .unwrap_or(default)
}

/// Adds two figures. A sum outside the range of `Decimal` is unreadable and becomes zero.
pub(crate) fn add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or_else(|| {
        warn!("Adding {a} and {b} overflowed, using zero");
        Decimal::ZERO
    })
}

/// Subtracts `b` from `a`. See `add`.
pub(crate) fn sub(a: Decimal, b: Decimal) -> Decimal {
    add(a, -b)
}

/// Folds `values` with `add`.
pub(crate) fn sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().fold(Decimal::ZERO, add)
}
