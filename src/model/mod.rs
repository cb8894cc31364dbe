//! Types that represent the records the API returns, such as `Branch` and `Transaction`.
mod branch;
mod lenient;
mod points;
mod transaction;

pub use branch::{Branch, BranchRef};
pub use points::{Points, PointsError};
pub use transaction::{
    decode_all, Direction, Transaction, TransactionRecord, TransactionState,
};
