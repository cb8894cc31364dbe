use crate::codec::{decode_text, Codec, Encoded};
use crate::model::{lenient, BranchRef};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A transaction exactly as the API sends it. The name, mobile and points fields are obfuscated
/// and must go through `decode` before use.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TransactionRecord {
    #[serde(rename = "_id", alias = "id", default)]
    id: String,
    #[serde(default)]
    sender_branch: BranchRef,
    #[serde(default)]
    receiver_branch: BranchRef,
    #[serde(default)]
    sender_name: Encoded,
    #[serde(default)]
    receiver_name: Encoded,
    #[serde(default)]
    sender_mobile: Encoded,
    #[serde(default)]
    receiver_mobile: Encoded,
    #[serde(default)]
    points: Encoded,
    #[serde(default, deserialize_with = "lenient::decimal")]
    sender_commision: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    receiver_commision: Option<Decimal>,
    /// Older records carry a single commission instead of the sender/receiver split.
    #[serde(default, deserialize_with = "lenient::decimal")]
    commission: Option<Decimal>,
    #[serde(default)]
    admin_permission: bool,
    #[serde(default)]
    status: bool,
    #[serde(rename = "createdAt", default, deserialize_with = "lenient::timestamp")]
    created_at: Option<DateTime<Utc>>,
}

impl TransactionRecord {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sender_branch(&self) -> &BranchRef {
        &self.sender_branch
    }

    pub fn receiver_branch(&self) -> &BranchRef {
        &self.receiver_branch
    }

    /// True when `branch_id` is the sender or the receiver.
    pub fn involves(&self, branch_id: &str) -> bool {
        self.sender_branch.id() == branch_id || self.receiver_branch.id() == branch_id
    }

    /// Decodes the obfuscated fields. Never fails: a malformed number decodes to `None`.
    pub fn decode(&self, codec: &Codec) -> Transaction {
        let points = codec.decode(&self.points).map(Decimal::from);
        if points.is_none() {
            warn!(
                "Transaction '{}' has a malformed points value {:?}",
                self.id, self.points
            );
        }
        Transaction {
            id: self.id.clone(),
            sender_branch: self.sender_branch.clone(),
            receiver_branch: self.receiver_branch.clone(),
            sender_name: decode_text(self.sender_name.as_str()),
            receiver_name: decode_text(self.receiver_name.as_str()),
            sender_mobile: codec.decode(&self.sender_mobile),
            receiver_mobile: codec.decode(&self.receiver_mobile),
            points,
            sender_commision: self.sender_commision,
            receiver_commision: self.receiver_commision,
            commission: self.commission,
            admin_permission: self.admin_permission,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// Decodes a whole list of records with the same codec.
pub fn decode_all(records: &[TransactionRecord], codec: &Codec) -> Vec<Transaction> {
    records
        .iter()
        .map(|r| codec.decode_transaction(r))
        .collect()
}

/// The side of a transaction a branch is on.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Sent,
    Received,
}

serde_plain::derive_display_from_serialize!(Direction);
serde_plain::derive_fromstr_from_deserialize!(Direction);

/// Where a transaction is in the approval flow.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionState {
    /// Not yet approved by an admin.
    Pending,
    /// Approved but not settled.
    Approved,
    /// Fully settled.
    Settled,
}

serde_plain::derive_display_from_serialize!(TransactionState);
serde_plain::derive_fromstr_from_deserialize!(TransactionState);

/// A transaction with its obfuscated fields decoded.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    id: String,
    sender_branch: BranchRef,
    receiver_branch: BranchRef,
    sender_name: String,
    receiver_name: String,
    sender_mobile: Option<i64>,
    receiver_mobile: Option<i64>,
    /// `None` when the encoded value was malformed.
    points: Option<Decimal>,
    sender_commision: Option<Decimal>,
    receiver_commision: Option<Decimal>,
    commission: Option<Decimal>,
    admin_permission: bool,
    status: bool,
    created_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        sender_branch: impl Into<BranchRef>,
        receiver_branch: impl Into<BranchRef>,
        points: impl Into<Decimal>,
    ) -> Self {
        Self {
            id: id.into(),
            sender_branch: sender_branch.into(),
            receiver_branch: receiver_branch.into(),
            points: Some(points.into()),
            ..Default::default()
        }
    }

    pub fn with_names(mut self, sender: impl Into<String>, receiver: impl Into<String>) -> Self {
        self.sender_name = sender.into();
        self.receiver_name = receiver.into();
        self
    }

    pub fn with_points(mut self, points: Option<Decimal>) -> Self {
        self.points = points;
        self
    }

    pub fn with_sender_commision(mut self, value: impl Into<Decimal>) -> Self {
        self.sender_commision = Some(value.into());
        self
    }

    pub fn with_receiver_commision(mut self, value: impl Into<Decimal>) -> Self {
        self.receiver_commision = Some(value.into());
        self
    }

    pub fn with_commission(mut self, value: impl Into<Decimal>) -> Self {
        self.commission = Some(value.into());
        self
    }

    pub fn with_flags(mut self, admin_permission: bool, status: bool) -> Self {
        self.admin_permission = admin_permission;
        self.status = status;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sender_branch(&self) -> &BranchRef {
        &self.sender_branch
    }

    pub fn receiver_branch(&self) -> &BranchRef {
        &self.receiver_branch
    }

    pub fn sender_name(&self) -> &str {
        &self.sender_name
    }

    pub fn receiver_name(&self) -> &str {
        &self.receiver_name
    }

    pub fn sender_mobile(&self) -> Option<i64> {
        self.sender_mobile
    }

    pub fn receiver_mobile(&self) -> Option<i64> {
        self.receiver_mobile
    }

    pub fn points(&self) -> Option<Decimal> {
        self.points
    }

    pub fn sender_commision(&self) -> Option<Decimal> {
        self.sender_commision
    }

    pub fn receiver_commision(&self) -> Option<Decimal> {
        self.receiver_commision
    }

    pub fn commission(&self) -> Option<Decimal> {
        self.commission
    }

    pub fn admin_permission(&self) -> bool {
        self.admin_permission
    }

    pub fn status(&self) -> bool {
        self.status
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// `Sent` when `branch_id` is the sender, otherwise `Received`.
    pub fn direction(&self, branch_id: &str) -> Direction {
        if self.sender_branch.id() == branch_id {
            Direction::Sent
        } else {
            Direction::Received
        }
    }

    pub fn state(&self) -> TransactionState {
        if self.status {
            TransactionState::Settled
        } else if self.admin_permission {
            TransactionState::Approved
        } else {
            TransactionState::Pending
        }
    }
}
