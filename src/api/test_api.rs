//! Implements the `Api` trait using in-memory records for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without a live API.

use crate::api::Api;
use crate::codec::{encode_text, Codec};
use crate::model::{Branch, TransactionRecord};
use crate::Result;
use anyhow::Context;
use rust_decimal::Decimal;
use serde_json::json;

/// An implementation of the `Api` trait that serves seeded records from memory.
///
/// The seed has four branches. Surat and Mumbai have pre-aggregated figures that agree with their
/// transactions. Rajkot's are off by 5 so that divergence reporting can be seen. Pune has no
/// activity at all.
pub(crate) struct TestApi {
    branches: Vec<Branch>,
    transactions: Vec<TransactionRecord>,
}

impl TestApi {
    /// Create a `TestApi` seeded with records encoded by `codec`.
    pub(crate) fn new(codec: Codec) -> Result<Self> {
        Ok(Self {
            branches: seed_branches(),
            transactions: seed_transactions(&codec)?,
        })
    }
}

#[async_trait::async_trait]
impl Api for TestApi {
    async fn branches(&self) -> Result<Vec<Branch>> {
        Ok(self.branches.clone())
    }

    async fn transactions(&self, branch_id: &str) -> Result<Vec<TransactionRecord>> {
        Ok(self
            .transactions
            .iter()
            .filter(|r| r.involves(branch_id))
            .cloned()
            .collect())
    }
}

fn seed_branches() -> Vec<Branch> {
    vec![
        Branch::new("b1", "Surat")
            .with_location("Varachha Road")
            .with_opening_balance(10_000)
            .with_commission(1_250)
            .with_today_commission(32)
            .with_transaction_balance(10_300)
            .with_remaining_transfer_commission(49),
        Branch::new("b2", "Mumbai")
            .with_location("Zaveri Bazaar")
            .with_opening_balance(5_000)
            .with_commission(980)
            .with_today_commission(14)
            .with_transaction_balance(4_300)
            .with_remaining_transfer_commission(49),
        Branch::new("b3", "Rajkot")
            .with_location("Soni Bazaar")
            .with_opening_balance(-1_500)
            .with_commission(Decimal::new(4125, 1))
            .with_today_commission(0)
            .with_transaction_balance(-1_100)
            .with_remaining_transfer_commission(20),
        Branch::new("b4", "Pune")
            .with_location("Laxmi Road")
            .with_active(false)
            .with_opening_balance(0)
            .with_transaction_balance(0),
    ]
}

fn seed_transactions(codec: &Codec) -> Result<Vec<TransactionRecord>> {
    let mobile = |n: i64| codec.encode_number(n);
    let rows = vec![
        json!({
            "_id": "t1",
            "sender_branch": "b1",
            "receiver_branch": "b2",
            "sender_name": encode_text("Suresh Patel"),
            "receiver_name": encode_text("Ramesh Shah"),
            "sender_mobile": mobile(9_825_012_345),
            "receiver_mobile": mobile(9_820_054_321),
            "points": codec.encode_number(2_000),
            "sender_commision": 20,
            "receiver_commision": 10,
            "admin_permission": true,
            "status": true,
            "createdAt": "2024-03-01T09:00:00.000Z"
        }),
        json!({
            "_id": "t2",
            "sender_branch": "b2",
            "receiver_branch": "b1",
            "sender_name": encode_text("Mahesh Mehta"),
            "receiver_name": encode_text("Dinesh Joshi"),
            "sender_mobile": mobile(9_820_011_111),
            "receiver_mobile": mobile(9_825_022_222),
            "points": codec.encode_number(3_500),
            "sender_commision": 35,
            "receiver_commision": 15,
            "admin_permission": true,
            "status": false,
            "createdAt": "2024-03-01T11:30:00.000Z"
        }),
        // Older record: a single commission field instead of the split.
        json!({
            "_id": "t3",
            "sender_branch": "b1",
            "receiver_branch": "b3",
            "sender_name": encode_text("Kiran Desai"),
            "receiver_name": encode_text("Nilesh Vora"),
            "sender_mobile": mobile(9_825_033_333),
            "receiver_mobile": "",
            "points": codec.encode_number(1_200),
            "commission": 12,
            "admin_permission": false,
            "status": false,
            "createdAt": "2024-03-02T08:15:00.000Z"
        }),
        json!({
            "_id": "t4",
            "sender_branch": "b3",
            "receiver_branch": "b2",
            "sender_name": encode_text("Nilesh Vora"),
            "receiver_name": encode_text("Ramesh Shah"),
            "sender_mobile": mobile(9_824_044_444),
            "receiver_mobile": mobile(9_820_054_321),
            "points": codec.encode_number(800),
            "sender_commision": "8",
            "receiver_commision": 4,
            "admin_permission": true,
            "status": true,
            "createdAt": "2024-03-02T13:45:00.000Z"
        }),
        // Corrupted points value.
        json!({
            "_id": "t5",
            "sender_branch": "b3",
            "receiver_branch": "b1",
            "sender_name": encode_text("Jignesh Rana"),
            "receiver_name": encode_text("Suresh Patel"),
            "sender_mobile": mobile(9_824_055_555),
            "receiver_mobile": mobile(9_825_012_345),
            "points": "THisisxyzMyAge",
            "sender_commision": 5,
            "receiver_commision": 2,
            "admin_permission": true,
            "status": false,
            "createdAt": "2024-03-03T10:00:00.000Z"
        }),
    ];
    rows.into_iter()
        .map(|row| serde_json::from_value(row).context("Invalid seed transaction"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{
        branch_ledger, partition_by_direction, totals_for_direction, HoReport, Order,
    };
    use crate::model::{decode_all, Direction};

    async fn summary(api: &TestApi, branch_id: &str) -> crate::ledger::LedgerSummary {
        let codec = Codec::default();
        let branch = api.branch(branch_id).await.unwrap();
        let records = api.transactions(branch_id).await.unwrap();
        let txs = decode_all(&records, &codec);
        let split = partition_by_direction(&txs, branch_id, Order::AsGiven);
        let sent = totals_for_direction(split.sent.iter().copied(), Direction::Sent);
        let received = totals_for_direction(split.received.iter().copied(), Direction::Received);
        branch_ledger(&branch, &sent, &received)
    }

    #[tokio::test]
    async fn test_transactions_filtered_by_branch() {
        let api = TestApi::new(Codec::default()).unwrap();
        let ids = |records: Vec<TransactionRecord>| -> Vec<String> {
            records.iter().map(|r| r.id().to_string()).collect()
        };
        assert_eq!(
            ids(api.transactions("b1").await.unwrap()),
            vec!["t1", "t2", "t3", "t5"]
        );
        assert_eq!(ids(api.transactions("b2").await.unwrap()), vec!["t1", "t2", "t4"]);
        assert!(api.transactions("b4").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_seed_agrees_for_surat_and_mumbai() {
        let api = TestApi::new(Codec::default()).unwrap();

        let surat = summary(&api, "b1").await;
        assert_eq!(surat.balance_before_commission, Decimal::from(10_300));
        assert_eq!(surat.balance_after_commission, Decimal::from(10_349));
        assert_eq!(surat.divergence(), None);

        let mumbai = summary(&api, "b2").await;
        assert_eq!(mumbai.net_points, Decimal::from(-700));
        assert_eq!(mumbai.balance_after_commission, Decimal::from(4_349));
        assert_eq!(mumbai.divergence(), None);
    }

    #[tokio::test]
    async fn test_seed_diverges_for_rajkot() {
        let api = TestApi::new(Codec::default()).unwrap();
        let rajkot = summary(&api, "b3").await;
        assert_eq!(rajkot.net_points, Decimal::from(400));
        assert_eq!(rajkot.net_commission, Decimal::from(25));
        assert_eq!(rajkot.balance_after_commission, Decimal::from(-1_075));
        assert_eq!(rajkot.balance_after_commission_alt, Decimal::from(-1_080));
        assert_eq!(rajkot.divergence(), Some(Decimal::from(5)));
    }

    #[tokio::test]
    async fn test_seed_ho_balance() {
        let api = TestApi::new(Codec::default()).unwrap();
        let report = HoReport::new(&api.branches().await.unwrap());
        assert_eq!(report.positive.rows.len(), 2);
        assert_eq!(report.negative.rows.len(), 1);
        assert_eq!(report.ho_balance, Decimal::from(13_500));
        assert!(report.identity_holds());
    }

    #[tokio::test]
    async fn test_seed_with_custom_codec() {
        let codec = Codec::new("s3cr3t", 500);
        let api = TestApi::new(codec.clone()).unwrap();
        let records = api.transactions("b1").await.unwrap();
        let txs = decode_all(&records, &codec);
        assert_eq!(txs[0].points(), Some(Decimal::from(2_000)));
        assert_eq!(txs[0].sender_name(), "Suresh Patel");
        assert_eq!(txs[0].sender_mobile(), Some(9_825_012_345));
    }
}
