use crate::api::{api, Mode};
use crate::args::LedgerArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::ledger::{
    branch_ledger, partition_by_direction, statement, totals_for_direction, DirectionTotals,
    LedgerSummary, Order, StatementRow,
};
use crate::model::{decode_all, Direction, Transaction, TransactionState};
use crate::report::{self, summary_section, Rows, Section};
use crate::{Config, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Everything the ledger command reports for one branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchLedger {
    pub summary: LedgerSummary,
    pub sent_totals: DirectionTotals,
    pub received_totals: DirectionTotals,
    pub sent: Vec<Transaction>,
    pub received: Vec<Transaction>,
    pub statement: Vec<StatementRow>,
}

/// Computes the ledger of `args.branch()`.
///
/// The branch list and the branch's transactions are fetched concurrently. A divergence between
/// the computed balance and the API's pre-aggregated balance is logged and reported, never
/// reconciled.
pub async fn ledger(config: Config, mode: Mode, args: LedgerArgs) -> Result<Out<Rows>> {
    let client = api(&config, mode).await.pub_result(ErrorType::Request)?;
    let branch_id = args.branch();
    let (branch, records) =
        tokio::try_join!(client.branch(branch_id), client.transactions(branch_id))
            .pub_result(ErrorType::Request)?;
    debug!("Fetched {} transactions for branch '{branch_id}'", records.len());

    let mut transactions = decode_all(&records, &config.codec());
    if args.approved_only() {
        transactions.retain(|t| t.state() != TransactionState::Pending);
    }
    let order = if args.newest_first() {
        Order::NewestFirst
    } else {
        Order::AsGiven
    };

    let split = partition_by_direction(&transactions, branch_id, order);
    let sent_totals = totals_for_direction(split.sent.iter().copied(), Direction::Sent);
    let received_totals =
        totals_for_direction(split.received.iter().copied(), Direction::Received);
    let summary = branch_ledger(&branch, &sent_totals, &received_totals);
    if let Some(difference) = summary.divergence() {
        warn!(
            "The computed balance of branch '{}' differs from the API's by {difference}",
            branch.id()
        );
    }

    let document = BranchLedger {
        statement: statement(&branch, &transactions),
        sent: split.sent.into_iter().cloned().collect(),
        received: split.received.into_iter().cloned().collect(),
        summary,
        sent_totals,
        received_totals,
    };
    let sections = [
        summary_section(&document.summary),
        Section::new("Totals", &[document.sent_totals, document.received_totals]),
        Section::new("Statement", &document.statement),
    ];
    let rows =
        report::render(args.format(), &document, &sections).pub_result(ErrorType::Render)?;
    Ok(Out::new(
        format!(
            "Ledger of '{}' over {} transactions",
            branch.name(),
            transactions.len()
        ),
        rows,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::OutputFormat;
    use crate::test::TestEnv;
    use rust_decimal::Decimal;

    async fn document(args: LedgerArgs) -> BranchLedger {
        let env = TestEnv::new().await;
        let out = ledger(env.config(), Mode::Testing, args.with_format(OutputFormat::Json))
            .await
            .unwrap();
        match out.structure().unwrap() {
            Rows::Json(v) => serde_json::from_value(v.clone()).unwrap(),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ledger_surat() {
        let doc = document(LedgerArgs::new("b1")).await;
        assert_eq!(doc.sent_totals.count, 2);
        assert_eq!(doc.received_totals.count, 2);
        assert_eq!(doc.summary.balance_after_commission, Decimal::from(10_349));
        assert_eq!(doc.summary.divergence(), None);
        let last = doc.statement.last().unwrap();
        assert_eq!(last.balance, doc.summary.balance_after_commission);
    }

    #[tokio::test]
    async fn test_ledger_newest_first() {
        let doc = document(LedgerArgs::new("b1").with_newest_first(true)).await;
        let sent: Vec<&str> = doc.sent.iter().map(|t| t.id()).collect();
        assert_eq!(sent, vec!["t3", "t1"]);
        let received: Vec<&str> = doc.received.iter().map(|t| t.id()).collect();
        assert_eq!(received, vec!["t5", "t2"]);
    }

    #[tokio::test]
    async fn test_ledger_approved_only() {
        // t3 is pending, so Surat loses 1200 sent points and 12 commission.
        let doc = document(LedgerArgs::new("b1").with_approved_only(true)).await;
        assert_eq!(doc.sent_totals.count, 1);
        assert_eq!(doc.summary.gross_sent_points, Decimal::from(2_000));
        assert_eq!(doc.summary.balance_after_commission, Decimal::from(11_537));
    }

    #[tokio::test]
    async fn test_ledger_reports_divergence() {
        let doc = document(LedgerArgs::new("b3")).await;
        assert_eq!(doc.summary.divergence(), Some(Decimal::from(5)));
    }

    #[tokio::test]
    async fn test_ledger_table_shows_divergence() {
        let env = TestEnv::new().await;
        let out = ledger(env.config(), Mode::Testing, LedgerArgs::new("b3"))
            .await
            .unwrap();
        let text = out.structure().unwrap().to_string();
        assert!(text.contains("## Ledger: Rajkot (b3)"), "{text}");
        assert!(text.contains("Divergence"), "{text}");
        assert!(text.contains("## Statement"), "{text}");
    }

    #[tokio::test]
    async fn test_ledger_unknown_branch() {
        let env = TestEnv::new().await;
        let err = ledger(env.config(), Mode::Testing, LedgerArgs::new("nope"))
            .await
            .unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("request error"), "{message}");
        assert!(message.contains("Branch 'nope' not found"), "{message}");
    }
}
