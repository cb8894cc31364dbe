use crate::api::{api, Mode};
use crate::args::FormatArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::ledger::HoReport;
use crate::report::{self, Rows, Section};
use crate::{Config, Result};
use tracing::warn;

/// Computes the head-office balance over every branch.
pub async fn ho_balance(config: Config, mode: Mode, args: FormatArgs) -> Result<Out<Rows>> {
    let client = api(&config, mode).await.pub_result(ErrorType::Request)?;
    let branches = client.branches().await.pub_result(ErrorType::Request)?;
    let report = HoReport::new(&branches);
    if !report.identity_holds() {
        warn!("The head-office balance does not match its partitions");
    }

    let sections = [
        Section::new("Positive balances", &report.positive.rows),
        Section::new("Negative balances", &report.negative.rows),
        Section::figures(
            "Head office",
            &[
                ("Positive total", report.positive.total),
                ("Negative total", report.negative.total),
                ("HO balance", report.ho_balance),
            ],
        ),
    ];
    let rows = report::render(args.format(), &report, &sections).pub_result(ErrorType::Render)?;
    Ok(Out::new(
        format!("HO balance over {} branches", branches.len()),
        rows,
    ))
}
