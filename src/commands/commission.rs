use crate::api::{api, Mode};
use crate::args::FormatArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::ledger::branch_commission_footer;
use crate::report::{self, Rows, Section};
use crate::{Config, Result};
use rust_decimal::Decimal;

/// Lists the branches that earned commission today and the footer totals.
pub async fn commission(config: Config, mode: Mode, args: FormatArgs) -> Result<Out<Rows>> {
    let client = api(&config, mode).await.pub_result(ErrorType::Request)?;
    let branches = client.branches().await.pub_result(ErrorType::Request)?;
    let footer = branch_commission_footer(&branches);

    let sections = [
        Section::new("Today's commission", &footer.branches),
        Section::figures(
            "Footer",
            &[
                ("Branches", Decimal::from(footer.total_branches)),
                ("Total commission", footer.total_today_commission),
            ],
        ),
    ];
    let rows = report::render(args.format(), &footer, &sections).pub_result(ErrorType::Render)?;
    Ok(Out::new(
        format!(
            "{} of {} branches earned commission today",
            footer.total_branches,
            branches.len()
        ),
        rows,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::CommissionFooter;
    use crate::report::OutputFormat;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_commission() {
        let env = TestEnv::new().await;
        let out = commission(env.config(), Mode::Testing, FormatArgs::new(OutputFormat::Json))
            .await
            .unwrap();
        assert_eq!(out.message(), "2 of 4 branches earned commission today");
        let footer: CommissionFooter = match out.structure().unwrap() {
            Rows::Json(v) => serde_json::from_value(v.clone()).unwrap(),
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(footer.total_today_commission, Decimal::from(46));
        let ids: Vec<&str> = footer.branches.iter().map(|r| r.branch_id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b2"]);
    }
}
