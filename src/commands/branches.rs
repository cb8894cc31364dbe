use crate::api::{api, Mode};
use crate::args::FormatArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::report::{self, Rows, Section};
use crate::{Config, Result};

/// Lists every branch with the figures the API reports for it.
pub async fn branches(config: Config, mode: Mode, args: FormatArgs) -> Result<Out<Rows>> {
    let client = api(&config, mode).await.pub_result(ErrorType::Request)?;
    let branches = client.branches().await.pub_result(ErrorType::Request)?;
    let sections = [Section::new("Branches", &branches)];
    let rows =
        report::render(args.format(), &branches, &sections).pub_result(ErrorType::Render)?;
    Ok(Out::new(format!("Listed {} branches", branches.len()), rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::OutputFormat;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_branches_json() {
        let env = TestEnv::new().await;
        let out = branches(env.config(), Mode::Testing, FormatArgs::new(OutputFormat::Json))
            .await
            .unwrap();
        assert_eq!(out.message(), "Listed 4 branches");
        match out.structure().unwrap() {
            Rows::Json(v) => {
                let list = v.as_array().unwrap();
                assert_eq!(list.len(), 4);
                assert_eq!(list[0]["_id"], "b1");
                assert_eq!(list[3]["active"], false);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_branches_table() {
        let env = TestEnv::new().await;
        let out = branches(env.config(), Mode::Testing, FormatArgs::default())
            .await
            .unwrap();
        let text = out.structure().unwrap().to_string();
        assert!(text.contains("Surat"), "{text}");
        assert!(text.contains("10,300.00"), "{text}");
    }
}
