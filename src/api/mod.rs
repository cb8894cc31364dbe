//! The boundary with the remote REST API that serves branch and transaction records.

mod http_api;
mod test_api;

use crate::model::{Branch, TransactionRecord};
use crate::{Config, Result};
use anyhow::Context;
use serde::Deserialize;

pub(crate) use test_api::TestApi;

/// Path of the branch list, relative to the configured API URL.
pub(crate) const BRANCHES: &str = "branch";

/// Path of the transaction list, relative to the configured API URL.
pub(crate) const TRANSACTIONS: &str = "transaction";

/// When this environment variable is set and non-empty, the in-memory API is used.
pub const TEST_MODE_ENV: &str = "ANGADIA_IN_TEST_MODE";

/// Selects the `Api` implementation.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    /// Talk to the configured REST API.
    Http,
    /// Serve seeded records from memory.
    Testing,
}

impl Mode {
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Testing,
            _ => Mode::Http,
        }
    }
}

/// The records this crate reads from the API. Implementations only fetch; they never decode or
/// aggregate.
#[async_trait::async_trait]
pub trait Api: Send + Sync {
    /// Every branch.
    async fn branches(&self) -> Result<Vec<Branch>>;

    /// Every transaction in which `branch_id` is the sender or the receiver, still encoded.
    async fn transactions(&self, branch_id: &str) -> Result<Vec<TransactionRecord>>;

    /// The branch with `id`.
    async fn branch(&self, id: &str) -> Result<Branch> {
        self.branches()
            .await?
            .into_iter()
            .find(|b| b.id() == id)
            .with_context(|| format!("Branch '{id}' not found"))
    }
}

/// Creates the `Api` implementation for `mode`.
pub async fn api(config: &Config, mode: Mode) -> Result<Box<dyn Api>> {
    Ok(match mode {
        Mode::Http => Box::new(http_api::HttpApi::new(config).await?),
        Mode::Testing => Box::new(TestApi::new(config.codec())?),
    })
}

/// List responses come either bare or wrapped as `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> Envelope<T> {
    fn into_inner(self) -> Vec<T> {
        match self {
            Envelope::Bare(items) => items,
            Envelope::Wrapped { data } => data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_bare_and_wrapped() {
        let bare: Envelope<Branch> = serde_json::from_str(r#"[{"_id": "b1"}]"#).unwrap();
        assert_eq!(bare.into_inner()[0].id(), "b1");

        let wrapped: Envelope<Branch> =
            serde_json::from_str(r#"{"success": true, "data": [{"_id": "b2"}, {"_id": "b3"}]}"#)
                .unwrap();
        let branches = wrapped.into_inner();
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[1].id(), "b3");
    }

    #[tokio::test]
    async fn test_branch_lookup() {
        let api = TestApi::new(Default::default()).unwrap();
        assert_eq!(api.branch("b2").await.unwrap().name(), "Mumbai");
        let err = api.branch("nope").await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
