//! Implements the `Api` trait with `reqwest` against the configured REST API.

use crate::api::{Api, Envelope, BRANCHES, TRANSACTIONS};
use crate::model::{Branch, TransactionRecord};
use crate::{utils, Config, Result};
use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

const TIMEOUT: Duration = Duration::from_secs(30);

pub(super) struct HttpApi {
    client: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl HttpApi {
    pub(super) async fn new(config: &Config) -> Result<Self> {
        let token = read_token(&config.token_path()).await?;
        if token.is_none() {
            debug!(
                "No token found at {}, requests will be unauthenticated",
                config.token_path().display()
            );
        }
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(TIMEOUT)
            .build()
            .context("Unable to create the HTTP client")?;
        Ok(Self {
            client,
            base: config.api_url().clone(),
            token,
        })
    }

    async fn get_list<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let url = self
            .base
            .join(path)
            .with_context(|| format!("Unable to build a URL for '{path}'"))?;
        trace!("GET {url} {query:?}");
        let mut request = self.client.get(url.clone()).query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?;
        let status = response.status();
        if !status.is_success() {
            bail!("Request to {url} returned {status}");
        }
        let envelope: Envelope<T> = response
            .json()
            .await
            .with_context(|| format!("Unable to parse the response from {url}"))?;
        let items = envelope.into_inner();
        trace!("Received {} items from {url}", items.len());
        Ok(items)
    }
}

#[async_trait::async_trait]
impl Api for HttpApi {
    async fn branches(&self) -> Result<Vec<Branch>> {
        self.get_list(BRANCHES, &[]).await
    }

    async fn transactions(&self, branch_id: &str) -> Result<Vec<TransactionRecord>> {
        self.get_list(TRANSACTIONS, &[("branch", branch_id)]).await
    }
}

/// Reads the bearer token, if the token file exists.
async fn read_token(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    let token = utils::read(path).await?.trim().to_string();
    Ok(if token.is_empty() { None } else { Some(token) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_token() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token");
        assert_eq!(read_token(&path).await.unwrap(), None);

        utils::write(&path, "  abc123\n").await.unwrap();
        assert_eq!(read_token(&path).await.unwrap().as_deref(), Some("abc123"));

        utils::write(&path, "\n").await.unwrap();
        assert_eq!(read_token(&path).await.unwrap(), None);
    }
}
