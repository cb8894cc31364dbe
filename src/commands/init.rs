use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory, its `.secrets` subdirectory and an initial `config.json` that
/// points at `api_url`.
///
/// # Arguments
/// - `angadia_home` - The directory that will be the root of data directory, e.g. `$HOME/angadia`
/// - `api_url` - The base URL of the REST API, e.g. `https://api.example.com/api/`
///
/// # Errors
/// - Returns an error if `api_url` is not a usable base URL.
/// - Returns an error if any file operations fail.
pub async fn init(angadia_home: &Path, api_url: &str) -> Result<Out<()>> {
    let config = Config::create(angadia_home, api_url)
        .await
        .context("Unable to create the data directory and configs")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the angadia directory at {}. Put the API token in {} if one is \
        required.",
        config.root().display(),
        config.token_path().display()
    )
    .into())
}
