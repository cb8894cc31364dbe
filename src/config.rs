//! Configuration file handling.
//!
//! The configuration file is stored at `$ANGADIA_HOME/config.json` and contains the URL of the
//! REST API, the location of the bearer token, and the constants the field codec needs.

use crate::codec::Codec;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const APP_NAME: &str = "angadia";
const CONFIG_VERSION: u8 = 1;
const SECRETS: &str = ".secrets";
const TOKEN: &str = "token";
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$ANGADIA_HOME` and from there it loads `$ANGADIA_HOME/config.json`. It provides
/// paths to other items that are either configurable or are expected in a certain location within
/// the home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    secrets: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    api_url: Url,
}

impl Config {
    /// Creates the home directory, its `.secrets` subdirectory and an initial `config.json` that
    /// points at `api_url` with default settings.
    ///
    /// # Errors
    /// - Returns an error if `api_url` is not a valid URL.
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>, api_url: &str) -> Result<Self> {
        let api_url = parse_api_url(api_url)?;

        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the angadia home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let secrets = root.join(SECRETS);
        utils::make_dir(&secrets).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            api_url: api_url.to_string(),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            secrets,
            config_path,
            config_file,
            api_url,
        })
    }

    /// This will
    /// - validate that the home directory exists and that the config file exists
    /// - load and validate the config file
    /// - return the loaded configuration object
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The angadia home directory is missing, run 'angadia init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;
        let api_url = parse_api_url(&config_file.api_url)
            .with_context(|| format!("Invalid api_url in {}", config_path.display()))?;

        Ok(Self {
            secrets: root.join(SECRETS),
            root,
            config_path,
            config_file,
            api_url,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn secrets(&self) -> &Path {
        &self.secrets
    }

    /// The API base URL. Always ends with `/` so that endpoint paths can be joined onto it.
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// The codec built from the configured constants, or the defaults.
    pub fn codec(&self) -> Codec {
        self.config_file.codec.clone().unwrap_or_default()
    }

    /// Returns the stored `token_path` if it is absolute, otherwise resolves the relative path.
    pub fn token_path(&self) -> PathBuf {
        let p = self.config_file.token_path();
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "angadia",
///   "config_version": 1,
///   "api_url": "https://api.example.com/api/",
///   "token_path": ".secrets/token",
///   "codec": {
///     "secret_marker": "KeonExpr07th78",
///     "offset": 112407
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "angadia"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Base URL of the REST API
    api_url: String,

    /// Path to the bearer token file (optional, relative to the home directory or absolute)
    /// Defaults to $ANGADIA_HOME/.secrets/token if not specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token_path: Option<PathBuf>,

    /// Codec constants (optional). Defaults to the deployment-wide constants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    codec: Option<Codec>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            api_url: String::new(),
            token_path: None,
            codec: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it fails validation.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version == CONFIG_VERSION,
            "Unsupported config_version {} in config file, expected {}",
            config.config_version,
            CONFIG_VERSION
        );
        if let Some(codec) = &config.codec {
            anyhow::ensure!(
                !codec.secret_marker().is_empty(),
                "The codec secret_marker in the config file must not be empty"
            );
        }

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    /// Gets the token path.
    ///
    /// If the path is relative, it should be interpreted as relative to the home directory.
    /// If None, defaults to $ANGADIA_HOME/.secrets/token
    fn token_path(&self) -> PathBuf {
        self.token_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(SECRETS).join(TOKEN))
    }
}

/// Parses the API base URL and makes sure it ends with `/`.
fn parse_api_url(s: &str) -> Result<Url> {
    let mut url = Url::parse(s.trim()).with_context(|| format!("Invalid API URL '{s}'"))?;
    if url.cannot_be_a_base() {
        bail!("The API URL '{s}' cannot be used as a base URL");
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create_and_load() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("angadia_home");

        let created = Config::create(&home, "https://api.example.com/api")
            .await
            .unwrap();
        assert_eq!(created.api_url().as_str(), "https://api.example.com/api/");
        assert!(created.secrets().is_dir());
        assert!(created.config_path().is_file());

        let loaded = Config::load(&home).await.unwrap();
        assert_eq!(loaded.api_url(), created.api_url());
        assert_eq!(loaded.codec(), Codec::default());
        assert_eq!(loaded.token_path(), loaded.root().join(".secrets").join("token"));
    }

    #[tokio::test]
    async fn test_config_create_rejects_bad_url() {
        let dir = TempDir::new().unwrap();
        assert!(Config::create(dir.path(), "not a url").await.is_err());
        assert!(Config::create(dir.path(), "mailto:ops@example.com")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(dir.path().join("nope")).await.unwrap_err();
        assert!(err.to_string().contains("angadia init"));
    }

    #[tokio::test]
    async fn test_config_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("config file is missing"));
    }

    #[tokio::test]
    async fn test_config_file_with_codec_and_absolute_token() {
        let dir = TempDir::new().unwrap();
        let token = dir.path().join("elsewhere").join("token");
        let json = serde_json::json!({
            "app_name": "angadia",
            "config_version": 1,
            "api_url": "http://localhost:8080",
            "token_path": token,
            "codec": { "secret_marker": "abc", "offset": 10 }
        });
        utils::write(dir.path().join(CONFIG_JSON), json.to_string())
            .await
            .unwrap();

        let config = Config::load(dir.path()).await.unwrap();
        assert_eq!(config.api_url().as_str(), "http://localhost:8080/");
        assert_eq!(config.codec(), Codec::new("abc", 10));
        assert_eq!(config.token_path(), token);
    }

    #[tokio::test]
    async fn test_config_file_invalid_app_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        let json = r#"{
            "app_name": "wrong_app",
            "config_version": 1,
            "api_url": "https://api.example.com/"
        }"#;
        utils::write(&path, json).await.unwrap();

        let result = ConfigFile::load(&path).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_empty_secret_marker() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        let json = r#"{
            "app_name": "angadia",
            "config_version": 1,
            "api_url": "https://api.example.com/",
            "codec": { "secret_marker": "" }
        }"#;
        utils::write(&path, json).await.unwrap();
        assert!(ConfigFile::load(&path).await.is_err());
    }

    #[test]
    fn test_config_file_serialization_omits_none_fields() {
        let config = ConfigFile::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("token_path"));
        assert!(!json.contains("codec"));
    }

    #[test]
    fn test_parse_api_url() {
        assert_eq!(
            parse_api_url("https://x.example.com/v1/").unwrap().as_str(),
            "https://x.example.com/v1/"
        );
        assert_eq!(
            parse_api_url(" https://x.example.com/v1 ").unwrap().as_str(),
            "https://x.example.com/v1/"
        );
        assert!(parse_api_url("").is_err());
    }
}
