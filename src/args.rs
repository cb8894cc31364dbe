//! These structs provide the CLI interface for the angadia CLI.

use crate::report::OutputFormat;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// angadia: ledger figures for an Angadia point-transfer network.
///
/// This program reads branch and transaction records from the network's REST API, decodes the
/// obfuscated fields, and prints per-branch ledgers, the head-office balance and the commission
/// footer.
///
/// Run `angadia init --api-url URL` first. Put the bearer token in $ANGADIA_HOME/.secrets/token
/// if the API requires one.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and the configuration file.
    ///
    /// The directory is $ANGADIA_HOME, by default ~/angadia. Pass --angadia-home to put it
    /// somewhere else.
    Init(InitArgs),
    /// List every branch with its pre-aggregated figures.
    Branches(FormatArgs),
    /// Print one branch's ledger: the sent/received split, totals, balances and a statement.
    Ledger(LedgerArgs),
    /// Print the head-office balance across all branches.
    HoBalance(FormatArgs),
    /// Print today's commission per branch and the footer totals.
    Commission(FormatArgs),
    /// Decode an obfuscated value using the configured codec.
    Decode(CodecArgs),
    /// Encode a plain value using the configured codec.
    Encode(CodecArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where configuration and secrets are held. Defaults to ~/angadia
    #[arg(long, env = "ANGADIA_HOME", default_value_t = default_angadia_home())]
    angadia_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, angadia_home: PathBuf) -> Self {
        Self {
            log_level,
            angadia_home: angadia_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn angadia_home(&self) -> &DisplayPath {
        &self.angadia_home
    }
}

/// (Not shown): Args for the `angadia init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base URL of the REST API, e.g. https://api.example.com/api/
    #[arg(long)]
    api_url: String,
}

impl InitArgs {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

/// (Not shown): Args for commands that only choose an output format.
#[derive(Debug, Default, Parser, Clone)]
pub struct FormatArgs {
    /// The output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl FormatArgs {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// (Not shown): Args for the `angadia ledger` command.
#[derive(Debug, Parser, Clone)]
pub struct LedgerArgs {
    /// The id of the branch.
    #[arg(long)]
    branch: String,

    /// List the newest transactions first instead of the order the API returns them in.
    #[arg(long)]
    newest_first: bool,

    /// Only count transactions an admin has approved.
    #[arg(long)]
    approved_only: bool,

    /// The output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl LedgerArgs {
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            newest_first: false,
            approved_only: false,
            format: OutputFormat::default(),
        }
    }

    pub fn with_newest_first(mut self, value: bool) -> Self {
        self.newest_first = value;
        self
    }

    pub fn with_approved_only(mut self, value: bool) -> Self {
        self.approved_only = value;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn newest_first(&self) -> bool {
        self.newest_first
    }

    pub fn approved_only(&self) -> bool {
        self.approved_only
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// What kind of field a value belongs to.
#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Points and mobile numbers.
    #[default]
    Number,
    /// Sender and receiver names.
    Text,
}

serde_plain::derive_display_from_serialize!(FieldKind);
serde_plain::derive_fromstr_from_deserialize!(FieldKind);

/// (Not shown): Args for the `angadia decode` and `angadia encode` commands.
#[derive(Debug, Parser, Clone)]
pub struct CodecArgs {
    /// The kind of field: "number" or "text"
    #[arg(value_enum)]
    kind: FieldKind,

    /// The value to transform.
    #[arg(allow_hyphen_values = true)]
    value: String,
}

impl CodecArgs {
    pub fn new(kind: FieldKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

fn default_angadia_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("angadia"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --angadia-home or ANGADIA_HOME instead of relying on the \
                default home directory.",
            );
            PathBuf::from("angadia")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ledger() {
        let args = Args::try_parse_from([
            "angadia",
            "--angadia-home",
            "/tmp/a",
            "ledger",
            "--branch",
            "b1",
            "--newest-first",
            "--format",
            "csv",
        ])
        .unwrap();
        assert_eq!(args.common().angadia_home().path(), Path::new("/tmp/a"));
        match args.command() {
            Command::Ledger(ledger) => {
                assert_eq!(ledger.branch(), "b1");
                assert!(ledger.newest_first());
                assert!(!ledger.approved_only());
                assert_eq!(ledger.format(), OutputFormat::Csv);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_decode_negative_number() {
        let args = Args::try_parse_from(["angadia", "encode", "number", "-150"]).unwrap();
        match args.command() {
            Command::Encode(codec) => {
                assert_eq!(codec.kind(), FieldKind::Number);
                assert_eq!(codec.value(), "-150");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_default_format_and_log_level() {
        let args = Args::try_parse_from(["angadia", "ho-balance"]).unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::INFO);
        match args.command() {
            Command::HoBalance(f) => assert_eq!(f.format(), OutputFormat::Table),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_init_requires_api_url() {
        assert!(Args::try_parse_from(["angadia", "init"]).is_err());
    }
}
