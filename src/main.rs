use angadia_ledger::args::{Args, Command};
use angadia_ledger::{commands, Config, Mode, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().angadia_home().path();

    // When ANGADIA_IN_TEST_MODE is set and non-empty the seeded in-memory API is used instead of
    // the configured REST API.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.api_url()).await?.print(),

        Command::Branches(format_args) => {
            let config = Config::load(home).await?;
            commands::branches(config, mode, format_args.clone())
                .await?
                .print_report()
        }

        Command::Ledger(ledger_args) => {
            let config = Config::load(home).await?;
            commands::ledger(config, mode, ledger_args.clone())
                .await?
                .print_report()
        }

        Command::HoBalance(format_args) => {
            let config = Config::load(home).await?;
            commands::ho_balance(config, mode, format_args.clone())
                .await?
                .print_report()
        }

        Command::Commission(format_args) => {
            let config = Config::load(home).await?;
            commands::commission(config, mode, format_args.clone())
                .await?
                .print_report()
        }

        Command::Decode(codec_args) => {
            let config = Config::load(home).await?;
            commands::decode(&config, codec_args)?.print_report()
        }

        Command::Encode(codec_args) => {
            let config = Config::load(home).await?;
            commands::encode(&config, codec_args)?.print_report()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        // Without RUST_LOG only this crate logs, at the requested level.
        None => EnvFilter::new(format!(
            "{}={},{}={}",
            env!("CARGO_CRATE_NAME"),
            level,
            "angadia_ledger",
            level
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
