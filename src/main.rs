use anyhow::Result;
use assetline::core::log::init_logging;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display reconstructed account balances
    Balances {
        /// Path to the JSON record snapshot
        snapshot: String,
    },
    /// Display balances and holding market values
    Assets {
        /// Path to the JSON record snapshot
        snapshot: String,
    },
    /// Display unrealized profit split by sign
    Profit {
        /// Path to the JSON record snapshot
        snapshot: String,
        /// Length of the trailing window in days
        #[arg(short, long)]
        days: Option<i64>,
        /// Keep the cost basis at the acquisition exchange rate
        #[arg(long)]
        exclude_fx_gain: bool,
    },
    /// Display dividends per period boundary
    Dividends {
        /// Path to the JSON record snapshot
        snapshot: String,
        /// One of cumulative, per-period, yield
        #[arg(short, long)]
        mode: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config_path = cli.config_path.as_deref();
    let result = match cli.command {
        Some(Commands::Setup) => assetline::cli::setup::setup(),
        Some(Commands::Balances { snapshot }) => {
            assetline::run_command(assetline::AppCommand::Balances, &snapshot, config_path).await
        }
        Some(Commands::Assets { snapshot }) => {
            assetline::run_command(assetline::AppCommand::Assets, &snapshot, config_path).await
        }
        Some(Commands::Profit {
            snapshot,
            days,
            exclude_fx_gain,
        }) => {
            let command = assetline::AppCommand::Profit {
                window_days: days,
                exclude_fx_gain,
            };
            assetline::run_command(command, &snapshot, config_path).await
        }
        Some(Commands::Dividends { snapshot, mode }) => {
            assetline::run_command(assetline::AppCommand::Dividends { mode }, &snapshot, config_path)
                .await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
