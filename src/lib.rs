pub mod cli;
pub mod core;

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info};

pub enum AppCommand {
    Balances,
    Assets,
    Profit {
        window_days: Option<i64>,
        exclude_fx_gain: bool,
    },
    Dividends {
        mode: Option<String>,
    },
}

/// Runs `command` on the records in `snapshot_path`.
///
/// Every call loads the snapshot afresh and recomputes all series, so it can
/// simply be invoked again whenever the underlying records change.
pub async fn run_command(
    command: AppCommand,
    snapshot_path: &str,
    config_path: Option<&str>,
) -> Result<()> {
    info!("assetline starting...");

    let config = crate::core::config::AppConfig::load_or_default(config_path)?;
    debug!("Loaded config: {config:#?}");

    let inputs = cli::load_inputs(snapshot_path, &config, Utc::now()).await?;

    match command {
        AppCommand::Balances => cli::assets::run_balances(&inputs, &config.grid),
        AppCommand::Assets => cli::assets::run_assets(&inputs, &config.grid),
        AppCommand::Profit {
            window_days,
            exclude_fx_gain,
        } => {
            let include_fx_gain = config.profit.include_fx_gain && !exclude_fx_gain;
            cli::profit::run(&inputs, &config.profit, window_days, include_fx_gain)
        }
        AppCommand::Dividends { mode } => {
            cli::dividends::run(&inputs, &config.dividends, mode.as_deref())
        }
    }
}
