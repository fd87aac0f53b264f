//! Command handlers and terminal output

pub mod assets;
pub mod dividends;
pub mod profit;
pub mod setup;
pub mod ui;

use crate::core::config::{AppConfig, FxConfig};
use crate::core::currency::{CurrencyRateProvider, FixedRateProvider};
use crate::core::{FxRateTable, Snapshot, StockPortfolio};
use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Everything a command needs for one engine run.
pub struct EngineInputs {
    pub snapshot: Snapshot,
    pub portfolio: StockPortfolio,
    pub fx: FxRateTable,
    pub now: DateTime<Utc>,
}

/// Loads the snapshot and builds the indexed views over it.
pub async fn load_inputs(
    snapshot_path: &str,
    config: &AppConfig,
    now: DateTime<Utc>,
) -> Result<EngineInputs> {
    let snapshot = Snapshot::load_from_path(snapshot_path)?.resolve_foreign(&config.fx.domestic_suffix);
    let today = now.date_naive();

    let mut fx = FxRateTable::build(&snapshot.fx_rates, today);
    if let Some(rate) = config.fx.live_rate {
        let provider = FixedRateProvider::new(&config.fx.foreign_currency, &config.fx.home_currency, rate);
        apply_live_rate(&mut fx, &provider, &config.fx, now).await;
    }

    let portfolio = StockPortfolio::from_snapshot(&snapshot);
    debug!(holdings = portfolio.holdings().len(), fx_days = fx.len(), "Prepared engine inputs");

    Ok(EngineInputs {
        snapshot,
        portfolio,
        fx,
        now,
    })
}

/// Overrides the carried-forward tail of `fx` with the provider's current
/// rate. A failing provider leaves the table as it is.
pub async fn apply_live_rate(
    fx: &mut FxRateTable,
    provider: &(dyn CurrencyRateProvider + Send + Sync),
    config: &FxConfig,
    now: DateTime<Utc>,
) {
    match provider
        .get_rate(&config.foreign_currency, &config.home_currency)
        .await
    {
        Ok(rate) => {
            let replaced = fx.apply_live_rate(rate, now.date_naive());
            info!(
                "Applied live {}/{} rate {rate} to {replaced} day(s)",
                config.foreign_currency, config.home_currency
            );
        }
        Err(e) => {
            warn!("Live rate unavailable, keeping carried-forward rates: {e}");
        }
    }
}
