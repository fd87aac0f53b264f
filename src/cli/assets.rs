use super::{EngineInputs, ui};
use crate::core::config::GridConfig;
use crate::core::grid::{SampleGrid, build_grid};
use crate::core::series::{Series, SeriesPoint};
use crate::core::{balance, valuation};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

/// The asset chart grid, from the configured start day up to now.
pub fn asset_grid(config: &GridConfig, now: DateTime<Utc>) -> Result<SampleGrid> {
    let xmin = config
        .start
        .and_hms_opt(0, 0, 0)
        .context("Invalid grid start")?
        .and_utc();
    build_grid(xmin, now, config.points)
}

pub fn balance_series(inputs: &EngineInputs, grid: &SampleGrid) -> Vec<Series> {
    balance::generate_all(&inputs.snapshot.all_anchors(), &inputs.snapshot.transactions, grid)
        .into_values()
        .collect()
}

/// Holding values followed by account balances, with a trailing total
/// over every present value.
pub fn asset_series(inputs: &EngineInputs, grid: &SampleGrid) -> Vec<Series> {
    let mut series = valuation::value_portfolio(&inputs.portfolio, grid, &inputs.fx);
    series.extend(balance_series(inputs, grid));

    let total = (0..grid.len())
        .map(|i| {
            let sum: f64 = series
                .iter()
                .filter_map(|s| s.points.get(i).and_then(SeriesPoint::value))
                .sum();
            SeriesPoint::Present(sum)
        })
        .collect();
    series.push(Series::new("Total", total));
    series
}

pub fn run_balances(inputs: &EngineInputs, config: &GridConfig) -> Result<()> {
    let grid = asset_grid(config, inputs.now)?;
    let series = balance_series(inputs, &grid);
    if series.is_empty() {
        println!("No anchored accounts found to display balances for.");
        return Ok(());
    }

    println!("{}\n", ui::style_text("Account balances", ui::StyleType::Title));
    println!("{}", ui::series_table(grid.points(), &series, |v| format!("{v:.0}")));
    Ok(())
}

pub fn run_assets(inputs: &EngineInputs, config: &GridConfig) -> Result<()> {
    let grid = asset_grid(config, inputs.now)?;
    let series = asset_series(inputs, &grid);

    println!("{}\n", ui::style_text("Assets", ui::StyleType::Title));
    println!("{}", ui::series_table(grid.points(), &series, |v| format!("{v:.0}")));
    Ok(())
}
