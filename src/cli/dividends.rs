use super::{EngineInputs, ui};
use crate::core::config::DividendConfig;
use crate::core::grid::{SampleGrid, build_periodic_grid};
use crate::core::series::Series;
use crate::core::valuation::{self, DividendMode};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

pub fn dividend_grid(config: &DividendConfig, now: DateTime<Utc>) -> Result<SampleGrid> {
    let epoch = config
        .epoch
        .and_hms_opt(0, 0, 0)
        .context("Invalid dividend epoch")?
        .and_utc();
    build_periodic_grid(epoch, config.step_months, now)
}

pub fn dividend_series(inputs: &EngineInputs, grid: &SampleGrid, mode: DividendMode) -> Vec<Series> {
    valuation::dividend_portfolio(&inputs.portfolio, grid, &inputs.fx, mode)
}

pub fn run(inputs: &EngineInputs, config: &DividendConfig, mode: Option<&str>) -> Result<()> {
    let mode: DividendMode = mode.unwrap_or(config.mode.as_str()).parse()?;
    let grid = dividend_grid(config, inputs.now)?;
    let series = dividend_series(inputs, &grid, mode);

    if series.is_empty() {
        println!("No holdings found to display dividends for.");
        return Ok(());
    }

    let table = match mode {
        DividendMode::Yield => {
            ui::series_table(grid.points(), &series, |v| format!("{:.3}%", v * 100.0))
        }
        _ => ui::series_table(grid.points(), &series, |v| format!("{v:.0}")),
    };
    println!(
        "{}\n",
        ui::style_text(&format!("Dividends ({mode})"), ui::StyleType::Title)
    );
    println!("{table}");
    Ok(())
}
