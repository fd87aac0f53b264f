use super::{EngineInputs, ui};
use crate::core::config::ProfitConfig;
use crate::core::grid::{SampleGrid, recent_window_grid};
use crate::core::valuation::{self, ProfitSplit};
use anyhow::Result;
use comfy_table::Cell;

pub struct HoldingProfit {
    pub label: String,
    pub split: ProfitSplit,
}

pub fn profit_splits(inputs: &EngineInputs, grid: &SampleGrid, include_fx_gain: bool) -> Vec<HoldingProfit> {
    valuation::profit_portfolio(&inputs.portfolio, grid, &inputs.fx, include_fx_gain)
        .into_iter()
        .map(|s| HoldingProfit {
            split: valuation::split_profit(&s.points),
            label: s.label,
        })
        .collect()
}

pub fn run(
    inputs: &EngineInputs,
    config: &ProfitConfig,
    window_days: Option<i64>,
    include_fx_gain: bool,
) -> Result<()> {
    let days = window_days.unwrap_or(config.window_days);
    let grid = recent_window_grid(inputs.now, days, config.floor, config.max_points)?;
    let profits = profit_splits(inputs, &grid, include_fx_gain);

    if profits.is_empty() {
        println!("No holdings found to calculate profit for.");
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    let mut header = vec![ui::header_cell("Date")];
    for p in &profits {
        header.push(ui::header_cell(&format!("{}+", p.label)));
        header.push(ui::header_cell(&format!("{}-", p.label)));
    }
    header.push(ui::header_cell("FX"));
    table.set_header(header);

    for (i, t) in grid.points().iter().enumerate() {
        let mut row = vec![Cell::new(ui::date_label(*t))];
        for p in &profits {
            row.push(ui::signed_cell(p.split.positive[i]));
            row.push(ui::signed_cell(p.split.negative[i]));
        }
        row.push(ui::format_optional_cell(
            inputs.fx.rate_on(t.date_naive()),
            |r| format!("{r:.2}"),
        ));
        table.add_row(row);
    }

    let fx_note = if include_fx_gain {
        "including FX gain"
    } else {
        "excluding FX gain"
    };
    println!(
        "{} {}\n",
        ui::style_text("Unrealized profit", ui::StyleType::Title),
        ui::style_text(&format!("({days} days, {fx_note})"), ui::StyleType::Subtle)
    );
    println!("{table}");
    Ok(())
}
