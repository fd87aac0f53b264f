//! Market value, profit and dividend series for stock holdings.
use crate::core::fx::FxRateTable;
use crate::core::grid::SampleGrid;
use crate::core::portfolio::{DatedValue, StockPortfolio};
use crate::core::records::Holding;
use crate::core::series::{Series, SeriesPoint};
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

/// Ascending cursor over a dated history.
///
/// `advance_to(t)` must be called with non-decreasing `t`; it returns the
/// latest value dated at or before `t`.
struct ForwardFill<'a> {
    history: &'a [DatedValue],
    next: usize,
}

impl<'a> ForwardFill<'a> {
    fn new(history: &'a [DatedValue]) -> Self {
        Self { history, next: 0 }
    }

    fn advance_to(&mut self, t: DateTime<Utc>) -> Option<f64> {
        while self.next < self.history.len() && self.history[self.next].date <= t {
            self.next += 1;
        }
        self.next
            .checked_sub(1)
            .map(|i| self.history[i].value)
    }
}

/// Value of the holding at each grid point, converted to the home currency.
pub fn market_value(
    holding: &Holding,
    prices: &[DatedValue],
    grid: &SampleGrid,
    fx: &FxRateTable,
) -> Vec<SeriesPoint> {
    let mut cursor = ForwardFill::new(prices);
    grid.points()
        .iter()
        .map(|&t| {
            let price = cursor.advance_to(t);
            if !holding.contains(t) {
                return SeriesPoint::Absent;
            }
            let rate = fx.rate_for(holding.foreign(), t);
            SeriesPoint::from(price.zip(rate).map(|(p, r)| holding.quantity * p * r))
        })
        .collect()
}

/// Unrealized profit of the holding at each grid point.
///
/// With `include_fx_gain` the cost basis is re-expressed at the rate of the
/// grid point, so currency movement since acquisition shows up as profit.
/// Without it the cost basis stays at the acquisition price.
pub fn profit(
    holding: &Holding,
    prices: &[DatedValue],
    grid: &SampleGrid,
    fx: &FxRateTable,
    include_fx_gain: bool,
) -> Vec<SeriesPoint> {
    let mut cursor = ForwardFill::new(prices);
    grid.points()
        .iter()
        .map(|&t| {
            let price = cursor.advance_to(t);
            if !holding.contains(t) {
                return SeriesPoint::Absent;
            }
            let value = price.zip(fx.rate_for(holding.foreign(), t)).map(|(p, rate)| {
                let base_price = if include_fx_gain {
                    holding.acquisition_price * (holding.acquisition_fx_rate / rate)
                } else {
                    holding.acquisition_price
                };
                holding.quantity * rate * (p - base_price)
            });
            SeriesPoint::from(value)
        })
        .collect()
}

/// Profit split into a positive part (values above zero) and a negative
/// part (values at or below zero) for stacked display.
///
/// Both parts are aligned with the profit series; `positive[i] + negative[i]`
/// equals the profit wherever it is present.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfitSplit {
    pub positive: Vec<SeriesPoint>,
    pub negative: Vec<SeriesPoint>,
}

/// Splits a profit series by sign.
///
/// Where the sign changes between two adjacent points, the part that stops
/// (or starts) having a value gets an explicit zero at the neighbouring
/// index, so neither part is interpolated across the crossing.
pub fn split_profit(profit: &[SeriesPoint]) -> ProfitSplit {
    let mut positive = Vec::with_capacity(profit.len());
    let mut negative = Vec::with_capacity(profit.len());
    for point in profit {
        match point {
            SeriesPoint::Present(p) if *p > 0.0 => {
                positive.push(SeriesPoint::Present(*p));
                negative.push(SeriesPoint::Absent);
            }
            SeriesPoint::Present(p) => {
                positive.push(SeriesPoint::Absent);
                negative.push(SeriesPoint::Present(*p));
            }
            SeriesPoint::Absent => {
                positive.push(SeriesPoint::Absent);
                negative.push(SeriesPoint::Absent);
            }
        }
    }

    for i in 1..profit.len() {
        if !(profit[i - 1].is_present() && profit[i].is_present()) {
            continue;
        }
        for part in [&mut positive, &mut negative] {
            let before = part[i - 1].is_nonzero();
            let after = part[i].is_nonzero();
            if before && !after {
                part[i] = SeriesPoint::Present(0.0);
            } else if !before && after {
                part[i - 1] = SeriesPoint::Present(0.0);
            }
        }
    }

    ProfitSplit { positive, negative }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DividendMode {
    /// Running total received up to each boundary.
    Cumulative,
    /// Received within the period ending at each boundary.
    PerPeriod,
    /// Period amount over price, doubled to annualize a half-year.
    Yield,
}

impl Display for DividendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DividendMode::Cumulative => "cumulative",
                DividendMode::PerPeriod => "per-period",
                DividendMode::Yield => "yield",
            }
        )
    }
}

impl FromStr for DividendMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cumulative" | "sum" => Ok(DividendMode::Cumulative),
            "per-period" | "per_period" | "half" => Ok(DividendMode::PerPeriod),
            "yield" | "rate" => Ok(DividendMode::Yield),
            _ => Err(anyhow!("Invalid dividend mode: {}", s)),
        }
    }
}

/// Dividend series on period boundaries.
///
/// A dividend dated `d` belongs to the first boundary strictly after `d`;
/// the first boundary collects everything before it. Amounts are per share.
/// A holding without any dividend records gets an all-`Absent` series.
/// The yield mode doubles the period figure, a linear approximation that
/// assumes half-year periods.
pub fn dividends(
    holding: &Holding,
    prices: &[DatedValue],
    dividends: &[DatedValue],
    boundaries: &SampleGrid,
    fx: &FxRateTable,
    mode: DividendMode,
) -> Vec<SeriesPoint> {
    if dividends.is_empty() {
        return vec![SeriesPoint::Absent; boundaries.len()];
    }
    let mut price_cursor = ForwardFill::new(prices);
    let mut k = 0;
    let mut total = 0.0;

    boundaries
        .points()
        .iter()
        .map(|&x| {
            let mut period = 0.0;
            while k < dividends.len() && dividends[k].date < x {
                period += dividends[k].value;
                k += 1;
            }
            total += period;
            let price = price_cursor.advance_to(x);

            if !holding.contains(x) {
                return SeriesPoint::Absent;
            }
            let value = match mode {
                DividendMode::Cumulative => fx
                    .rate_for(holding.foreign(), x)
                    .map(|rate| holding.quantity * total * rate),
                DividendMode::PerPeriod => fx
                    .rate_for(holding.foreign(), x)
                    .map(|rate| holding.quantity * period * rate),
                DividendMode::Yield => price.filter(|p| *p != 0.0).map(|p| period / p * 2.0),
            };
            SeriesPoint::from(value)
        })
        .collect()
}

/// Market value series for every holding, labelled and ordered by start.
pub fn value_portfolio(model: &StockPortfolio, grid: &SampleGrid, fx: &FxRateTable) -> Vec<Series> {
    model
        .holdings_by_start()
        .into_iter()
        .map(|h| {
            let prices = model.prices_for(&h.code);
            if prices.is_empty() {
                debug!(code = %h.code, "No prices recorded, market value is absent");
            }
            Series::new(&h.label, market_value(h, prices, grid, fx))
        })
        .collect()
}

/// Profit series for every holding, labelled and ordered by start.
pub fn profit_portfolio(
    model: &StockPortfolio,
    grid: &SampleGrid,
    fx: &FxRateTable,
    include_fx_gain: bool,
) -> Vec<Series> {
    model
        .holdings_by_start()
        .into_iter()
        .map(|h| {
            let points = profit(h, model.prices_for(&h.code), grid, fx, include_fx_gain);
            Series::new(&h.label, points)
        })
        .collect()
}

/// Dividend series for every holding, labelled and ordered by start.
pub fn dividend_portfolio(
    model: &StockPortfolio,
    boundaries: &SampleGrid,
    fx: &FxRateTable,
    mode: DividendMode,
) -> Vec<Series> {
    model
        .holdings_by_start()
        .into_iter()
        .map(|h| {
            let points = dividends(
                h,
                model.prices_for(&h.code),
                model.dividends_for(&h.code),
                boundaries,
                fx,
                mode,
            );
            Series::new(&h.label, points)
        })
        .collect()
}
