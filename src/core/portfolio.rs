//! Holdings grouped with their price and dividend histories.

use crate::core::records::{DividendPoint, Holding, PricePoint, Snapshot};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A dated value for a single instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatedValue {
    pub date: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, Default)]
pub struct StockPortfolio {
    holdings: Vec<Holding>,
    prices: HashMap<String, Vec<DatedValue>>,
    dividends: HashMap<String, Vec<DatedValue>>,
}

impl StockPortfolio {
    /// Groups prices and dividends by instrument code. Input order within
    /// each code is kept, so records must already be ascending by date.
    pub fn new(holdings: Vec<Holding>, prices: &[PricePoint], dividends: &[DividendPoint]) -> Self {
        let mut by_code: HashMap<String, Vec<DatedValue>> = HashMap::new();
        for p in prices {
            by_code.entry(p.code.clone()).or_default().push(DatedValue {
                date: p.date,
                value: p.price,
            });
        }

        let mut div_by_code: HashMap<String, Vec<DatedValue>> = HashMap::new();
        for d in dividends {
            div_by_code.entry(d.code.clone()).or_default().push(DatedValue {
                date: d.date,
                value: d.amount,
            });
        }

        Self {
            holdings,
            prices: by_code,
            dividends: div_by_code,
        }
    }

    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self::new(
            snapshot.holdings.clone(),
            &snapshot.prices,
            &snapshot.dividends,
        )
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    /// Holdings ordered by the start of their validity window.
    pub fn holdings_by_start(&self) -> Vec<&Holding> {
        let mut sorted: Vec<&Holding> = self.holdings.iter().collect();
        sorted.sort_by_key(|h| h.start);
        sorted
    }

    pub fn prices_for(&self, code: &str) -> &[DatedValue] {
        self.prices.get(code).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn dividends_for(&self, code: &str) -> &[DatedValue] {
        self.dividends.get(code).map(Vec::as_slice).unwrap_or_default()
    }
}
