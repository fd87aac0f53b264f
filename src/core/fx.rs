//! Day-indexed exchange rates with trailing gap-fill and live override.

use crate::core::records::FxRatePoint;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
enum DayRate {
    Recorded(f64),
    /// Copied forward from the last recorded day to cover missing recent days.
    CarriedForward(f64),
}

impl DayRate {
    fn rate(&self) -> f64 {
        match self {
            DayRate::Recorded(r) | DayRate::CarriedForward(r) => *r,
        }
    }
}

/// Exchange rate per calendar day, foreign currency to home currency.
#[derive(Debug, Clone, Default)]
pub struct FxRateTable {
    rates: BTreeMap<NaiveDate, DayRate>,
}

impl FxRateTable {
    /// Indexes `points` by day and fills the gap between the latest recorded
    /// day and `today` with that day's rate.
    pub fn build(points: &[FxRatePoint], today: NaiveDate) -> Self {
        let rates = points
            .iter()
            .map(|p| (p.day, DayRate::Recorded(p.rate)))
            .collect();
        let mut table = Self { rates };
        table.fill_trailing_gap(today);
        table
    }

    fn fill_trailing_gap(&mut self, today: NaiveDate) {
        let Some(carried) = self.rates.range(..=today).next_back().map(|(_, r)| r.rate()) else {
            debug!(%today, "No exchange rate on or before today, skipping gap-fill");
            return;
        };

        let mut day = today;
        let mut filled = 0;
        while !self.rates.contains_key(&day) {
            self.rates.insert(day, DayRate::CarriedForward(carried));
            filled += 1;
            day -= Duration::days(1);
        }
        debug!(filled, carried, "Filled trailing exchange rate gap");
    }

    /// Replaces the carried-forward tail ending at `today` with `live_rate`.
    ///
    /// Walks back from `today` and stops at the first recorded day, so
    /// historical rates are never touched. Returns the number of replaced days.
    pub fn apply_live_rate(&mut self, live_rate: f64, today: NaiveDate) -> usize {
        let mut day = today;
        let mut replaced = 0;
        while let Some(entry) = self.rates.get_mut(&day) {
            if !matches!(entry, DayRate::CarriedForward(_)) {
                break;
            }
            *entry = DayRate::CarriedForward(live_rate);
            replaced += 1;
            day -= Duration::days(1);
        }
        debug!(replaced, live_rate, "Applied live exchange rate");
        replaced
    }

    pub fn rate_on(&self, day: NaiveDate) -> Option<f64> {
        self.rates.get(&day).map(DayRate::rate)
    }

    /// Conversion rate to the home currency at `date`. Domestic instruments
    /// always convert at 1.0.
    pub fn rate_for(&self, is_foreign: bool, date: DateTime<Utc>) -> Option<f64> {
        if !is_foreign {
            return Some(1.0);
        }
        self.rate_on(date.date_naive())
    }

    pub fn latest(&self) -> Option<(NaiveDate, f64)> {
        self.rates.iter().next_back().map(|(d, r)| (*d, r.rate()))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
