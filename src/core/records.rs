//! Input record shapes and the snapshot loader.
//!
//! A [`Snapshot`] is the complete, immutable set of records the engine runs
//! on. It is loaded once per invocation and never mutated afterwards.

use crate::core::balance;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: DateTime<Utc>,
    pub account: String,
    /// Signed delta applied to the account balance.
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceAnchor {
    pub account: String,
    /// Balance as of "now".
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub code: String,
    pub label: String,
    pub quantity: f64,
    pub acquisition_price: f64,
    pub acquisition_fx_rate: f64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Whether prices are quoted in the foreign currency. Derived from the
    /// instrument code when omitted, see [`Snapshot::resolve_foreign`].
    #[serde(default)]
    pub is_foreign: Option<bool>,
}

impl Holding {
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t <= self.end
    }

    pub fn foreign(&self) -> bool {
        self.is_foreign.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub code: String,
    pub date: DateTime<Utc>,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendPoint {
    pub code: String,
    pub date: DateTime<Utc>,
    /// Per-share amount.
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxRatePoint {
    pub day: NaiveDate,
    pub rate: f64,
}

/// All record collections for one engine run.
///
/// Records are expected in ascending date order within each collection.
/// That is a precondition of the engine and is not checked here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub anchors: Vec<BalanceAnchor>,
    /// Opening balances; each becomes an anchor of `opening + sum(transactions)`.
    #[serde(default)]
    pub openings: Vec<BalanceAnchor>,
    #[serde(default)]
    pub holdings: Vec<Holding>,
    #[serde(default)]
    pub prices: Vec<PricePoint>,
    #[serde(default)]
    pub dividends: Vec<DividendPoint>,
    #[serde(default)]
    pub fx_rates: Vec<FxRatePoint>,
}

impl Snapshot {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read snapshot file: {}", path.as_ref().display())
        })?;
        let snapshot: Self = serde_json::from_str(&content).with_context(|| {
            format!("Failed to parse snapshot file: {}", path.as_ref().display())
        })?;
        debug!(
            transactions = snapshot.transactions.len(),
            holdings = snapshot.holdings.len(),
            prices = snapshot.prices.len(),
            fx_rates = snapshot.fx_rates.len(),
            "Loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Explicit anchors plus those derived from opening balances. An explicit
    /// anchor overrides an opening balance for the same account.
    pub fn all_anchors(&self) -> Vec<BalanceAnchor> {
        let mut anchors = balance::anchors_from_openings(&self.openings, &self.transactions);
        anchors.extend(self.anchors.iter().cloned());
        anchors
    }

    /// Fills in `is_foreign` for holdings that leave it unset: codes ending
    /// in `domestic_suffix` are domestic, everything else is foreign.
    pub fn resolve_foreign(mut self, domestic_suffix: &str) -> Self {
        for holding in &mut self.holdings {
            if holding.is_foreign.is_none() {
                holding.is_foreign = Some(!holding.code.ends_with(domestic_suffix));
            }
        }
        self
    }
}
