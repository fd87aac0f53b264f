//! Series reconstruction and valuation engine

pub mod balance;
pub mod config;
pub mod currency;
pub mod fx;
pub mod grid;
pub mod log;
pub mod portfolio;
pub mod records;
pub mod series;
pub mod valuation;

// Re-export main types for cleaner imports
pub use currency::CurrencyRateProvider;
pub use fx::FxRateTable;
pub use grid::SampleGrid;
pub use portfolio::StockPortfolio;
pub use records::Snapshot;
pub use series::{Series, SeriesPoint};
pub use valuation::{DividendMode, ProfitSplit};
