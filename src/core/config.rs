use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct GridConfig {
    /// First day of the asset chart.
    pub start: NaiveDate,
    pub points: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            points: 100,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ProfitConfig {
    pub window_days: i64,
    /// The profit window never reaches back before this day.
    pub floor: NaiveDate,
    pub max_points: usize,
    pub include_fx_gain: bool,
}

impl Default for ProfitConfig {
    fn default() -> Self {
        ProfitConfig {
            window_days: 183,
            floor: NaiveDate::from_ymd_opt(2019, 8, 1).unwrap_or_default(),
            max_points: 200,
            include_fx_gain: true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DividendConfig {
    pub epoch: NaiveDate,
    pub step_months: u32,
    pub mode: String,
}

impl Default for DividendConfig {
    fn default() -> Self {
        DividendConfig {
            epoch: NaiveDate::from_ymd_opt(2019, 7, 1).unwrap_or_default(),
            step_months: 6,
            mode: "cumulative".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct FxConfig {
    pub foreign_currency: String,
    pub home_currency: String,
    /// Current rate used to override the carried-forward tail, if known.
    pub live_rate: Option<f64>,
    /// Instrument codes ending with this suffix are quoted in the home currency.
    pub domestic_suffix: String,
}

impl Default for FxConfig {
    fn default() -> Self {
        FxConfig {
            foreign_currency: "USD".to_string(),
            home_currency: "JPY".to_string(),
            live_rate: None,
            domestic_suffix: ".T".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub profit: ProfitConfig,
    #[serde(default)]
    pub dividends: DividendConfig,
    #[serde(default)]
    pub fx: FxConfig,
}

impl AppConfig {
    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "assetline", "assetline")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Loads from `path` when given, otherwise the default location. A missing
    /// default file falls back to built-in defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }
        let default_path = Self::default_config_path()?;
        if default_path.exists() {
            Self::load_from_path(&default_path)
        } else {
            debug!("No config file at {}, using defaults", default_path.display());
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
grid:
  start: 2021-04-01
  points: 50
profit:
  window_days: 30
  include_fx_gain: false
dividends:
  mode: yield
fx:
  live_rate: 155.2
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.grid.start, NaiveDate::from_ymd_opt(2021, 4, 1).unwrap());
        assert_eq!(config.grid.points, 50);
        assert_eq!(config.profit.window_days, 30);
        assert!(!config.profit.include_fx_gain);
        // Unset fields keep their defaults
        assert_eq!(config.profit.max_points, 200);
        assert_eq!(config.dividends.mode, "yield");
        assert_eq!(config.dividends.step_months, 6);
        assert_eq!(config.fx.live_rate, Some(155.2));
        assert_eq!(config.fx.domestic_suffix, ".T");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.grid.points, 100);
        assert_eq!(config.profit.window_days, 183);
        assert!(config.profit.include_fx_gain);
        assert!(config.fx.live_rate.is_none());
        assert_eq!(config.fx.foreign_currency, "USD");
    }

    #[test]
    fn test_load_from_path() -> Result<()> {
        let file = tempfile::NamedTempFile::new()?;
        fs::write(file.path(), "grid:\n  points: 12\n")?;
        let config = AppConfig::load_or_default(file.path().to_str())?;
        assert_eq!(config.grid.points, 12);

        assert!(AppConfig::load_from_path("/no/such/config.yaml").is_err());
        Ok(())
    }
}
