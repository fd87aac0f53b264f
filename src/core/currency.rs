//! Live currency rate abstractions

use anyhow::{Result, anyhow};
use async_trait::async_trait;

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64>;
}

/// Serves a single configured rate for one currency pair.
pub struct FixedRateProvider {
    from: String,
    to: String,
    rate: f64,
}

impl FixedRateProvider {
    pub fn new(from: &str, to: &str, rate: f64) -> Self {
        Self {
            from: from.to_uppercase(),
            to: to.to_uppercase(),
            rate,
        }
    }
}

#[async_trait]
impl CurrencyRateProvider for FixedRateProvider {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        if from.eq_ignore_ascii_case(&self.from) && to.eq_ignore_ascii_case(&self.to) {
            Ok(self.rate)
        } else {
            Err(anyhow!("Rate not configured for {} to {}", from, to))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_rate_provider() {
        let provider = FixedRateProvider::new("usd", "JPY", 160.0);
        assert_eq!(provider.get_rate("USD", "jpy").await.unwrap(), 160.0);

        let err = provider.get_rate("EUR", "JPY").await.unwrap_err();
        assert!(err.to_string().contains("EUR to JPY"));
    }
}
