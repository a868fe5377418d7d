use analysis_orchestrator::{Watchlist, DEFAULT_CACHE_TTL_SECS};
use anyhow::{Context, Result};
use fmp_client::FmpConfig;
use polygon_client::PolygonConfig;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub polygon_api_key: String,
    pub polygon_rate_limit: usize,
    pub fmp_api_key: String,
    pub provider_timeout_secs: u64,
    pub cache_ttl_secs: i64,
    pub watchlist: Watchlist,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ServerConfig {
            port: parse_or(&var, "PORT", 5000)?,
            polygon_api_key: var("POLYGON_API_KEY")
                .filter(|v| !v.trim().is_empty())
                .context("POLYGON_API_KEY not set")?,
            polygon_rate_limit: parse_or(&var, "POLYGON_RATE_LIMIT", 500)?,
            fmp_api_key: var("FMP_API_KEY")
                .filter(|v| !v.trim().is_empty())
                .context("FMP_API_KEY not set")?,
            provider_timeout_secs: parse_or(&var, "PROVIDER_TIMEOUT_SECS", 10)?,
            cache_ttl_secs: parse_or(&var, "CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?,
            watchlist: var("WATCHLIST")
                .map(|csv| Watchlist::from_csv(&csv))
                .filter(|w| !w.is_empty())
                .unwrap_or_default(),
        };

        if config.polygon_rate_limit == 0 {
            anyhow::bail!("POLYGON_RATE_LIMIT must be at least 1");
        }

        Ok(config)
    }

    pub fn polygon_config(&self) -> PolygonConfig {
        PolygonConfig {
            rate_limit: self.polygon_rate_limit,
            timeout: Duration::from_secs(self.provider_timeout_secs),
            ..PolygonConfig::new(self.polygon_api_key.clone())
        }
    }

    pub fn fmp_config(&self) -> FmpConfig {
        FmpConfig {
            timeout: Duration::from_secs(self.provider_timeout_secs),
            ..FmpConfig::new(self.fmp_api_key.clone())
        }
    }
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        _ => Ok(default),
    }
}
