//! Financial Modeling Prep client
//!
//! Supplies the fundamentals record (P/E, ROE, debt-to-equity, EPS growth)
//! from the company profile and financial-growth endpoints.

use analysis_core::{AnalysisError, FundamentalRecord, FundamentalsProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

#[derive(Debug, Clone)]
pub struct FmpConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl FmpConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Clone)]
pub struct FmpClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl FmpClient {
    pub fn new(config: FmpConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// GET `{base}/{path}/{symbol}` and decode the JSON array body.
    async fn get_list<T: DeserializeOwned>(&self, path: &str, symbol: &str) -> Result<Vec<T>, AnalysisError> {
        let url = format!("{}/{}/{}", self.base_url, path, symbol);

        let response = self
            .client
            .get(&url)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AnalysisError::ApiError(format!(
                "FMP {} HTTP {}: {}",
                path,
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))
    }

    /// Company profile (valuation, profitability and leverage ratios)
    pub async fn get_profile(&self, symbol: &str) -> Result<CompanyProfile, AnalysisError> {
        let mut profiles: Vec<CompanyProfile> = self.get_list("profile", symbol).await?;
        if profiles.is_empty() {
            return Err(AnalysisError::NoData(format!("No FMP profile for {}", symbol)));
        }
        Ok(profiles.swap_remove(0))
    }

    /// Most recent financial-growth row, if any
    pub async fn get_latest_growth(&self, symbol: &str) -> Result<Option<FinancialGrowth>, AnalysisError> {
        let rows: Vec<FinancialGrowth> = self.get_list("financial-growth", symbol).await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl FundamentalsProvider for FmpClient {
    async fn fundamentals(&self, symbol: &str) -> Result<FundamentalRecord, AnalysisError> {
        let profile = self.get_profile(symbol).await?;

        // Growth is optional: a failed lookup leaves EPS growth unknown.
        let growth = match self.get_latest_growth(symbol).await {
            Ok(growth) => growth,
            Err(e) => {
                tracing::warn!("FMP growth lookup failed for {}: {}", symbol, e);
                None
            }
        };

        Ok(build_record(&profile, growth.as_ref()))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub pe_ratio: Option<f64>,
    /// Fraction, e.g. 0.22 for 22%
    #[serde(default)]
    pub roe: Option<f64>,
    #[serde(default)]
    pub debt_to_equity: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FinancialGrowth {
    #[serde(default)]
    pub date: Option<String>,
    /// Fraction, e.g. 0.15 for 15%
    #[serde(default)]
    pub epsgrowth: Option<f64>,
}

/// Map FMP fractions to the percentage-based record.
fn build_record(profile: &CompanyProfile, growth: Option<&FinancialGrowth>) -> FundamentalRecord {
    FundamentalRecord {
        pe: profile.pe_ratio,
        roe: profile.roe.map(|r| r * 100.0),
        debt_to_equity: profile.debt_to_equity,
        eps_growth: growth.and_then(|g| g.epsgrowth).map(|g| g * 100.0),
    }
}
