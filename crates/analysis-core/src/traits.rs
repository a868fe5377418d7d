use async_trait::async_trait;
use crate::{AnalysisError, FundamentalRecord, PricePoint};

/// Source of daily OHLC history.
///
/// Implementations return points in chronological order, oldest first.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    async fn daily_history(
        &self,
        symbol: &str,
        lookback_days: i64,
    ) -> Result<Vec<PricePoint>, AnalysisError>;
}

/// Source of company fundamentals
#[async_trait]
pub trait FundamentalsProvider: Send + Sync {
    async fn fundamentals(&self, symbol: &str) -> Result<FundamentalRecord, AnalysisError>;
}
