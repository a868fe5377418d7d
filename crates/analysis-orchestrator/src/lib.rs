use analysis_core::{
    AnalysisError, CandleSeries, FundamentalRecord, FundamentalsProvider, HoldReason,
    PriceHistoryProvider, PricePoint, Signal, TechnicalSnapshot,
};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use fundamental_analysis::FundamentalAnalysisEngine;
use risk_manager::{BracketParameters, RiskBracketCalculator};
use std::sync::Arc;
use technical_analysis::TechnicalAnalysisEngine;

pub mod screener;
pub use screener::{SignalScreener, Watchlist, DEFAULT_WATCHLIST};

#[cfg(test)]
mod test_support;

/// Calendar window fetched for indicator evaluation (~250 trading days).
pub const TECHNICAL_LOOKBACK_DAYS: i64 = 365;
/// Calendar window fetched for support lows and candle data.
pub const RECENT_LOOKBACK_DAYS: i64 = 30;

pub const RSI_READY_MIN: f64 = 40.0;
pub const RSI_READY_MAX: f64 = 65.0;

pub const DEFAULT_CACHE_TTL_SECS: i64 = 300;

/// Internal cache entry with timestamp
struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

/// Outcome of the two gates, before presentation.
#[derive(Debug, Clone, PartialEq)]
enum GateOutcome {
    Hold {
        reason: HoldReason,
        price: Option<f64>,
    },
    Buy {
        technical: TechnicalSnapshot,
        fundamental: FundamentalRecord,
    },
}

/// Gate 1: a fresh golden cross while momentum is neither overbought
/// nor oversold.
pub fn is_technically_ready(snapshot: &TechnicalSnapshot) -> bool {
    snapshot.golden_cross && (RSI_READY_MIN..=RSI_READY_MAX).contains(&snapshot.rsi)
}

/// Fuses the technical and fundamental views of a symbol into a BUY/HOLD
/// signal.
pub struct SignalEngine {
    price_provider: Arc<dyn PriceHistoryProvider>,
    fundamentals_provider: Arc<dyn FundamentalsProvider>,
    technical_analyzer: TechnicalAnalysisEngine,
    fundamental_analyzer: FundamentalAnalysisEngine,
    risk_calculator: RiskBracketCalculator,
    /// Cache bars per (symbol, lookback, date)
    bars_cache: DashMap<String, CacheEntry<Vec<PricePoint>>>,
    cache_ttl: Duration,
}

impl SignalEngine {
    pub fn new(
        price_provider: Arc<dyn PriceHistoryProvider>,
        fundamentals_provider: Arc<dyn FundamentalsProvider>,
    ) -> Self {
        Self {
            price_provider,
            fundamentals_provider,
            technical_analyzer: TechnicalAnalysisEngine::new(),
            fundamental_analyzer: FundamentalAnalysisEngine::new(),
            risk_calculator: RiskBracketCalculator::default(),
            bars_cache: DashMap::new(),
            cache_ttl: Duration::seconds(DEFAULT_CACHE_TTL_SECS),
        }
    }

    /// Set the price history cache TTL. Zero disables caching.
    pub fn with_cache_ttl(mut self, ttl_secs: i64) -> Self {
        self.cache_ttl = Duration::seconds(ttl_secs.max(0));
        self
    }

    pub fn with_bracket_parameters(mut self, params: BracketParameters) -> Self {
        self.risk_calculator = RiskBracketCalculator::new(params);
        self
    }

    /// Single-symbol signal. BUY signals carry a risk bracket.
    pub async fn evaluate(&self, symbol: &str) -> Signal {
        tracing::info!("Evaluating hybrid signal for {}", symbol);

        match self.run_gates(symbol).await {
            GateOutcome::Hold { reason, price } => {
                tracing::info!("{}: HOLD ({})", symbol, reason);
                Signal::hold(symbol, reason, price)
            }
            GateOutcome::Buy { technical, fundamental } => {
                let lows = match self.get_bars(symbol, RECENT_LOOKBACK_DAYS).await {
                    Ok(bars) => Some(bars.iter().map(|b| b.low).collect::<Vec<f64>>()),
                    Err(e) => {
                        tracing::warn!("Support lookup failed for {}: {}", symbol, e);
                        None
                    }
                };
                let bracket = self.risk_calculator.calculate(technical.price, lows.as_deref());
                tracing::info!(
                    "{}: BUY at {:.2} (stop {:.2}, target {:.2}{})",
                    symbol,
                    bracket.entry,
                    bracket.stop_loss,
                    bracket.take_profit,
                    if bracket.fallback { ", fallback bracket" } else { "" }
                );
                Signal::buy(symbol, &technical, &fundamental, Some(bracket))
            }
        }
    }

    /// OHLC arrays for the recent window. Unlike `evaluate`, failures are
    /// reported to the caller since there is no decision to fall back to.
    pub async fn candles(&self, symbol: &str) -> Result<CandleSeries, AnalysisError> {
        let bars = self.get_bars(symbol, RECENT_LOOKBACK_DAYS).await?;
        if bars.is_empty() {
            return Err(AnalysisError::NoData(format!("No candle data for {}", symbol)));
        }
        Ok(CandleSeries::from_points(&bars))
    }

    /// Evaluate both gates in order. The fundamentals provider is only
    /// called once the technical gate has passed.
    async fn run_gates(&self, symbol: &str) -> GateOutcome {
        let technical = match self.get_bars(symbol, TECHNICAL_LOOKBACK_DAYS).await {
            Ok(bars) => match self.technical_analyzer.evaluate(&bars) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    tracing::info!("Technical data unavailable for {}: {}", symbol, e);
                    None
                }
            },
            Err(e) => {
                log_provider_error(symbol, "price history", &e);
                None
            }
        };

        let technical = match technical {
            Some(snapshot) if is_technically_ready(&snapshot) => snapshot,
            other => {
                return GateOutcome::Hold {
                    reason: HoldReason::TechnicalNotReady,
                    price: other.map(|s| s.price),
                };
            }
        };

        let fundamental = match self.fundamentals_provider.fundamentals(symbol).await {
            Ok(record) => Some(record),
            Err(e) => {
                log_provider_error(symbol, "fundamentals", &e);
                None
            }
        };

        let score = self.fundamental_analyzer.score(fundamental.as_ref());
        tracing::debug!("{}: fundamental score {}/4 {:?}", symbol, score.passed, score.conditions);

        match fundamental {
            Some(fundamental) if score.is_strong() => GateOutcome::Buy { technical, fundamental },
            _ => GateOutcome::Hold {
                reason: HoldReason::WeakFundamentals,
                price: Some(technical.price),
            },
        }
    }

    /// Get bars with caching (TTL-bounded, keyed by calendar date)
    async fn get_bars(&self, symbol: &str, lookback_days: i64) -> Result<Vec<PricePoint>, AnalysisError> {
        if self.cache_ttl <= Duration::zero() {
            return self.price_provider.daily_history(symbol, lookback_days).await;
        }

        let now = Utc::now();
        let cache_key = format!("{}:{}:{}", symbol, lookback_days, now.date_naive());
        if let Some(entry) = self.bars_cache.get(&cache_key) {
            if now - entry.cached_at < self.cache_ttl {
                tracing::debug!("Bars cache hit for {}", cache_key);
                return Ok(entry.data.clone());
            }
        }

        let bars = self.price_provider.daily_history(symbol, lookback_days).await?;
        self.bars_cache.retain(|_, entry| now - entry.cached_at < self.cache_ttl);
        self.bars_cache.insert(
            cache_key,
            CacheEntry {
                data: bars.clone(),
                cached_at: now,
            },
        );
        Ok(bars)
    }
}

fn log_provider_error(symbol: &str, source: &str, error: &AnalysisError) {
    if error.is_transient() {
        tracing::warn!("{} fetch failed for {}: {}", source, symbol, error);
    } else {
        tracing::info!("No {} for {}: {}", source, symbol, error);
    }
}
