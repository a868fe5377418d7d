//! Fake providers and price series shared by the orchestrator tests.

use analysis_core::{
    AnalysisError, FundamentalRecord, FundamentalsProvider, PriceHistoryProvider, PricePoint,
};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use technical_analysis::{ema, FAST_EMA_SPAN, SLOW_EMA_SPAN};

use crate::RECENT_LOOKBACK_DAYS;

/// Trading days returned for the short (30 calendar day) window
pub const RECENT_WINDOW_POINTS: usize = 21;

pub fn series_from_closes(closes: &[f64]) -> Vec<PricePoint> {
    let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            date: start + Duration::days(i as i64),
            open: close,
            high: close + 0.5,
            low: close - 0.5,
            close,
            volume: 1_000_000.0,
        })
        .collect()
}

pub fn flat_series(len: usize, price: f64) -> Vec<PricePoint> {
    series_from_closes(&vec![price; len])
}

/// A 200-bar decline followed by a zigzag of `+up` / `-down` moves, cut at
/// the first bar where EMA50 closes above EMA200. With an even RSI window
/// the last 14 deltas hold seven of each move, so RSI = 100 - 100 / (1 + up/down).
pub fn crossing_series(up: f64, down: f64) -> Vec<PricePoint> {
    let mut closes: Vec<f64> = (0..200).map(|i| 300.0 - i as f64).collect();
    let mut price = *closes.last().unwrap();

    for k in 0..3000 {
        price += if k % 2 == 0 { up } else { -down };
        closes.push(price);
        let fast = ema(&closes, FAST_EMA_SPAN);
        let slow = ema(&closes, SLOW_EMA_SPAN);
        if fast[fast.len() - 1] > slow[slow.len() - 1] {
            return series_from_closes(&closes);
        }
    }
    panic!("series never crossed");
}

pub struct FakePrices {
    series: HashMap<String, Result<Vec<PricePoint>, AnalysisError>>,
    recent_window: bool,
    calls: AtomicUsize,
}

impl FakePrices {
    pub fn multi(entries: Vec<(&str, Result<Vec<PricePoint>, AnalysisError>)>) -> Arc<Self> {
        Arc::new(Self {
            series: entries
                .into_iter()
                .map(|(symbol, result)| (symbol.to_string(), result))
                .collect(),
            recent_window: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn single(symbol: &str, series: Vec<PricePoint>) -> Arc<Self> {
        Self::multi(vec![(symbol, Ok(series))])
    }

    pub fn failing(symbol: &str, error: AnalysisError) -> Arc<Self> {
        Self::multi(vec![(symbol, Err(error))])
    }

    /// Same data, but every short-window request fails.
    pub fn without_recent_window(self: Arc<Self>) -> Arc<Self> {
        Arc::new(Self {
            series: self.series.clone(),
            recent_window: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceHistoryProvider for FakePrices {
    async fn daily_history(
        &self,
        symbol: &str,
        lookback_days: i64,
    ) -> Result<Vec<PricePoint>, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let series = self
            .series
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| Err(AnalysisError::NoData(symbol.to_string())))?;

        if lookback_days <= RECENT_LOOKBACK_DAYS {
            if !self.recent_window {
                return Err(AnalysisError::ApiError("recent window unavailable".to_string()));
            }
            let start = series.len().saturating_sub(RECENT_WINDOW_POINTS);
            return Ok(series[start..].to_vec());
        }
        Ok(series)
    }
}

pub struct FakeFundamentals {
    result: Result<FundamentalRecord, AnalysisError>,
    calls: AtomicUsize,
}

impl FakeFundamentals {
    pub fn new(result: Result<FundamentalRecord, AnalysisError>) -> Arc<Self> {
        Arc::new(Self {
            result,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn strong() -> Arc<Self> {
        Self::new(Ok(FundamentalRecord {
            pe: Some(20.0),
            roe: Some(25.0),
            debt_to_equity: Some(0.4),
            eps_growth: Some(18.0),
        }))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FundamentalsProvider for FakeFundamentals {
    async fn fundamentals(&self, _symbol: &str) -> Result<FundamentalRecord, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}
