use analysis_core::{AnalysisError, PricePoint, TechnicalSnapshot};

use crate::indicators::*;

/// Minimum number of daily bars before the slow EMA is considered stable.
pub const MIN_HISTORY: usize = 200;
pub const FAST_EMA_SPAN: usize = 50;
pub const SLOW_EMA_SPAN: usize = 200;
pub const RSI_PERIOD: usize = 14;

/// Computes the EMA(50)/EMA(200) crossover and RSI(14) snapshot for a
/// daily price series.
#[derive(Debug, Clone, Copy, Default)]
pub struct TechnicalAnalysisEngine;

impl TechnicalAnalysisEngine {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate the full lookback window. Callers should pass the whole window
    /// rather than a trailing slice, since the EMA seed is the first close.
    pub fn evaluate(&self, bars: &[PricePoint]) -> Result<TechnicalSnapshot, AnalysisError> {
        if bars.len() < MIN_HISTORY {
            return Err(AnalysisError::InsufficientHistory {
                required: MIN_HISTORY,
                actual: bars.len(),
            });
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        if closes.iter().any(|c| !c.is_finite()) {
            return Err(AnalysisError::InvalidData(
                "Non-finite close in price history".to_string(),
            ));
        }

        let ema_fast = ema(&closes, FAST_EMA_SPAN);
        let ema_slow = ema(&closes, SLOW_EMA_SPAN);
        let rsi_values = rsi(&closes, RSI_PERIOD);

        let (Some(&price), Some(&ema50), Some(&ema200), Some(&last_rsi)) = (
            closes.last(),
            ema_fast.last(),
            ema_slow.last(),
            rsi_values.last(),
        ) else {
            return Err(AnalysisError::InsufficientHistory {
                required: MIN_HISTORY,
                actual: bars.len(),
            });
        };

        let snapshot = TechnicalSnapshot {
            price,
            rsi: last_rsi,
            ema50,
            ema200,
            golden_cross: golden_cross(&ema_fast, &ema_slow),
        };

        tracing::debug!(
            "Technical snapshot: price={:.2} rsi={:.2} ema50={:.2} ema200={:.2} golden_cross={}",
            snapshot.price,
            snapshot.rsi,
            snapshot.ema50,
            snapshot.ema200,
            snapshot.golden_cross
        );

        Ok(snapshot)
    }
}
