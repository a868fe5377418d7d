use analysis_core::RiskBracket;
use serde::{Deserialize, Serialize};
use technical_analysis::recent_low;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketParameters {
    /// Number of trailing daily lows scanned for the support level
    pub support_lookback: usize,
    /// Support as a fraction of price when no lows are available
    pub fallback_support_ratio: f64,
    /// Stop-loss as a fraction of support (0.98 = 2% below)
    pub support_buffer_ratio: f64,
    pub reward_to_risk: f64,
    pub fallback_stop_ratio: f64,
    pub fallback_target_ratio: f64,
}

impl Default for BracketParameters {
    fn default() -> Self {
        Self {
            support_lookback: 10,
            fallback_support_ratio: 0.95,
            support_buffer_ratio: 0.98,
            reward_to_risk: 2.0,
            fallback_stop_ratio: 0.95,
            fallback_target_ratio: 1.10,
        }
    }
}

/// Derives entry / stop-loss / take-profit from the current price and the
/// recent support level.
#[derive(Debug, Clone, Default)]
pub struct RiskBracketCalculator {
    params: BracketParameters,
}

impl RiskBracketCalculator {
    pub fn new(params: BracketParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &BracketParameters {
        &self.params
    }

    /// Support level: lowest of the trailing daily lows, or a fixed discount
    /// to price when the lows are missing or unusable.
    pub fn support_level(&self, price: f64, lows: Option<&[f64]>) -> f64 {
        lows.and_then(|lows| recent_low(lows, self.params.support_lookback))
            .unwrap_or(price * self.params.fallback_support_ratio)
    }

    pub fn calculate(&self, price: f64, lows: Option<&[f64]>) -> RiskBracket {
        let support = self.support_level(price, lows);
        let entry = price;
        let stop_loss = support * self.params.support_buffer_ratio;
        let risk = entry - stop_loss;
        let take_profit = entry + self.params.reward_to_risk * risk;

        // NaN fails both comparisons, so test the valid region and negate.
        let valid = stop_loss > 0.0 && take_profit > entry && stop_loss < entry;
        if !valid {
            tracing::debug!(
                "Degenerate bracket (entry={:.2}, support={:.2}, stop={:.2}, target={:.2}), using fixed fallback",
                entry,
                support,
                stop_loss,
                take_profit
            );
            return self.fallback(entry);
        }

        RiskBracket {
            entry,
            stop_loss,
            take_profit,
            fallback: false,
        }
    }

    /// Fixed 5% stop / 10% target bracket
    pub fn fallback(&self, entry: f64) -> RiskBracket {
        RiskBracket {
            entry,
            stop_loss: entry * self.params.fallback_stop_ratio,
            take_profit: entry * self.params.fallback_target_ratio,
            fallback: true,
        }
    }
}
