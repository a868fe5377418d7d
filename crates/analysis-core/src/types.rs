use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLC bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

/// Indicator values at the most recent bar of a price series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSnapshot {
    pub price: f64,
    pub rsi: f64,
    pub ema50: f64,
    pub ema200: f64,
    pub golden_cross: bool,
}

impl TechnicalSnapshot {
    /// Copy with RSI rounded to two decimals for presentation.
    pub fn rounded(&self) -> Self {
        Self {
            rsi: round_to(self.rsi, 2),
            ..*self
        }
    }
}

/// Company fundamentals. Every field is optional; `None` means unknown,
/// never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalRecord {
    pub pe: Option<f64>,
    /// Return on equity, in percent
    pub roe: Option<f64>,
    pub debt_to_equity: Option<f64>,
    /// Year-over-year EPS growth, in percent
    pub eps_growth: Option<f64>,
}

impl FundamentalRecord {
    pub fn rounded(&self) -> Self {
        Self {
            pe: self.pe,
            roe: self.roe.map(|v| round_to(v, 2)),
            debt_to_equity: self.debt_to_equity,
            eps_growth: self.eps_growth.map(|v| round_to(v, 2)),
        }
    }
}

/// Entry, stop-loss and take-profit levels for a long position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskBracket {
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    /// Set when the fixed 5% / 10% bracket replaced a degenerate one
    #[serde(default)]
    pub fallback: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Buy,
    Hold,
}

/// Why a symbol was held back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldReason {
    #[serde(rename = "Technical not ready")]
    TechnicalNotReady,
    #[serde(rename = "Weak fundamentals")]
    WeakFundamentals,
}

impl HoldReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            HoldReason::TechnicalNotReady => "Technical not ready",
            HoldReason::WeakFundamentals => "Weak fundamentals",
        }
    }
}

impl std::fmt::Display for HoldReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time recommendation for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    #[serde(rename = "signal")]
    pub decision: Decision,
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<HoldReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical: Option<TechnicalSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fundamental: Option<FundamentalRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_bracket: Option<RiskBracket>,
}

impl Signal {
    pub fn hold(symbol: &str, reason: HoldReason, price: Option<f64>) -> Self {
        Self {
            symbol: symbol.to_string(),
            decision: Decision::Hold,
            price,
            reason: Some(reason),
            technical: None,
            fundamental: None,
            risk_bracket: None,
        }
    }

    /// BUY signal with presentation rounding applied to the technical and
    /// fundamental sections.
    pub fn buy(
        symbol: &str,
        technical: &TechnicalSnapshot,
        fundamental: &FundamentalRecord,
        risk_bracket: Option<RiskBracket>,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            decision: Decision::Buy,
            price: Some(technical.price),
            reason: None,
            technical: Some(technical.rounded()),
            fundamental: Some(fundamental.rounded()),
            risk_bracket,
        }
    }

    pub fn is_buy(&self) -> bool {
        self.decision == Decision::Buy
    }
}

/// Abbreviated BUY entry produced by the watch-list screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenEntry {
    pub symbol: String,
    pub price: f64,
    pub rsi: f64,
    pub pe: Option<f64>,
}

/// Raw OHLC arrays for charting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandleSeries {
    pub dates: Vec<String>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

impl CandleSeries {
    pub fn from_points(points: &[PricePoint]) -> Self {
        Self {
            dates: points
                .iter()
                .map(|p| p.date.format("%Y-%m-%d").to_string())
                .collect(),
            open: points.iter().map(|p| p.open).collect(),
            high: points.iter().map(|p| p.high).collect(),
            low: points.iter().map(|p| p.low).collect(),
            close: points.iter().map(|p| p.close).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(day: u32, close: f64) -> PricePoint {
        PricePoint {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 0.0,
        }
    }

    #[test]
    fn test_round_to_two_decimals() {
        assert_eq!(round_to(52.34567, 2), 52.35);
        assert_eq!(round_to(22.0, 2), 22.0);
        assert_eq!(round_to(-1.005_1, 2), -1.01);
    }

    #[test]
    fn test_fundamental_rounding_keeps_absent_fields_absent() {
        let record = FundamentalRecord {
            pe: Some(18.123),
            roe: Some(22.4567),
            debt_to_equity: None,
            eps_growth: None,
        };
        let rounded = record.rounded();
        assert_eq!(rounded.pe, Some(18.123));
        assert_eq!(rounded.roe, Some(22.46));
        assert_eq!(rounded.debt_to_equity, None);
        assert_eq!(rounded.eps_growth, None);
    }

    #[test]
    fn test_hold_signal_serialization() {
        let signal = Signal::hold("AAPL", HoldReason::TechnicalNotReady, None);
        let json = serde_json::to_value(&signal).unwrap();
        assert_eq!(json["signal"], "HOLD");
        assert_eq!(json["reason"], "Technical not ready");
        assert!(json["price"].is_null());
        assert!(json.get("risk_bracket").is_none());
        assert!(json.get("technical").is_none());
    }

    #[test]
    fn test_buy_signal_serialization_rounds_rsi() {
        let tech = TechnicalSnapshot {
            price: 101.5,
            rsi: 52.3456,
            ema50: 100.0,
            ema200: 99.0,
            golden_cross: true,
        };
        let signal = Signal::buy("MSFT", &tech, &FundamentalRecord::default(), None);
        let json = serde_json::to_value(&signal).unwrap();
        assert_eq!(json["signal"], "BUY");
        assert_eq!(json["price"], 101.5);
        assert_eq!(json["technical"]["rsi"], 52.35);
        assert_eq!(json["technical"]["golden_cross"], true);
        assert!(json.get("reason").is_none());
        assert!(json["fundamental"]["pe"].is_null());
    }

    #[test]
    fn test_candle_series_dates_are_iso() {
        let series = CandleSeries::from_points(&[point(1, 10.0), point(4, 11.0)]);
        assert_eq!(series.dates, vec!["2024-03-01", "2024-03-04"]);
        assert_eq!(series.close, vec![10.0, 11.0]);
        assert_eq!(series.low, vec![8.0, 9.0]);
        assert!(!series.is_empty());
    }
}
