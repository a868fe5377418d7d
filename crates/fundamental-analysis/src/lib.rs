use analysis_core::FundamentalRecord;
use serde::{Deserialize, Serialize};

/// Number of passing conditions required for a record to count as strong.
pub const STRONG_THRESHOLD: u32 = 3;

const MAX_PE: f64 = 30.0;
const MIN_ROE_PCT: f64 = 15.0;
const MAX_DEBT_TO_EQUITY: f64 = 1.0;
const MIN_EPS_GROWTH_PCT: f64 = 10.0;

/// Per-condition outcome of the fundamental vote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundamentalConditions {
    pub reasonable_pe: bool,
    pub strong_roe: bool,
    pub low_debt: bool,
    pub eps_growth: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundamentalScore {
    pub passed: u32,
    pub conditions: FundamentalConditions,
}

impl FundamentalScore {
    pub fn is_strong(&self) -> bool {
        self.passed >= STRONG_THRESHOLD
    }
}

/// Threshold-voting classifier over P/E, ROE, debt-to-equity and EPS growth.
#[derive(Debug, Clone, Copy, Default)]
pub struct FundamentalAnalysisEngine;

impl FundamentalAnalysisEngine {
    pub fn new() -> Self {
        Self
    }

    /// Count the conditions met by the fields that are present. Absent fields
    /// fail their condition; a missing record scores zero.
    pub fn score(&self, record: Option<&FundamentalRecord>) -> FundamentalScore {
        let Some(record) = record else {
            return FundamentalScore::default();
        };

        let conditions = FundamentalConditions {
            reasonable_pe: record.pe.is_some_and(|pe| pe > 0.0 && pe < MAX_PE),
            strong_roe: record.roe.is_some_and(|roe| roe > MIN_ROE_PCT),
            low_debt: record
                .debt_to_equity
                .is_some_and(|de| de < MAX_DEBT_TO_EQUITY),
            eps_growth: record
                .eps_growth
                .is_some_and(|g| g > MIN_EPS_GROWTH_PCT),
        };

        let passed = [
            conditions.reasonable_pe,
            conditions.strong_roe,
            conditions.low_debt,
            conditions.eps_growth,
        ]
        .iter()
        .filter(|&&met| met)
        .count() as u32;

        FundamentalScore { passed, conditions }
    }

    pub fn is_strong(&self, record: Option<&FundamentalRecord>) -> bool {
        self.score(record).is_strong()
    }
}
