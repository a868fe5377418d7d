pub mod bracket;
#[cfg(test)]
mod tests;

pub use bracket::{BracketParameters, RiskBracketCalculator};
