use super::{GateOutcome, SignalEngine};
use analysis_core::{round_to, ScreenEntry};
use std::sync::Arc;
use tokio::task::JoinSet;

pub const DEFAULT_WATCHLIST: &[&str] = &[
    "AAPL", "MSFT", "NVDA", "GOOGL", "AMZN", "META", "TSLA", "BRK.B", "JNJ", "V",
];

/// Ordered list of symbols scanned by the screener
#[derive(Debug, Clone, PartialEq)]
pub struct Watchlist(Vec<String>);

impl Watchlist {
    pub fn new(symbols: Vec<String>) -> Self {
        Self(symbols)
    }

    /// Parse a comma-separated list, upper-casing and dropping blanks.
    pub fn from_csv(csv: &str) -> Self {
        Self(
            csv.split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    pub fn symbols(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Watchlist {
    fn default() -> Self {
        Self(DEFAULT_WATCHLIST.iter().map(|s| s.to_string()).collect())
    }
}

impl SignalEngine {
    /// Abbreviated BUY entry for one symbol, or `None` when it holds.
    /// Screen entries skip the risk bracket.
    pub async fn screen_symbol(&self, symbol: &str) -> Option<ScreenEntry> {
        match self.run_gates(symbol).await {
            GateOutcome::Buy { technical, fundamental } => Some(ScreenEntry {
                symbol: symbol.to_string(),
                price: technical.price,
                rsi: round_to(technical.rsi, 2),
                pe: fundamental.pe,
            }),
            GateOutcome::Hold { .. } => None,
        }
    }
}

pub struct SignalScreener {
    engine: Arc<SignalEngine>,
    watchlist: Watchlist,
}

impl SignalScreener {
    pub fn new(engine: Arc<SignalEngine>, watchlist: Watchlist) -> Self {
        Self { engine, watchlist }
    }

    pub fn watchlist(&self) -> &Watchlist {
        &self.watchlist
    }

    /// Evaluate every watch-list symbol concurrently and return the BUYs in
    /// watch-list order. A failing symbol is skipped, never the whole screen.
    pub async fn screen(&self) -> Vec<ScreenEntry> {
        let total = self.watchlist.len();
        tracing::info!("Starting screen of {} symbols", total);

        let mut tasks = JoinSet::new();

        for (index, symbol) in self.watchlist.symbols().iter().cloned().enumerate() {
            let engine = Arc::clone(&self.engine);
            tasks.spawn(async move {
                let entry = engine.screen_symbol(&symbol).await;
                (index, entry)
            });
        }

        let mut hits: Vec<(usize, ScreenEntry)> = Vec::new();

        while let Some(result) = tasks.join_next().await {
            match result {
                Ok((index, Some(entry))) => hits.push((index, entry)),
                Ok((_, None)) => {}
                Err(e) => {
                    tracing::error!("Screen task error: {}", e);
                }
            }
        }

        hits.sort_by_key(|(index, _)| *index);

        tracing::info!("Screen complete: {}/{} symbols signalled BUY", hits.len(), total);

        hits.into_iter().map(|(_, entry)| entry).collect()
    }
}
