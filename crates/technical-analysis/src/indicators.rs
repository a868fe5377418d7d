/// Exponential Moving Average, recursive (non-adjusted) form.
///
/// Seeded with the first value, then `y[t] = alpha * x[t] + (1 - alpha) * y[t-1]`
/// with `alpha = 2 / (span + 1)`. Output has the same length as the input, so
/// the result depends on where the window starts.
pub fn ema(data: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || data.is_empty() {
        return vec![];
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut result = Vec::with_capacity(data.len());
    result.push(data[0]);

    for i in 1..data.len() {
        let prev = result[i - 1];
        result.push(alpha * data[i] + (1.0 - alpha) * prev);
    }

    result
}

/// Relative Strength Index using simple rolling means of gains and losses.
///
/// Returns one value per input point that has at least `period` deltas
/// behind it, i.e. `data.len() - period` values aligned to the tail of
/// `data`. A window with no losses yields exactly 100.
pub fn rsi(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period + 1 {
        return vec![];
    }

    let mut gains = Vec::with_capacity(data.len() - 1);
    let mut losses = Vec::with_capacity(data.len() - 1);

    for i in 1..data.len() {
        let change = data[i] - data[i - 1];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(-change);
        }
    }

    let mut rsi_values = Vec::with_capacity(gains.len() + 1 - period);

    for end in period..=gains.len() {
        let avg_gain = gains[end - period..end].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[end - period..end].iter().sum::<f64>() / period as f64;

        let rsi = if avg_loss == 0.0 {
            100.0
        } else {
            let rs = avg_gain / avg_loss;
            100.0 - (100.0 / (1.0 + rs))
        };
        rsi_values.push(rsi);
    }

    rsi_values
}

/// True only when `fast` crossed above `slow` on the last element:
/// at or below on the previous bar, strictly above on the last one.
pub fn golden_cross(fast: &[f64], slow: &[f64]) -> bool {
    if fast.len() < 2 || slow.len() < 2 {
        return false;
    }

    let (fast_prev, fast_last) = (fast[fast.len() - 2], fast[fast.len() - 1]);
    let (slow_prev, slow_last) = (slow[slow.len() - 2], slow[slow.len() - 1]);

    fast_prev <= slow_prev && fast_last > slow_last
}

/// Lowest low of the trailing `lookback` lows, ignoring non-finite values.
pub fn recent_low(lows: &[f64], lookback: usize) -> Option<f64> {
    if lookback == 0 {
        return None;
    }
    let start = lows.len().saturating_sub(lookback);
    lows[start..]
        .iter()
        .copied()
        .filter(|l| l.is_finite())
        .reduce(f64::min)
}
