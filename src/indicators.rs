use crate::config;
use crate::models::PriceBar;
use serde::{Deserialize, Serialize};

/// Indicator values at the latest bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSnapshot {
    pub current_price: f64,
    /// Undefined while the history is shorter than the period
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub support: f64,
    pub resistance: f64,
}

/// Compute the snapshot from daily bars (oldest first). `None` for an empty series.
pub fn compute_technicals(bars: &[PriceBar]) -> Option<TechnicalSnapshot> {
    let last = bars.last()?;

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let window_start = bars.len().saturating_sub(config::SUPPORT_RESISTANCE_WINDOW);
    let recent = &bars[window_start..];
    let lows: Vec<f64> = recent.iter().map(|b| b.low).collect();
    let highs: Vec<f64> = recent.iter().map(|b| b.high).collect();

    let (macd_value, signal_value) = macd(&closes);

    Some(TechnicalSnapshot {
        current_price: last.close,
        sma_20: sma(&closes, config::SMA_SHORT),
        sma_50: sma(&closes, config::SMA_MEDIUM),
        sma_200: sma(&closes, config::SMA_LONG),
        rsi: rsi(&closes, config::RSI_PERIOD),
        macd: macd_value,
        macd_signal: signal_value,
        support: percentile(&lows, config::SUPPORT_PERCENTILE),
        resistance: percentile(&highs, config::RESISTANCE_PERCENTILE),
    })
}

/// Simple mean of the trailing `period` values
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// RSI from simple averages of gains and losses over the trailing `period` deltas.
/// Returns 50 when there is not enough history, 100 when there were no losses.
pub fn rsi(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period + 1 {
        return 50.0;
    }

    let tail = &closes[closes.len() - (period + 1)..];
    let (gains, losses) = tail.windows(2).fold((0.0, 0.0), |(g, l), w| {
        let delta = w[1] - w[0];
        if delta > 0.0 {
            (g + delta, l)
        } else {
            (g, l - delta)
        }
    });

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

/// Exponential moving average series seeded with the first value, alpha = 2/(span+1)
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());

    for &v in values {
        let next = match out.last() {
            Some(&prev) => alpha * v + (1.0 - alpha) * prev,
            None => v,
        };
        out.push(next);
    }

    out
}

/// Latest MACD line (EMA12 - EMA26) and its EMA9 signal
pub fn macd(closes: &[f64]) -> (f64, f64) {
    let fast = ema(closes, config::MACD_FAST);
    let slow = ema(closes, config::MACD_SLOW);

    let line: Vec<f64> = fast.iter().zip(slow.iter()).map(|(f, s)| f - s).collect();
    let signal = ema(&line, config::MACD_SIGNAL);

    (
        line.last().copied().unwrap_or(0.0),
        signal.last().copied().unwrap_or(0.0),
    )
}

/// Percentile with linear interpolation between closest ranks (q in 0..=100)
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}
