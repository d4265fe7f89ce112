use crate::config;
use crate::models::{OptionChainSnapshot, StrikeRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strike with its combined open interest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OiStrike {
    pub strike: f64,
    pub call_oi: f64,
    pub put_oi: f64,
    pub total_oi: f64,
}

/// Read-only summary of a weekly option chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChainAnalytics {
    pub total_call_oi: f64,
    pub total_put_oi: f64,
    pub pcr_oi: f64,
    pub pcr_volume: f64,
    pub max_call_oi_strike: f64,
    pub max_call_oi: f64,
    pub max_put_oi_strike: f64,
    pub max_put_oi: f64,
    pub max_pain_strike: f64,
    pub atm_strike: f64,
    pub top_oi_strikes: Vec<OiStrike>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PcrSentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for PcrSentiment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PcrSentiment::Bullish => write!(f, "Bullish"),
            PcrSentiment::Bearish => write!(f, "Bearish"),
            PcrSentiment::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Aggregate a snapshot. `None` when it carries no strikes.
pub fn analyze_option_chain(snapshot: &OptionChainSnapshot) -> Option<OptionChainAnalytics> {
    if snapshot.is_empty() {
        return None;
    }

    // Work on ascending strikes so every tie-break is order independent
    let mut strikes = snapshot.strikes.clone();
    strikes.sort_by(|a, b| a.strike.total_cmp(&b.strike));

    let total_call_oi: f64 = strikes.iter().map(|s| s.call_oi).sum();
    let total_put_oi: f64 = strikes.iter().map(|s| s.put_oi).sum();
    let total_call_volume: f64 = strikes.iter().map(|s| s.call_volume).sum();
    let total_put_volume: f64 = strikes.iter().map(|s| s.put_volume).sum();

    let max_call = first_max_by(&strikes, |s| s.call_oi)?;
    let max_put = first_max_by(&strikes, |s| s.put_oi)?;

    Some(OptionChainAnalytics {
        total_call_oi,
        total_put_oi,
        pcr_oi: safe_ratio(total_put_oi, total_call_oi),
        pcr_volume: safe_ratio(total_put_volume, total_call_volume),
        max_call_oi_strike: max_call.strike,
        max_call_oi: max_call.call_oi,
        max_put_oi_strike: max_put.strike,
        max_put_oi: max_put.put_oi,
        max_pain_strike: max_pain_strike(&strikes)?,
        atm_strike: find_atm_strike(&strikes, snapshot.underlying_value),
        top_oi_strikes: top_oi_strikes(&strikes, config::TOP_OI_STRIKES),
    })
}

/// Ratio that is exactly 0 when the denominator is 0
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// First strike (ascending) with the largest value of `key`
fn first_max_by<F>(strikes: &[StrikeRecord], key: F) -> Option<&StrikeRecord>
where
    F: Fn(&StrikeRecord) -> f64,
{
    strikes.iter().fold(None, |best, s| match best {
        Some(b) if key(s) <= key(b) => Some(b),
        _ => Some(s),
    })
}

/// Strike minimizing |call OI - put OI|, lowest strike on ties
pub fn max_pain_strike(strikes: &[StrikeRecord]) -> Option<f64> {
    let mut sorted: Vec<&StrikeRecord> = strikes.iter().collect();
    sorted.sort_by(|a, b| a.strike.total_cmp(&b.strike));

    let mut best: Option<(f64, f64)> = None;
    for s in sorted {
        let imbalance = (s.call_oi - s.put_oi).abs();
        match best {
            Some((_, min)) if imbalance >= min => {}
            _ => best = Some((s.strike, imbalance)),
        }
    }

    best.map(|(strike, _)| strike)
}

/// `n` strikes with the largest combined OI, descending
pub fn top_oi_strikes(strikes: &[StrikeRecord], n: usize) -> Vec<OiStrike> {
    let mut ranked: Vec<OiStrike> = strikes
        .iter()
        .map(|s| OiStrike {
            strike: s.strike,
            call_oi: s.call_oi,
            put_oi: s.put_oi,
            total_oi: s.total_oi(),
        })
        .collect();

    // Stable sort keeps ascending strike order among equal totals
    ranked.sort_by(|a, b| b.total_oi.total_cmp(&a.total_oi));
    ranked.truncate(n);
    ranked
}

/// Find ATM strike (closest to underlying, prefer floor)
pub fn find_atm_strike(strikes: &[StrikeRecord], underlying_value: f64) -> f64 {
    let mut closest_strike = 0.0;
    let mut min_distance = f64::MAX;

    for s in strikes {
        let distance = (s.strike - underlying_value).abs();

        // If same distance, prefer lower strike (floor)
        if distance < min_distance || (distance == min_distance && s.strike < closest_strike) {
            min_distance = distance;
            closest_strike = s.strike;
        }
    }

    closest_strike
}

/// Sentiment label of a put/call ratio
pub fn pcr_sentiment(pcr: f64) -> PcrSentiment {
    if pcr > config::PCR_BULLISH {
        PcrSentiment::Bullish
    } else if pcr < config::PCR_BEARISH {
        PcrSentiment::Bearish
    } else {
        PcrSentiment::Neutral
    }
}
