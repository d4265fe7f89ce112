use crate::config;
use crate::indicators::TechnicalSnapshot;
use crate::processor::OptionChainAnalytics;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Bias {
    Bullish,
    Bearish,
    Sideways,
}

impl fmt::Display for Bias {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Bias::Bullish => write!(f, "BULLISH"),
            Bias::Bearish => write!(f, "BEARISH"),
            Bias::Sideways => write!(f, "SIDEWAYS"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    High,
    Medium,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Confidence::High => write!(f, "HIGH"),
            Confidence::Medium => write!(f, "MEDIUM"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalSide {
    Bullish,
    Bearish,
}

/// One scoring contribution and why it fired
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub indicator: String,
    pub side: SignalSide,
    pub points: i32,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeLevels {
    pub entry_low: f64,
    pub entry_high: f64,
    pub target_1: f64,
    pub target_2: f64,
    pub stop_loss: f64,
}

/// Four-leg range strategy, only suggested for a SIDEWAYS bias
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IronCondor {
    pub sell_call: f64,
    pub buy_call: f64,
    pub sell_put: f64,
    pub buy_put: f64,
    pub profit_low: f64,
    pub profit_high: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionKind {
    #[serde(rename = "CE")]
    Call,
    #[serde(rename = "PE")]
    Put,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OptionKind::Call => write!(f, "CE"),
            OptionKind::Put => write!(f, "PE"),
        }
    }
}

/// Single-leg directional option suggestion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionTrade {
    pub kind: OptionKind,
    pub strike: f64,
}

/// Terminal artifact of the pipeline; the only input rendering needs besides the raw snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasResult {
    pub bias: Bias,
    pub confidence: Confidence,
    pub bullish_score: i32,
    pub bearish_score: i32,
    pub score_diff: i32,
    pub levels: TradeLevels,
    pub iron_condor: Option<IronCondor>,
    pub option_trade: Option<OptionTrade>,
    pub signals: Vec<Signal>,
}

// -----------------------------------------------
// SCORING
// -----------------------------------------------

#[derive(Default)]
struct Scorecard {
    bullish: i32,
    bearish: i32,
    signals: Vec<Signal>,
}

impl Scorecard {
    fn add(&mut self, indicator: &str, side: SignalSide, points: i32, reason: String) {
        match side {
            SignalSide::Bullish => self.bullish += points,
            SignalSide::Bearish => self.bearish += points,
        }
        self.signals.push(Signal {
            indicator: indicator.to_string(),
            side,
            points,
            reason,
        });
    }
}

fn score_moving_average(card: &mut Scorecard, label: &str, price: f64, sma: Option<f64>) {
    let Some(avg) = sma else {
        return;
    };

    if price > avg {
        card.add(label, SignalSide::Bullish, 1, format!("Price {:.2} above {} {:.2}", price, label, avg));
    } else if price < avg {
        card.add(label, SignalSide::Bearish, 1, format!("Price {:.2} below {} {:.2}", price, label, avg));
    }
}

fn score_signals(tech: &TechnicalSnapshot, options: Option<&OptionChainAnalytics>) -> Scorecard {
    let mut card = Scorecard::default();
    let price = tech.current_price;

    // Rule 1: Trend versus the three moving averages
    score_moving_average(&mut card, "SMA 20", price, tech.sma_20);
    score_moving_average(&mut card, "SMA 50", price, tech.sma_50);
    score_moving_average(&mut card, "SMA 200", price, tech.sma_200);

    // Rule 2: RSI extremes, oversold weighted double
    if tech.rsi > config::RSI_OVERBOUGHT {
        card.add("RSI", SignalSide::Bearish, 1, format!("RSI {:.1} overbought", tech.rsi));
    } else if tech.rsi < config::RSI_OVERSOLD {
        card.add("RSI", SignalSide::Bullish, 2, format!("RSI {:.1} oversold", tech.rsi));
    }

    // Rule 3: MACD crossover state
    if tech.macd > tech.macd_signal {
        card.add(
            "MACD",
            SignalSide::Bullish,
            1,
            format!("MACD {:.2} above signal {:.2}", tech.macd, tech.macd_signal),
        );
    } else {
        card.add(
            "MACD",
            SignalSide::Bearish,
            1,
            format!("MACD {:.2} at/below signal {:.2}", tech.macd, tech.macd_signal),
        );
    }

    // Rule 4: Put/call ratio, only when the option leg is present
    if let Some(oc) = options {
        if oc.pcr_oi > config::PCR_BULLISH {
            card.add("PCR", SignalSide::Bullish, 2, format!("PCR {:.2} put writers dominant", oc.pcr_oi));
        } else if oc.pcr_oi < config::PCR_BEARISH {
            card.add("PCR", SignalSide::Bearish, 2, format!("PCR {:.2} call writers dominant", oc.pcr_oi));
        }
    }

    card
}

pub fn classify(score_diff: i32) -> Bias {
    if score_diff > config::BIAS_SCORE_THRESHOLD {
        Bias::Bullish
    } else if score_diff < -config::BIAS_SCORE_THRESHOLD {
        Bias::Bearish
    } else {
        Bias::Sideways
    }
}

pub fn confidence_for(score_diff: i32) -> Confidence {
    if score_diff.abs() >= config::HIGH_CONFIDENCE_SCORE {
        Confidence::High
    } else {
        Confidence::Medium
    }
}

// -----------------------------------------------
// LEVELS
// -----------------------------------------------

/// Round down to the strike grid
pub fn floor_to_strike(value: f64) -> f64 {
    (value / config::STRIKE_STEP).floor() * config::STRIKE_STEP
}

/// Truncate to the strike grid (integer division semantics)
pub fn truncate_to_strike(value: f64) -> f64 {
    (value / config::STRIKE_STEP).trunc() * config::STRIKE_STEP
}

fn trade_levels(bias: Bias, tech: &TechnicalSnapshot, options: Option<&OptionChainAnalytics>) -> TradeLevels {
    let price = tech.current_price;

    match bias {
        Bias::Bullish => TradeLevels {
            entry_low: tech.support,
            entry_high: price,
            target_1: tech.resistance,
            target_2: options
                .map(|oc| oc.max_call_oi_strike)
                .unwrap_or(price + config::FALLBACK_TARGET_OFFSET),
            stop_loss: tech.support - config::STOP_LOSS_BUFFER,
        },
        Bias::Bearish => TradeLevels {
            entry_low: price,
            entry_high: tech.resistance,
            target_1: tech.support,
            target_2: options
                .map(|oc| oc.max_put_oi_strike)
                .unwrap_or(price - config::FALLBACK_TARGET_OFFSET),
            stop_loss: tech.resistance + config::STOP_LOSS_BUFFER,
        },
        Bias::Sideways => TradeLevels {
            entry_low: tech.support,
            entry_high: tech.resistance,
            target_1: tech.resistance,
            target_2: tech.support,
            stop_loss: tech.support - config::STOP_LOSS_BUFFER,
        },
    }
}

pub fn iron_condor(support: f64, resistance: f64) -> IronCondor {
    let sell_call = floor_to_strike(resistance);
    let sell_put = floor_to_strike(support);

    IronCondor {
        sell_call,
        buy_call: sell_call + config::STRIKE_STEP,
        sell_put,
        buy_put: sell_put - config::STRIKE_STEP,
        profit_low: support,
        profit_high: resistance,
    }
}

fn option_trade(bias: Bias, price: f64) -> Option<OptionTrade> {
    let atm = truncate_to_strike(price);

    match bias {
        Bias::Bullish => Some(OptionTrade {
            kind: OptionKind::Call,
            strike: atm + config::STRIKE_STEP,
        }),
        Bias::Bearish => Some(OptionTrade {
            kind: OptionKind::Put,
            strike: atm - config::STRIKE_STEP,
        }),
        Bias::Sideways => None,
    }
}

// -----------------------------------------------
// SYNTHESIS
// -----------------------------------------------

/// Combine the technical snapshot and (optional) option analytics into a bias.
/// Pure and total: the same inputs always give the same result.
pub fn synthesize_bias(tech: &TechnicalSnapshot, options: Option<&OptionChainAnalytics>) -> BiasResult {
    let card = score_signals(tech, options);
    let score_diff = card.bullish - card.bearish;
    let bias = classify(score_diff);

    BiasResult {
        bias,
        confidence: confidence_for(score_diff),
        bullish_score: card.bullish,
        bearish_score: card.bearish,
        score_diff,
        levels: trade_levels(bias, tech, options),
        iron_condor: (bias == Bias::Sideways).then(|| iron_condor(tech.support, tech.resistance)),
        option_trade: option_trade(bias, tech.current_price),
        signals: card.signals,
    }
}
