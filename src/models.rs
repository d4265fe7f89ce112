use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// -----------------------------------------------
// NSE WIRE FORMAT
// -----------------------------------------------

/// Main response structure from NSE option chain API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionChain {
    pub records: Records,
}

/// Records section containing timestamp, underlying value, and all strike data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Records {
    #[serde(default)]
    pub timestamp: Option<String>,

    #[serde(rename = "underlyingValue", default)]
    pub underlying_value: Option<f64>,

    #[serde(default)]
    pub data: Vec<OptionData>,
}

/// Option data for each strike price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionData {
    #[serde(rename = "expiryDates", default)]
    pub expiry_date: Option<String>,

    #[serde(rename = "strikePrice", default)]
    pub strike_price: Option<f64>,

    #[serde(rename = "CE", default)]
    pub call: Option<OptionDetail>,

    #[serde(rename = "PE", default)]
    pub put: Option<OptionDetail>,
}

/// Detailed option information (CE or PE)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionDetail {
    #[serde(rename = "openInterest", default)]
    pub open_interest: Option<f64>,

    #[serde(rename = "changeinOpenInterest", default)]
    pub change_in_oi: Option<f64>,

    #[serde(rename = "lastPrice", default)]
    pub last_price: Option<f64>,

    #[serde(rename = "totalTradedVolume", default)]
    pub total_traded_volume: Option<f64>,
}

// -----------------------------------------------
// OPTION CHAIN SNAPSHOT
// -----------------------------------------------

/// One strike of the weekly chain, missing legs already zeroed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeRecord {
    pub strike: f64,
    pub call_last_price: f64,
    pub call_oi: f64,
    pub call_volume: f64,
    pub put_last_price: f64,
    pub put_oi: f64,
    pub put_volume: f64,
}

impl StrikeRecord {
    pub fn total_oi(&self) -> f64 {
        self.call_oi + self.put_oi
    }
}

/// Option chain for a single expiry, strikes sorted ascending
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionChainSnapshot {
    pub expiry: NaiveDate,
    pub underlying_value: f64,
    pub timestamp: Option<String>,
    pub strikes: Vec<StrikeRecord>,
}

impl OptionChainSnapshot {
    pub fn is_empty(&self) -> bool {
        self.strikes.is_empty()
    }
}

// -----------------------------------------------
// PRICE HISTORY
// -----------------------------------------------

/// One daily OHLC row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}
