use crate::config;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::PriceBar;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

// -----------------------------------------------
// YAHOO CHART WIRE FORMAT
// -----------------------------------------------
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

/// Parse a chart response into daily bars, skipping rows with any null field
pub fn parse_chart(text: &str) -> AnalyzerResult<Vec<PriceBar>> {
    let response: ChartResponse = serde_json::from_str(text)?;

    if let Some(error) = response.chart.error {
        return Err(AnalyzerError::Parse(format!("{} - {}", error.code, error.description)));
    }

    let data = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or(AnalyzerError::EmptyPayload("price history"))?;

    let timestamps = data.timestamp.unwrap_or_default();
    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or(AnalyzerError::EmptyPayload("price history"))?;

    let bars: Vec<PriceBar> = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            let date = DateTime::from_timestamp(*ts, 0)?.date_naive();
            Some(PriceBar {
                date,
                open: quote.open.get(i).copied().flatten()?,
                high: quote.high.get(i).copied().flatten()?,
                low: quote.low.get(i).copied().flatten()?,
                close: quote.close.get(i).copied().flatten()?,
            })
        })
        .collect();

    if bars.is_empty() {
        return Err(AnalyzerError::EmptyPayload("price history"));
    }

    Ok(bars)
}

// -----------------------------------------------
// CLIENT
// -----------------------------------------------
pub struct PriceClient {
    client: Client,
}

impl PriceClient {
    pub fn new() -> AnalyzerResult<Self> {
        let client = Client::builder()
            .user_agent(config::USER_AGENT)
            .timeout(config::HTTP_TIMEOUT)
            .build()
            .map_err(|e| AnalyzerError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn try_fetch_history(&self, ticker: &str) -> AnalyzerResult<Vec<PriceBar>> {
        let res = self.client.get(config::yahoo_chart_url(ticker)).send().await?;

        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(AnalyzerError::Status {
                status: status.as_u16(),
                preview: text.chars().take(200).collect(),
            });
        }

        parse_chart(&text)
    }

    /// One year of daily bars for `ticker`; empty when the provider fails
    pub async fn fetch_history(&self, ticker: &str) -> Vec<PriceBar> {
        match self.try_fetch_history(ticker).await {
            Ok(bars) => {
                info!(ticker, bars = bars.len(), "Price history fetched");
                bars
            }
            Err(e) => {
                warn!(ticker, error = %e, "Price history unavailable");
                Vec::new()
            }
        }
    }
}
