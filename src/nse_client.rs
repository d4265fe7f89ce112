use crate::config;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::{OptionChain, OptionChainSnapshot, OptionData, StrikeRecord};
use chrono::{
    DateTime, Datelike, Duration as ChronoDuration, FixedOffset, Local, NaiveDate, NaiveDateTime,
    Timelike, Utc, Weekday,
};
use rand::{seq::SliceRandom, thread_rng};
use reqwest::{header, Client};
use std::time::Duration;
use tracing::{debug, info, warn};

// -----------------------------------------------
// WEEKLY EXPIRY SELECTION
// -----------------------------------------------

/// Wall-clock time at the exchange for a UTC instant
pub fn to_exchange_time(instant: DateTime<Utc>) -> NaiveDateTime {
    match FixedOffset::east_opt(config::EXCHANGE_UTC_OFFSET_SECS) {
        Some(ist) => instant.with_timezone(&ist).naive_local(),
        None => instant.with_timezone(&Local).naive_local(),
    }
}

pub fn exchange_now() -> NaiveDateTime {
    to_exchange_time(Utc::now())
}

/// Next Tuesday expiry as seen at `now` (exchange time).
/// Tuesday before 15:30 is today's expiry, at/after 15:30 the following week's.
pub fn next_weekly_expiry(now: NaiveDateTime) -> NaiveDate {
    let today = now.date();
    let target = Weekday::Tue.num_days_from_monday();
    let current = today.weekday().num_days_from_monday();
    let mut days_ahead = (target + 7 - current) % 7;

    let past_cutoff = (now.hour(), now.minute())
        >= (config::EXPIRY_CUTOFF_HOUR, config::EXPIRY_CUTOFF_MINUTE);
    if days_ahead == 0 && past_cutoff {
        days_ahead = 7;
    }

    today + ChronoDuration::days(days_ahead as i64)
}

/// Calendar days remaining until expiry (0 on expiry day)
pub fn days_to_expiry(expiry: NaiveDate, today: NaiveDate) -> i64 {
    (expiry - today).num_days()
}

pub fn format_expiry(expiry: NaiveDate) -> String {
    expiry.format(config::NSE_EXPIRY_FORMAT).to_string()
}

// -----------------------------------------------
// RESPONSE PARSING
// -----------------------------------------------

/// Parse an option-chain-v3 body into a snapshot for `expiry`.
/// Rows without a strike are dropped, absent CE/PE legs count as zero.
pub fn parse_option_chain(text: &str, expiry: NaiveDate) -> AnalyzerResult<OptionChainSnapshot> {
    let chain: OptionChain = serde_json::from_str(text)?;

    let underlying_value = chain
        .records
        .underlying_value
        .ok_or_else(|| AnalyzerError::Parse("records.underlyingValue missing".to_string()))?;

    let mut strikes: Vec<StrikeRecord> = chain
        .records
        .data
        .iter()
        .filter(|opt| matches_expiry(opt, expiry))
        .filter_map(to_strike_record)
        .collect();

    if strikes.is_empty() {
        return Err(AnalyzerError::EmptyPayload("option chain"));
    }

    strikes.sort_by(|a, b| a.strike.total_cmp(&b.strike));

    Ok(OptionChainSnapshot {
        expiry,
        underlying_value,
        timestamp: chain.records.timestamp,
        strikes,
    })
}

/// Rows carrying a different expiry are ignored; rows without one are trusted
fn matches_expiry(opt: &OptionData, expiry: NaiveDate) -> bool {
    match opt.expiry_date.as_deref() {
        Some(s) => match NaiveDate::parse_from_str(s, config::NSE_EXPIRY_FORMAT) {
            Ok(date) => date == expiry,
            Err(_) => true,
        },
        None => true,
    }
}

fn to_strike_record(opt: &OptionData) -> Option<StrikeRecord> {
    let strike = opt.strike_price?;
    let call = opt.call.clone().unwrap_or_default();
    let put = opt.put.clone().unwrap_or_default();

    Some(StrikeRecord {
        strike,
        call_last_price: call.last_price.unwrap_or(0.0),
        call_oi: call.open_interest.unwrap_or(0.0),
        call_volume: call.total_traded_volume.unwrap_or(0.0),
        put_last_price: put.last_price.unwrap_or(0.0),
        put_oi: put.open_interest.unwrap_or(0.0),
        put_volume: put.total_traded_volume.unwrap_or(0.0),
    })
}

// -----------------------------------------------
// CLIENT WRAPPER
// -----------------------------------------------
pub struct NSEClient {
    client: Client,
}

impl NSEClient {
    pub fn new() -> AnalyzerResult<Self> {
        Ok(Self {
            client: build_client()?,
        })
    }

    /// Hit the homepage so NSE hands out session cookies, then pause briefly
    async fn warmup(&self) -> AnalyzerResult<()> {
        self.client
            .get(config::NSE_BASE_URL)
            .header(header::ACCEPT, config::HEADER_ACCEPT_HTML)
            .send()
            .await?;

        tokio::time::sleep(Duration::from_millis(config::WARMUP_DELAY_MS)).await;
        Ok(())
    }

    /// Single GET that insists on a JSON body. No retries.
    async fn fetch_json(&self, url: &str) -> AnalyzerResult<String> {
        let res = self
            .client
            .get(url)
            .header(header::REFERER, config::HEADER_REFERER)
            .header("X-Requested-With", config::HEADER_X_REQUESTED_WITH)
            .send()
            .await?;

        let status = res.status();
        debug!(url, status = status.as_u16(), "NSE response");

        if status.is_success() {
            let text = res.text().await?;

            let trimmed = text.trim();
            if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
                let preview: String = text.chars().take(200).collect();
                return Err(AnalyzerError::NonJsonResponse(preview));
            }

            Ok(text)
        } else {
            let body = res.text().await.unwrap_or_default();
            Err(AnalyzerError::Status {
                status: status.as_u16(),
                preview: body.chars().take(200).collect(),
            })
        }
    }

    async fn try_fetch_option_chain(
        &self,
        symbol: &str,
        expiry: NaiveDate,
    ) -> AnalyzerResult<OptionChainSnapshot> {
        self.warmup().await?;

        let url = config::nse_option_chain_url("Indices", symbol, &format_expiry(expiry));
        let text = self.fetch_json(&url).await?;
        parse_option_chain(&text, expiry)
    }

    /// Fetch the weekly chain for `symbol`. Every failure degrades to `None`.
    pub async fn fetch_option_chain(
        &self,
        symbol: &str,
        expiry: NaiveDate,
    ) -> Option<OptionChainSnapshot> {
        match self.try_fetch_option_chain(symbol, expiry).await {
            Ok(snapshot) => {
                info!(
                    symbol,
                    expiry = %format_expiry(expiry),
                    strikes = snapshot.strikes.len(),
                    underlying = snapshot.underlying_value,
                    "Option chain fetched"
                );
                Some(snapshot)
            }
            Err(e) => {
                warn!(symbol, expiry = %format_expiry(expiry), error = %e, "Option chain unavailable");
                None
            }
        }
    }
}

// -----------------------------------------------
// HTTP CLIENT BUILDER
// -----------------------------------------------
fn build_client() -> AnalyzerResult<Client> {
    let mut headers = header::HeaderMap::new();

    let lang = config::ACCEPT_LANGUAGES
        .choose(&mut thread_rng())
        .copied()
        .unwrap_or("en-US,en;q=0.9");
    headers.insert(header::ACCEPT_LANGUAGE, header::HeaderValue::from_static(lang));
    headers.insert(header::ACCEPT, header::HeaderValue::from_static("*/*"));

    Client::builder()
        .default_headers(headers)
        .cookie_store(true)
        .gzip(true)
        .user_agent(config::USER_AGENT)
        .timeout(config::HTTP_TIMEOUT)
        .build()
        .map_err(|e| AnalyzerError::Request(format!("Failed to build HTTP client: {}", e)))
}
