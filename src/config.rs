use std::time::Duration;

// -----------------------------------------------
// NSE API ENDPOINTS
// -----------------------------------------------
pub const NSE_BASE_URL: &str = "https://www.nseindia.com";

pub fn nse_option_chain_url(typ: &str, symbol: &str, expiry: &str) -> String {
    format!(
        "{}/api/option-chain-v3?type={}&symbol={}&expiry={}",
        NSE_BASE_URL,
        typ,
        urlencoding::encode(symbol),
        urlencoding::encode(expiry)
    )
}

/// Expiry format expected by the option-chain endpoint, e.g. "21-Oct-2026"
pub const NSE_EXPIRY_FORMAT: &str = "%d-%b-%Y";

// -----------------------------------------------
// PRICE HISTORY ENDPOINT
// -----------------------------------------------
pub const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
pub const PRICE_HISTORY_RANGE: &str = "1y";
pub const PRICE_HISTORY_INTERVAL: &str = "1d";

pub fn yahoo_chart_url(ticker: &str) -> String {
    format!(
        "{}/{}?range={}&interval={}",
        YAHOO_CHART_URL,
        urlencoding::encode(ticker),
        PRICE_HISTORY_RANGE,
        PRICE_HISTORY_INTERVAL
    )
}

// -----------------------------------------------
// DEFAULTS
// -----------------------------------------------
pub const DEFAULT_SYMBOL: &str = "NIFTY";
pub const DEFAULT_PRICE_TICKER: &str = "^NSEI";

// -----------------------------------------------
// HTTP CLIENT CONFIG
// -----------------------------------------------
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                               AppleWebKit/537.36 (KHTML, like Gecko) \
                               Chrome/131.0.0.0 Safari/537.36";

pub const ACCEPT_LANGUAGES: &[&str] = &[
    "en-US,en;q=0.9",
    "en-GB,en;q=0.8",
    "en-IN,en;q=0.9",
];

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

// -----------------------------------------------
// SESSION WARMUP
// -----------------------------------------------
pub const WARMUP_DELAY_MS: u64 = 1000;

// -----------------------------------------------
// HTTP HEADERS
// -----------------------------------------------
pub const HEADER_REFERER: &str = "https://www.nseindia.com/option-chain";
pub const HEADER_X_REQUESTED_WITH: &str = "XMLHttpRequest";
pub const HEADER_ACCEPT_HTML: &str = "text/html,application/xhtml+xml";

// -----------------------------------------------
// WEEKLY EXPIRY
// -----------------------------------------------
/// Weekly index options settle at the close; after this the next week's chain applies
pub const EXPIRY_CUTOFF_HOUR: u32 = 15;
pub const EXPIRY_CUTOFF_MINUTE: u32 = 30;
/// IST, UTC+05:30
pub const EXCHANGE_UTC_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

// -----------------------------------------------
// ANALYTICS / SCORING THRESHOLDS
// -----------------------------------------------
pub const TOP_OI_STRIKES: usize = 5;

pub const SMA_SHORT: usize = 20;
pub const SMA_MEDIUM: usize = 50;
pub const SMA_LONG: usize = 200;
pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const SUPPORT_RESISTANCE_WINDOW: usize = 60;
pub const SUPPORT_PERCENTILE: f64 = 10.0;
pub const RESISTANCE_PERCENTILE: f64 = 90.0;

pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;
pub const PCR_BULLISH: f64 = 1.2;
pub const PCR_BEARISH: f64 = 0.7;
pub const BIAS_SCORE_THRESHOLD: i32 = 2;
pub const HIGH_CONFIDENCE_SCORE: i32 = 4;

pub const STRIKE_STEP: f64 = 50.0;
pub const STOP_LOSS_BUFFER: f64 = 100.0;
pub const FALLBACK_TARGET_OFFSET: f64 = 200.0;

// -----------------------------------------------
// EMAIL
// -----------------------------------------------
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const ENV_EMAIL_SENDER: &str = "NSE_EMAIL_SENDER";
pub const ENV_EMAIL_PASSWORD: &str = "NSE_EMAIL_PASSWORD";
pub const ENV_EMAIL_RECIPIENTS: &[&str] = &["NSE_EMAIL_RECIPIENT_1", "NSE_EMAIL_RECIPIENT_2"];

// -----------------------------------------------
// DRY RUN OUTPUT
// -----------------------------------------------
pub const DRY_RUN_HTML_PATH: &str = "bias_report.html";
pub const DRY_RUN_JSON_PATH: &str = "bias_result.json";

// -----------------------------------------------
// RUNTIME CONFIGURATION
// -----------------------------------------------

/// Get the option-chain symbol from environment or default to NIFTY
pub fn get_symbol() -> String {
    std::env::var("NSE_SYMBOL").unwrap_or_else(|_| DEFAULT_SYMBOL.to_string())
}

/// Get the price-history ticker from environment
pub fn get_price_ticker() -> String {
    std::env::var("NSE_PRICE_TICKER").unwrap_or_else(|_| DEFAULT_PRICE_TICKER.to_string())
}

pub fn get_smtp_host() -> String {
    std::env::var("NSE_SMTP_HOST").unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string())
}

/// Render and write the report locally instead of emailing it
pub fn is_dry_run() -> bool {
    matches!(
        std::env::var("NSE_DRY_RUN").as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Check if running in CI/automated environment
pub fn is_ci_environment() -> bool {
    std::env::var("CI").is_ok() || std::env::var("GITHUB_ACTIONS").is_ok()
}

/// Link to the CI run that produced the report, `#` when the context is incomplete
pub fn run_log_url(repository: Option<&str>, run_id: Option<&str>) -> String {
    match (repository, run_id) {
        (Some(repo), Some(run)) if !repo.is_empty() && !run.is_empty() => {
            format!("https://github.com/{}/actions/runs/{}", repo, run)
        }
        _ => "#".to_string(),
    }
}

pub fn get_run_log_url() -> String {
    let repository = std::env::var("GITHUB_REPOSITORY").ok();
    let run_id = std::env::var("GITHUB_RUN_ID").ok();
    run_log_url(repository.as_deref(), run_id.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_log_url() {
        assert_eq!(
            run_log_url(Some("acme/bias"), Some("42")),
            "https://github.com/acme/bias/actions/runs/42"
        );
        assert_eq!(run_log_url(None, Some("42")), "#");
        assert_eq!(run_log_url(Some("acme/bias"), None), "#");
        assert_eq!(run_log_url(Some(""), Some("42")), "#");
    }

    #[test]
    fn test_option_chain_url_encodes_expiry() {
        let url = nse_option_chain_url("Indices", "NIFTY", "21-Oct-2026");
        assert_eq!(
            url,
            "https://www.nseindia.com/api/option-chain-v3?type=Indices&symbol=NIFTY&expiry=21-Oct-2026"
        );
    }

    #[test]
    fn test_yahoo_url_encodes_caret() {
        assert!(yahoo_chart_url("^NSEI").contains("/%5ENSEI?range=1y&interval=1d"));
    }
}
