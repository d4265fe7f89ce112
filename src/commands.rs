use crate::config;
use crate::indicators::{compute_technicals, TechnicalSnapshot};
use crate::mailer::{self, MailConfig};
use crate::models::{OptionChainSnapshot, PriceBar};
use crate::nse_client::{days_to_expiry, exchange_now, format_expiry, next_weekly_expiry, NSEClient};
use crate::price_client::PriceClient;
use crate::processor::{analyze_option_chain, OptionChainAnalytics};
use crate::report::{render_report, render_subject, ReportContext};
use crate::rules::{synthesize_bias, BiasResult};

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Computed stages of one run, handed to rendering
#[derive(Debug, Clone)]
pub struct Analysis {
    pub technicals: TechnicalSnapshot,
    pub options: Option<OptionChainAnalytics>,
    pub bias: BiasResult,
}

/// Pure part of the pipeline. `None` when there is no price history to work from.
pub fn run_analysis(bars: &[PriceBar], chain: Option<&OptionChainSnapshot>) -> Option<Analysis> {
    let technicals = compute_technicals(bars)?;
    let options = chain.and_then(analyze_option_chain);
    let bias = synthesize_bias(&technicals, options.as_ref());

    Some(Analysis {
        technicals,
        options,
        bias,
    })
}

/// Report command - fetch, analyze, render and deliver, one step at a time
pub struct ReportCommand;

impl ReportCommand {
    pub async fn run() -> Result<()> {
        println!("{}", "=".repeat(60).blue());
        println!("{}", "NSE Weekly Bias Report".green().bold());
        println!("{}", "=".repeat(60).blue());
        println!();

        let symbol = config::get_symbol();
        let ticker = config::get_price_ticker();
        let now = exchange_now();

        if config::is_ci_environment() {
            info!(symbol = %symbol, ticker = %ticker, "Running in CI environment");
        }

        // Step 1: Price history (mandatory signal)
        println!("{}", "Step 1: Fetching price history...".cyan());
        let price_client = match PriceClient::new() {
            Ok(client) => client,
            Err(e) => {
                error!(error = %e, "Price client unavailable - skipping report");
                println!("{} Price client unavailable, no report sent", "✗".red());
                return Ok(());
            }
        };
        let bars = price_client.fetch_history(&ticker).await;
        println!("{} {} daily bars", "✓".green(), bars.len());

        // Step 2: Option chain for the weekly expiry (optional signal)
        let expiry = next_weekly_expiry(now);
        println!(
            "{} {} {}",
            "Step 2: Fetching option chain for".cyan(),
            symbol.yellow(),
            format_expiry(expiry).yellow()
        );
        let chain = match NSEClient::new() {
            Ok(client) => client.fetch_option_chain(&symbol, expiry).await,
            Err(e) => {
                warn!(error = %e, "NSE client unavailable");
                None
            }
        };
        match &chain {
            Some(c) => println!("{} {} strikes", "✓".green(), c.strikes.len()),
            None => println!("{} Option chain unavailable, continuing without it", "⚠".yellow()),
        }
        println!();

        // Step 3: Indicators, analytics, bias
        println!("{}", "Step 3: Computing bias...".cyan());
        let Some(analysis) = run_analysis(&bars, chain.as_ref()) else {
            error!(ticker = %ticker, "No price history - skipping report");
            println!("{} No price history, no report sent", "✗".red());
            return Ok(());
        };

        let bias = &analysis.bias;
        info!(
            bias = %bias.bias,
            confidence = %bias.confidence,
            bullish = bias.bullish_score,
            bearish = bias.bearish_score,
            option_data = analysis.options.is_some(),
            "Bias computed"
        );
        if let Ok(json) = serde_json::to_string(bias) {
            debug!(result = %json, "Bias result");
        }
        println!(
            "{} {} ({}) bullish={} bearish={}",
            "✓".green(),
            bias.bias.to_string().bold(),
            bias.confidence,
            bias.bullish_score,
            bias.bearish_score
        );
        println!();

        // Step 4: Render
        let run_log_url = config::get_run_log_url();
        let ctx = ReportContext {
            symbol: &symbol,
            generated_at: now,
            expiry,
            days_to_expiry: days_to_expiry(expiry, now.date()),
            technicals: &analysis.technicals,
            options: analysis.options.as_ref(),
            bias,
            run_log_url: &run_log_url,
        };
        let subject = render_subject(&ctx);
        let html = render_report(&ctx);

        // Step 5: Deliver
        if config::is_dry_run() {
            println!("{}", "Step 4: Dry run - writing report locally...".cyan());
            match Self::write_dry_run(Path::new("."), &html, bias) {
                Ok(()) => println!(
                    "{} Saved {} and {}",
                    "✓".green(),
                    config::DRY_RUN_HTML_PATH,
                    config::DRY_RUN_JSON_PATH
                ),
                Err(e) => {
                    error!(error = %format!("{e:#}"), "Failed to write dry run output");
                    println!("{} {:#}", "✗".red(), e);
                }
            }
        } else {
            Self::deliver(&subject, &html).await;
        }

        println!();
        println!("{}", "=".repeat(60).blue());
        println!("{}", "Done!".green().bold());
        println!("{}", "=".repeat(60).blue());

        Ok(())
    }

    /// Send the email; any failure is logged and ends the run
    async fn deliver(subject: &str, html: &str) {
        println!("{}", "Step 4: Sending report...".cyan());

        let mail_config = match MailConfig::from_env() {
            Ok(cfg) => cfg,
            Err(e) => {
                error!(error = %e, "Email not configured");
                println!("{} {}", "✗".red(), e);
                return;
            }
        };

        match mailer::send_report(&mail_config, subject, html).await {
            Ok(()) => println!("{} Sent to {}", "✓".green(), mail_config.recipient_list()),
            Err(e) => {
                error!(error = %e, "Failed to send report");
                println!("{} Failed to send report: {}", "✗".red(), e);
            }
        }
    }

    /// Write the rendered report and bias JSON into `dir`
    pub fn write_dry_run(dir: &Path, html: &str, bias: &BiasResult) -> Result<()> {
        let html_path = dir.join(config::DRY_RUN_HTML_PATH);
        let json_path = dir.join(config::DRY_RUN_JSON_PATH);

        std::fs::write(&html_path, html)
            .with_context(|| format!("Failed to write {}", html_path.display()))?;
        std::fs::write(&json_path, serde_json::to_string_pretty(bias)?)
            .with_context(|| format!("Failed to write {}", json_path.display()))?;

        info!(
            html = %html_path.display(),
            json = %json_path.display(),
            "Dry run output written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bias() -> BiasResult {
        let tech = TechnicalSnapshot {
            current_price: 25_100.0,
            sma_20: Some(25_000.0),
            sma_50: None,
            sma_200: None,
            rsi: 50.0,
            macd: 1.0,
            macd_signal: 0.5,
            support: 24_800.0,
            resistance: 25_400.0,
        };
        synthesize_bias(&tech, None)
    }

    #[test]
    fn test_write_dry_run_outputs() {
        let dir = std::env::temp_dir().join(format!("nse-bias-dry-run-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        ReportCommand::write_dry_run(&dir, "<p>report</p>", &bias()).unwrap();

        let html = std::fs::read_to_string(dir.join(config::DRY_RUN_HTML_PATH)).unwrap();
        assert_eq!(html, "<p>report</p>");
        let json = std::fs::read_to_string(dir.join(config::DRY_RUN_JSON_PATH)).unwrap();
        assert!(json.contains("\"bias\""));
    }

    #[test]
    fn test_write_dry_run_failure_is_returned() {
        let missing = std::env::temp_dir()
            .join(format!("nse-bias-missing-{}", std::process::id()))
            .join("nested");

        let err = ReportCommand::write_dry_run(&missing, "<p/>", &bias()).unwrap_err();
        assert!(format!("{err:#}").contains(config::DRY_RUN_HTML_PATH));
    }
}
