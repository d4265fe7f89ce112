use chrono::NaiveDate;
use nse_bias_report::commands::run_analysis;
use nse_bias_report::models::PriceBar;
use nse_bias_report::report::{render_report, render_subject, ReportContext};
use nse_bias_report::rules::{synthesize_bias, Bias};
use nse_bias_report::TechnicalSnapshot;

#[cfg(test)]
mod tests {
    use super::*;

    fn technicals(rsi: f64, macd: f64, signal: f64) -> TechnicalSnapshot {
        TechnicalSnapshot {
            current_price: 25_100.0,
            sma_20: Some(25_000.0),
            sma_50: Some(24_900.0),
            sma_200: Some(24_100.0),
            rsi,
            macd,
            macd_signal: signal,
            support: 24_820.0,
            resistance: 25_380.0,
        }
    }

    fn bars(count: usize) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        (0..count)
            .map(|i| {
                // Accelerating rise keeps MACD clearly above its signal
                let x = i as f64;
                let close = 20_000.0 + 2.0 * x + 0.05 * x * x;
                PriceBar {
                    date: start + chrono::Duration::days(i as i64),
                    open: close - 10.0,
                    high: close + 40.0,
                    low: close - 40.0,
                    close,
                }
            })
            .collect()
    }

    fn render(tech: &TechnicalSnapshot, run_log_url: &str) -> (String, String, Bias) {
        let bias = synthesize_bias(tech, None);
        let ctx = ReportContext {
            symbol: "NIFTY",
            generated_at: NaiveDate::from_ymd_opt(2026, 10, 17)
                .unwrap()
                .and_hms_opt(9, 15, 0)
                .unwrap(),
            expiry: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            days_to_expiry: 3,
            technicals: tech,
            options: None,
            bias: &bias,
            run_log_url,
        };
        (render_subject(&ctx), render_report(&ctx), bias.bias)
    }

    #[test]
    fn test_missing_options_render_neutral_pcr() {
        let (_, html, _) = render(&technicals(50.0, 1.0, 0.5), "#");
        assert!(html.contains("N/A &middot; Neutral"));
        assert!(html.contains("Option chain data unavailable"));
    }

    #[test]
    fn test_placeholder_run_link() {
        let (_, html, _) = render(&technicals(50.0, 1.0, 0.5), "#");
        assert!(html.contains("href=\"#\""));

        let (_, html, _) = render(
            &technicals(50.0, 1.0, 0.5),
            "https://github.com/acme/bias/actions/runs/7",
        );
        assert!(html.contains("https://github.com/acme/bias/actions/runs/7"));
    }

    #[test]
    fn test_iron_condor_block_only_for_sideways() {
        let (_, html, bias) = render(&technicals(75.0, 0.5, 1.0), "#");
        assert_eq!(bias, Bias::Sideways);
        assert!(html.contains("Iron Condor Setup"));
        assert!(html.contains("25350 CE"));

        let (_, html, bias) = render(&technicals(50.0, 1.0, 0.5), "#");
        assert_eq!(bias, Bias::Bullish);
        assert!(!html.contains("Iron Condor Setup"));
        assert!(html.contains("Buy 25150 CE"));
    }

    #[test]
    fn test_subject_carries_bias() {
        let (subject, _, _) = render(&technicals(50.0, 1.0, 0.5), "#");
        assert_eq!(subject, "NIFTY Market Bias: BULLISH (HIGH) - 17 Oct 2026 09:15");
    }

    #[test]
    fn test_pipeline_without_price_history_aborts() {
        assert!(run_analysis(&[], None).is_none());
    }

    #[test]
    fn test_pipeline_on_uptrend() {
        let history = bars(250);
        let analysis = run_analysis(&history, None).unwrap();

        assert!(analysis.options.is_none());
        assert_eq!(analysis.technicals.current_price, history[249].close);
        assert!(analysis.technicals.sma_200.is_some());
        // Steady rise: price above every average, no losses, MACD above signal
        assert_eq!(analysis.technicals.rsi, 100.0);
        assert_eq!(analysis.bias.bias, Bias::Bullish);
        assert!(analysis.technicals.support < analysis.technicals.resistance);
    }

    #[test]
    fn test_pipeline_short_history_leaves_long_average_undefined() {
        let history = bars(30);
        let analysis = run_analysis(&history, None).unwrap();

        assert!(analysis.technicals.sma_20.is_some());
        assert!(analysis.technicals.sma_50.is_none());
        assert!(analysis.technicals.sma_200.is_none());
    }
}
