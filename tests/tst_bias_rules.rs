use nse_bias_report::processor::OptionChainAnalytics;
use nse_bias_report::rules::{synthesize_bias, Bias, Confidence, OptionKind};
use nse_bias_report::TechnicalSnapshot;

#[cfg(test)]
mod tests {
    use super::*;

    fn technicals(price: f64, sma: f64, rsi: f64, macd: f64, signal: f64) -> TechnicalSnapshot {
        TechnicalSnapshot {
            current_price: price,
            sma_20: Some(sma),
            sma_50: Some(sma),
            sma_200: Some(sma),
            rsi,
            macd,
            macd_signal: signal,
            support: 24_820.0,
            resistance: 25_380.0,
        }
    }

    fn analytics(pcr_oi: f64) -> OptionChainAnalytics {
        OptionChainAnalytics {
            total_call_oi: 1000.0,
            total_put_oi: 1000.0 * pcr_oi,
            pcr_oi,
            pcr_volume: 1.0,
            max_call_oi_strike: 25_500.0,
            max_call_oi: 400.0,
            max_put_oi_strike: 24_800.0,
            max_put_oi: 350.0,
            max_pain_strike: 25_100.0,
            atm_strike: 25_100.0,
            top_oi_strikes: Vec::new(),
        }
    }

    #[test]
    fn test_all_bullish_without_options_is_high_confidence() {
        let tech = technicals(100.0, 90.0, 50.0, 1.0, 0.5);
        let result = synthesize_bias(&tech, None);

        assert_eq!(result.bullish_score, 4);
        assert_eq!(result.bearish_score, 0);
        assert_eq!(result.score_diff, 4);
        assert_eq!(result.bias, Bias::Bullish);
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn test_overbought_and_macd_below_is_sideways() {
        let tech = technicals(100.0, 90.0, 75.0, 0.5, 1.0);
        let result = synthesize_bias(&tech, None);

        assert_eq!(result.bullish_score, 3);
        assert_eq!(result.bearish_score, 2);
        assert_eq!(result.score_diff, 1);
        assert_eq!(result.bias, Bias::Sideways);
        assert_eq!(result.confidence, Confidence::Medium);
    }

    #[test]
    fn test_oversold_counts_double() {
        let tech = technicals(100.0, 110.0, 25.0, 0.5, 1.0);
        let result = synthesize_bias(&tech, None);

        // 3 bearish SMA + 1 bearish MACD vs 2 bullish RSI
        assert_eq!(result.bullish_score, 2);
        assert_eq!(result.bearish_score, 4);
        assert_eq!(result.bias, Bias::Sideways);
    }

    #[test]
    fn test_high_pcr_adds_two_bullish() {
        let tech = technicals(100.0, 90.0, 50.0, 0.5, 1.0);
        let without = synthesize_bias(&tech, None);
        let with = synthesize_bias(&tech, Some(&analytics(1.35)));

        assert_eq!(with.bullish_score, without.bullish_score + 2);
        assert_eq!(with.bearish_score, without.bearish_score);
    }

    #[test]
    fn test_low_pcr_adds_two_bearish() {
        let tech = technicals(100.0, 110.0, 50.0, 0.5, 1.0);
        let result = synthesize_bias(&tech, Some(&analytics(0.55)));

        assert_eq!(result.bearish_score, 6);
        assert_eq!(result.bullish_score, 0);
        assert_eq!(result.bias, Bias::Bearish);
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn test_neutral_pcr_adds_nothing() {
        let tech = technicals(100.0, 90.0, 50.0, 1.0, 0.5);
        let result = synthesize_bias(&tech, Some(&analytics(1.0)));
        assert_eq!(result.bullish_score, 4);
        assert_eq!(result.bearish_score, 0);
    }

    #[test]
    fn test_rsi_band_edges_add_nothing() {
        // 3 bullish SMA + 1 bullish MACD before RSI
        let at_overbought = synthesize_bias(&technicals(100.0, 90.0, 70.0, 1.0, 0.5), None);
        assert_eq!((at_overbought.bullish_score, at_overbought.bearish_score), (4, 0));

        let at_oversold = synthesize_bias(&technicals(100.0, 90.0, 30.0, 1.0, 0.5), None);
        assert_eq!((at_oversold.bullish_score, at_oversold.bearish_score), (4, 0));

        let above = synthesize_bias(&technicals(100.0, 90.0, 70.0001, 1.0, 0.5), None);
        assert_eq!((above.bullish_score, above.bearish_score), (4, 1));

        let below = synthesize_bias(&technicals(100.0, 90.0, 29.999, 1.0, 0.5), None);
        assert_eq!((below.bullish_score, below.bearish_score), (6, 0));
    }

    #[test]
    fn test_pcr_band_edges_add_nothing() {
        let tech = technicals(100.0, 90.0, 50.0, 1.0, 0.5);

        let at_high = synthesize_bias(&tech, Some(&analytics(1.2)));
        assert_eq!((at_high.bullish_score, at_high.bearish_score), (4, 0));

        let at_low = synthesize_bias(&tech, Some(&analytics(0.7)));
        assert_eq!((at_low.bullish_score, at_low.bearish_score), (4, 0));

        let above = synthesize_bias(&tech, Some(&analytics(1.2001)));
        assert_eq!((above.bullish_score, above.bearish_score), (6, 0));

        let below = synthesize_bias(&tech, Some(&analytics(0.6999)));
        assert_eq!((below.bullish_score, below.bearish_score), (4, 2));
    }

    #[test]
    fn test_bullish_levels_use_max_call_oi() {
        let tech = technicals(25_120.0, 24_900.0, 55.0, 10.0, 5.0);
        let result = synthesize_bias(&tech, Some(&analytics(1.0)));

        assert_eq!(result.bias, Bias::Bullish);
        assert_eq!(result.levels.entry_low, 24_820.0);
        assert_eq!(result.levels.entry_high, 25_120.0);
        assert_eq!(result.levels.target_1, 25_380.0);
        assert_eq!(result.levels.target_2, 25_500.0);
        assert_eq!(result.levels.stop_loss, 24_720.0);

        let trade = result.option_trade.unwrap();
        assert_eq!(trade.kind, OptionKind::Call);
        assert_eq!(trade.strike, 25_150.0);
    }

    #[test]
    fn test_bullish_levels_fallback_without_options() {
        let tech = technicals(25_120.0, 24_900.0, 55.0, 10.0, 5.0);
        let result = synthesize_bias(&tech, None);
        assert_eq!(result.levels.target_2, 25_320.0);
    }

    #[test]
    fn test_bearish_levels_mirror() {
        let tech = technicals(25_120.0, 25_400.0, 55.0, 1.0, 5.0);
        let with_options = synthesize_bias(&tech, Some(&analytics(1.0)));

        assert_eq!(with_options.bias, Bias::Bearish);
        assert_eq!(with_options.levels.entry_low, 25_120.0);
        assert_eq!(with_options.levels.entry_high, 25_380.0);
        assert_eq!(with_options.levels.target_1, 24_820.0);
        assert_eq!(with_options.levels.target_2, 24_800.0);
        assert_eq!(with_options.levels.stop_loss, 25_480.0);

        let trade = with_options.option_trade.unwrap();
        assert_eq!(trade.kind, OptionKind::Put);
        assert_eq!(trade.strike, 25_050.0);

        let without = synthesize_bias(&tech, None);
        assert_eq!(without.levels.target_2, 24_920.0);
    }

    #[test]
    fn test_iron_condor_only_when_sideways() {
        let sideways = synthesize_bias(&technicals(100.0, 90.0, 75.0, 0.5, 1.0), None);
        assert_eq!(sideways.bias, Bias::Sideways);
        let ic = sideways.iron_condor.unwrap();
        assert_eq!(ic.sell_call, 25_350.0);
        assert_eq!(ic.buy_call, 25_400.0);
        assert_eq!(ic.sell_put, 24_800.0);
        assert_eq!(ic.buy_put, 24_750.0);
        assert!(sideways.option_trade.is_none());

        let bullish = synthesize_bias(&technicals(100.0, 90.0, 50.0, 1.0, 0.5), None);
        assert!(bullish.iron_condor.is_none());

        let bearish = synthesize_bias(&technicals(100.0, 110.0, 50.0, 0.5, 1.0), None);
        assert_eq!(bearish.bias, Bias::Bearish);
        assert!(bearish.iron_condor.is_none());
    }

    #[test]
    fn test_synthesis_is_reproducible() {
        let tech = technicals(25_000.0, 24_950.0, 68.0, 3.0, 2.0);
        let oc = analytics(1.25);

        let first = synthesize_bias(&tech, Some(&oc));
        for _ in 0..10 {
            assert_eq!(synthesize_bias(&tech, Some(&oc)), first);
        }
    }

    #[test]
    fn test_nan_inputs_do_not_panic() {
        let tech = TechnicalSnapshot {
            current_price: f64::NAN,
            sma_20: Some(f64::NAN),
            sma_50: None,
            sma_200: None,
            rsi: f64::NAN,
            macd: f64::NAN,
            macd_signal: 0.0,
            support: f64::NAN,
            resistance: f64::NAN,
        };
        let result = synthesize_bias(&tech, None);

        // Only the MACD fallback fires
        assert_eq!(result.bearish_score, 1);
        assert_eq!(result.bullish_score, 0);
        assert_eq!(result.bias, Bias::Sideways);
    }
}
