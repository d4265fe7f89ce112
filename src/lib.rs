pub mod commands;
pub mod config;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod mailer;
pub mod models;
pub mod nse_client;
pub mod price_client;
pub mod processor;
pub mod report;
pub mod rules;

// Re-exports (public API)
pub use error::{AnalyzerError, AnalyzerResult};
pub use indicators::{compute_technicals, TechnicalSnapshot};
pub use models::{OptionChainSnapshot, PriceBar, StrikeRecord};
pub use nse_client::{next_weekly_expiry, parse_option_chain, NSEClient};
pub use processor::{analyze_option_chain, OptionChainAnalytics, OiStrike};
pub use rules::{synthesize_bias, Bias, BiasResult, Confidence, IronCondor, OptionKind, TradeLevels};
