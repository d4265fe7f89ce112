use anyhow::Result;
use nse_bias_report::commands::ReportCommand;
use nse_bias_report::logging;
use tracing::{error, warn};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        logging::init_console_logging();
        warn!(error = %e, "File logging unavailable, logging to console only");
    }

    if let Err(e) = ReportCommand::run().await {
        error!(error = %e, "Report run failed");
    }

    Ok(())
}
