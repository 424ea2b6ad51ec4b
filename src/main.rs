mod aligner;
mod analyzer;
mod config;
mod model;
mod parser;
mod pipeline;
mod report;
mod source;
mod storage;
mod utils;

use chrono::Utc;
use config::{START_DATE, config_path, load_config};
use source::YahooSource;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize logging; tables go to stdout, logs to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    // Optional runtime overrides; analysis parameters are fixed
    let config = match load_config(config_path()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            std::process::exit(1);
        }
    };

    let Some(start) = utils::parse_date(START_DATE) else {
        error!("Invalid start date constant: {}", START_DATE);
        std::process::exit(1);
    };
    let end = Utc::now().date_naive();

    let source = match YahooSource::new(&config) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    info!("Running analysis {} -> {}, output under {}", start, end, config.output_root.display());
    match pipeline::run(&source, &config, start, end).await {
        Ok(output) => {
            for path in &output.written {
                info!("Wrote {}", path.display());
            }
            info!(
                "Done: {} aligned dates, {} returns, {} instruments summarized",
                output.prices.len(),
                output.returns.len(),
                output.report.summaries.len()
            );
        }
        Err(e) => {
            error!("Analysis aborted: {}", e);
            std::process::exit(1);
        }
    }
}
