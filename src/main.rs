use clap::Parser;
use log::{debug, error, info};
use std::process::ExitCode;

use dataset_collector::{init_logging, Args, Collector, Config};

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize the logger
    match init_logging(&args.log_dir) {
        Ok(path) => info!("Logging to {}", path.display()),
        Err(e) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .init();
            error!("Console logging only: {}", e);
        }
    }

    let mut config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    info!("Loaded config file {}", args.config.display());
    debug!("{}", serde_json::to_string(&config).unwrap_or_default());

    let collector = match Collector::new(config) {
        Ok(collector) => collector,
        Err(e) => {
            error!("Failed to start collector: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match collector.with_progress(!args.no_progress).collect_all() {
        Ok(report) => {
            info!(
                "Collection finished: {} collected, {} failed, {} sources skipped",
                report.total_success(),
                report.total_failed(),
                report.skipped_sources
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to collect datasets: {}", e);
            ExitCode::FAILURE
        }
    }
}
