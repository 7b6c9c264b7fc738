//! Sales Insights - Sales CSV cleaning, statistics & exploratory charts

use anyhow::{Context, Result};
use clap::Parser;
use sales_insights::{Args, SalesAnalysis};
use tracing::{debug, info};

fn setup_logging(log_level: &str) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sales_insights={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(&args.log_level);

    let config = args.resolve().context("Failed to resolve configuration")?;
    let analysis = SalesAnalysis::new(config);

    let stdout = std::io::stdout();
    let outcome = analysis
        .run(&mut stdout.lock())
        .with_context(|| format!("Analysis of {} failed", analysis.config().input.display()))?;

    info!(
        "Rendered {} charts into {}",
        outcome.charts.len(),
        analysis.config().output_dir.display()
    );
    Ok(())
}
