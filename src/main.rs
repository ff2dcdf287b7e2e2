//! Engagement Study - CLI entry point
//!
//! Runs the whole analysis once and exits; any load or parse failure aborts the run.

use anyhow::{Context, Result};
use clap::Parser;
use engagement_study::bootstrap;
use engagement_study::pipeline;
use engagement_study::report;
use engagement_study::settings::Settings;

fn main() -> Result<()> {
    let settings = Settings::parse();
    bootstrap::setup_logging(&settings.log_level);

    tracing::info!("Engagement Study v{} starting", env!("CARGO_PKG_VERSION"));

    let milestone = settings.milestone();
    let output = pipeline::run_from_sources(
        &settings.sources(),
        &settings.engagement_account_column,
        &milestone,
    )
    .context("Failed to prepare the source tables")?;

    let report = report::build_report(&output, &milestone, &settings.metrics);
    report::print_report(&report).context("Failed to print report")?;

    bootstrap::ensure_output_dir(&settings.output_dir).with_context(|| {
        format!("Failed to create {}", settings.output_dir.display())
    })?;

    let summary_path = settings.output_dir.join("summary.json");
    report::write_json(&report, &summary_path)?;
    tracing::info!(path = %summary_path.display(), "Wrote summary");

    if !settings.no_charts {
        let charts = report::render_charts(&report, &settings.output_dir, usize::from(settings.bins));
        tracing::info!(count = charts.len(), "Rendered histograms");
    }

    Ok(())
}
