use anyhow::Result;
use salesclean::config::SHEET_NAME;
use salesclean::{pipeline, PipelineConfig};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) fixed paths ──────────────────────────────────────────────
    let config = PipelineConfig::default();
    info!(
        input = %config.input_path.display(),
        sheet = SHEET_NAME,
        "reading sales sheet"
    );

    // ─── 3) run ──────────────────────────────────────────────────────
    let report = pipeline::run(&config)?;
    info!(
        rows = report.stats.rows,
        products = report.products.len(),
        cities = report.cities.len(),
        "outputs written"
    );

    // ─── 4) preview ──────────────────────────────────────────────────
    println!("{}", report.preview);

    info!("all done");
    Ok(())
}
