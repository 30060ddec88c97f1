use anyhow::{Context, Result};
use std::fs;
use std::time::Instant;
use tracing::info;

use crate::chart::{write_bar_chart, write_pie_chart};
use crate::config::{PipelineConfig, SHEET_NAME};
use crate::output::{city_totals, product_totals, render_preview, write_sales_workbook};
use crate::process::{clean_table, load_sales_workbook, CleaningStats, SalesTable};

/// What a run produced.
#[derive(Debug)]
pub struct RunReport {
    pub table: SalesTable,
    pub stats: CleaningStats,
    pub products: Vec<(String, f64)>,
    pub cities: Vec<(String, f64)>,
    /// First rows of the cleaned table, formatted for the terminal.
    pub preview: String,
}

/// load → clean → write workbook → bar chart → pie chart.
#[tracing::instrument(level = "info", skip(config), fields(input = %config.input_path.display()))]
pub fn run(config: &PipelineConfig) -> Result<RunReport> {
    let start = Instant::now();

    for d in config.output_dirs() {
        fs::create_dir_all(&d).with_context(|| format!("creating output directory {:?}", d))?;
    }

    // ─── 1) load ─────────────────────────────────────────────────────
    let raw = load_sales_workbook(&config.input_path, SHEET_NAME)?;

    // ─── 2) clean ────────────────────────────────────────────────────
    let (table, stats) = clean_table(&raw);

    // ─── 3) cleaned workbook ─────────────────────────────────────────
    write_sales_workbook(&table, &config.output_path, SHEET_NAME)?;

    // ─── 4) charts ───────────────────────────────────────────────────
    let products = product_totals(&table.records);
    write_bar_chart(&products, &config.product_chart_path)?;

    let cities = city_totals(&table.records);
    write_pie_chart(&cities, &config.city_chart_path)?;

    let preview = render_preview(&table, config.preview_rows);
    info!(elapsed = ?start.elapsed(), rows = table.records.len(), "run complete");

    Ok(RunReport {
        table,
        stats,
        products,
        cities,
        preview,
    })
}
