// src/config.rs

use std::path::{Path, PathBuf};

pub const INPUT_PATH: &str = "ventas_sucias.xlsx";
/// Sheet read from the input and written to the cleaned workbook.
pub const SHEET_NAME: &str = "Sheet1";
pub const OUTPUT_PATH: &str = "output/ventas_limpias.xlsx";
pub const PRODUCT_CHART_PATH: &str = "graficas/grafico_ventas_por_producto.png";
pub const CITY_CHART_PATH: &str = "graficas/grafico_torta_ventas_ciudad.png";
pub const PREVIEW_ROWS: usize = 10;

/// Where the pipeline reads from and writes to.
///
/// The binary only ever runs with `PipelineConfig::default()`, the fixed
/// layout `ventas_sucias.xlsx` → `output/` + `graficas/`. Tests build their
/// own instance to point at a temporary directory.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub product_chart_path: PathBuf,
    pub city_chart_path: PathBuf,
    /// Rows printed after the run.
    pub preview_rows: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            input_path: PathBuf::from(INPUT_PATH),
            output_path: PathBuf::from(OUTPUT_PATH),
            product_chart_path: PathBuf::from(PRODUCT_CHART_PATH),
            city_chart_path: PathBuf::from(CITY_CHART_PATH),
            preview_rows: PREVIEW_ROWS,
        }
    }
}

impl PipelineConfig {
    /// Directories that must exist before any output is written.
    pub fn output_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = [
            &self.output_path,
            &self.product_chart_path,
            &self.city_chart_path,
        ]
        .iter()
        .filter_map(|p| p.parent())
        .filter(|d| !d.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .collect();
        dirs.sort();
        dirs.dedup();
        dirs
    }
}
