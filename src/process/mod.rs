// src/process/mod.rs
use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::{debug, info};

use crate::schema::{ColumnLayout, SalesColumn};

pub mod clean;
pub mod convert;
pub mod date_parser;
pub mod trimming;
pub mod utils;

pub use clean::{clean_record, clean_table, CleaningStats};
pub use date_parser::{normalize_date, NormalizedDate, RawDate};

/// One data row as loaded, before any cleanup.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub product: Option<String>,
    pub city: Option<String>,
    pub channel: Option<String>,
    pub units: Option<f64>,
    pub unit_price: Option<f64>,
    /// Whatever the sheet claimed; replaced during cleaning.
    pub total: Option<f64>,
    pub date: RawDate,
    /// Cells of the unnamed columns, in header order.
    pub passthrough: Vec<Data>,
}

/// One cleaned row.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub product: String,
    /// Never filled: a row without a city stays without one.
    pub city: Option<String>,
    pub channel: String,
    pub units: f64,
    pub unit_price: Option<f64>,
    pub date: NormalizedDate,
    /// `units * unit_price`, missing only when the price is.
    pub total: Option<f64>,
    pub passthrough: Vec<Data>,
}

#[derive(Debug, Clone)]
pub struct RawTable {
    pub layout: ColumnLayout,
    pub records: Vec<RawRecord>,
}

#[derive(Debug, Clone)]
pub struct SalesTable {
    pub layout: ColumnLayout,
    pub records: Vec<SalesRecord>,
}

impl RawTable {
    /// Build a table from a header row plus data rows.
    pub fn from_rows<'a, I>(header: &[Data], rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a [Data]>,
    {
        let headers: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(idx, cell)| convert::header_cell(cell, idx))
            .collect();
        let layout = ColumnLayout::from_headers(&headers)?;

        let records = rows
            .into_iter()
            .map(|row| read_record(&layout, row))
            .collect();

        Ok(Self { layout, records })
    }
}

static EMPTY: Data = Data::Empty;

fn cell<'a>(layout: &ColumnLayout, row: &'a [Data], col: SalesColumn) -> &'a Data {
    layout
        .position(col)
        .and_then(|idx| row.get(idx))
        .unwrap_or(&EMPTY)
}

fn read_record(layout: &ColumnLayout, row: &[Data]) -> RawRecord {
    RawRecord {
        product: convert::text_cell(cell(layout, row, SalesColumn::Product)),
        city: convert::text_cell(cell(layout, row, SalesColumn::City)),
        channel: convert::text_cell(cell(layout, row, SalesColumn::Channel)),
        units: convert::number_cell(cell(layout, row, SalesColumn::Units)),
        unit_price: convert::number_cell(cell(layout, row, SalesColumn::UnitPrice)),
        total: convert::number_cell(cell(layout, row, SalesColumn::Total)),
        date: convert::date_cell(cell(layout, row, SalesColumn::Date)),
        passthrough: layout
            .passthrough_positions
            .iter()
            .map(|&idx| row.get(idx).cloned().unwrap_or(Data::Empty))
            .collect(),
    }
}

/// Open `path`, read `sheet`, and map its first row as the header.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_sales_workbook<P: AsRef<Path>>(path: P, sheet: &str) -> Result<RawTable> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {:?}", path))?;
    let range = workbook
        .worksheet_range(sheet)
        .with_context(|| format!("Failed to read sheet '{}' in {:?}", sheet, path))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| anyhow!("sheet '{}' in {:?} is empty", sheet, path))?;
    debug!(columns = header.len(), "read header row");

    let table = RawTable::from_rows(header, rows)
        .with_context(|| format!("Failed to map columns of sheet '{}'", sheet))?;
    info!(rows = table.records.len(), "loaded sales sheet");
    Ok(table)
}
