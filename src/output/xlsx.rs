use anyhow::{Context, Result};
use calamine::Data;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::path::Path;
use tracing::{info, warn};

use crate::output::OutCell;
use crate::process::date_parser::SERIAL_EPOCH;
use crate::process::SalesTable;

/// First day whose serial means the same thing in every spreadsheet.
/// Earlier days collide with the phantom 1900-02-29.
static FIRST_SAFE_SERIAL_DAY: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(1900, 3, 1).expect("valid date"));

struct Formats {
    header: Format,
    date: Format,
    datetime: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center),
            date: Format::new().set_num_format("yyyy-mm-dd"),
            datetime: Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"),
        }
    }
}

/// Write the cleaned table as a single sheet: header row, then one row per
/// record, no index column.
#[tracing::instrument(level = "info", skip(table, path), fields(path = %path.as_ref().display()))]
pub fn write_sales_workbook<P: AsRef<Path>>(table: &SalesTable, path: P, sheet: &str) -> Result<()> {
    let path = path.as_ref();
    let formats = Formats::new();
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet)
        .with_context(|| format!("naming sheet '{}'", sheet))?;

    for (col, header) in table.layout.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &formats.header)?;
    }

    for (i, record) in table.records.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, slot) in table.layout.slots.iter().enumerate() {
            write_cell(worksheet, &formats, row, col as u16, record.cell(*slot))
                .with_context(|| format!("writing row {} column {}", row + 1, col + 1))?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("saving workbook {:?}", path))?;
    info!(rows = table.records.len(), "wrote cleaned workbook");
    Ok(())
}

fn write_cell(ws: &mut Worksheet, formats: &Formats, row: u32, col: u16, cell: OutCell<'_>) -> Result<()> {
    match cell {
        OutCell::Blank => {}
        OutCell::Text(s) => {
            ws.write_string(row, col, s)?;
        }
        OutCell::Number(n) => write_number(ws, row, col, n)?,
        OutCell::Date(d) => {
            if d >= *FIRST_SAFE_SERIAL_DAY {
                let serial = (d - *SERIAL_EPOCH).num_days() as f64;
                ws.write_number_with_format(row, col, serial, &formats.date)?;
            } else {
                warn!(date = %d, row, "date predates spreadsheet dates, writing as text");
                ws.write_string(row, col, d.format("%Y-%m-%d").to_string())?;
            }
        }
        OutCell::Passthrough(data) => match data {
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                ws.write_string(row, col, s)?;
            }
            Data::Float(f) => write_number(ws, row, col, *f)?,
            Data::Int(i) => write_number(ws, row, col, *i as f64)?,
            Data::Bool(b) => {
                ws.write_boolean(row, col, *b)?;
            }
            Data::DateTime(dt) => {
                let serial = dt.as_f64();
                let format = if serial.fract() == 0.0 {
                    &formats.date
                } else {
                    &formats.datetime
                };
                ws.write_number_with_format(row, col, serial, format)?;
            }
            Data::Error(e) => {
                ws.write_string(row, col, e.to_string())?;
            }
            Data::Empty => {}
        },
    }
    Ok(())
}

/// Non-finite numbers have no spreadsheet form and are left blank.
fn write_number(ws: &mut Worksheet, row: u32, col: u16, n: f64) -> Result<()> {
    if n.is_finite() {
        ws.write_number(row, col, n)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{NormalizedDate, SalesRecord};
    use crate::schema::ColumnLayout;
    use calamine::{open_workbook_auto, Reader};
    use tempfile::tempdir;

    fn table() -> SalesTable {
        let layout = ColumnLayout::from_headers(
            &["id", "producto", "ciudad", "canal", "unidades", "precio_unit", "fecha"]
                .map(String::from),
        )
        .unwrap();
        let records = vec![
            SalesRecord {
                product: "Laptop".into(),
                city: Some("Bogota".into()),
                channel: "Tienda".into(),
                units: 2.0,
                unit_price: Some(1500.0),
                date: NormalizedDate::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()),
                total: Some(3000.0),
                passthrough: vec![Data::Int(1)],
            },
            SalesRecord {
                product: "Sin Dato".into(),
                city: None,
                channel: "Sin Dato".into(),
                units: 0.0,
                unit_price: None,
                date: NormalizedDate::Unparseable,
                total: None,
                passthrough: vec![Data::String("b-2".into())],
            },
        ];
        SalesTable { layout, records }
    }

    #[test]
    fn test_write_and_read_back() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("ventas_limpias.xlsx");
        write_sales_workbook(&table(), &path, "Sheet1")?;

        let mut wb = open_workbook_auto(&path)?;
        let range = wb.worksheet_range("Sheet1")?;
        let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
        assert_eq!(rows.len(), 3);

        let header: Vec<String> = rows[0].iter().map(|c| c.to_string()).collect();
        assert_eq!(
            header,
            vec!["id", "producto", "ciudad", "canal", "unidades", "precio_unit", "fecha", "total"]
        );

        assert_eq!(rows[1][0], Data::Float(1.0));
        assert_eq!(rows[1][1], Data::String("Laptop".into()));
        assert_eq!(rows[1][7], Data::Float(3000.0));
        match &rows[1][6] {
            Data::DateTime(dt) => assert_eq!(dt.as_f64(), 45366.0),
            other => panic!("expected a date cell, got {:?}", other),
        }

        assert_eq!(rows[2][0], Data::String("b-2".into()));
        assert_eq!(rows[2][2], Data::Empty);
        assert_eq!(rows[2][6], Data::Empty);
        assert_eq!(rows[2][7], Data::Empty);
        Ok(())
    }

    #[test]
    fn test_early_dates_written_as_text() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("early.xlsx");
        let mut t = table();
        t.records[0].date = NormalizedDate::Date(NaiveDate::from_ymd_opt(1899, 12, 30).unwrap());
        write_sales_workbook(&t, &path, "Sheet1")?;

        let mut wb = open_workbook_auto(&path)?;
        let range = wb.worksheet_range("Sheet1")?;
        assert_eq!(range.get((1, 6)), Some(&Data::String("1899-12-30".into())));
        Ok(())
    }
}
