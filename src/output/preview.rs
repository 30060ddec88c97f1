use calamine::Data;

use crate::output::OutCell;
use crate::process::SalesTable;
use crate::schema::{ColumnSlot, SalesColumn};

/// First `n` records as a right-aligned text table with a row index,
/// `NaN` for missing values and `NaT` for missing dates.
pub fn render_preview(table: &SalesTable, n: usize) -> String {
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(n.min(table.records.len()) + 1);

    let mut header = vec![String::new()];
    header.extend(table.layout.headers.iter().cloned());
    grid.push(header);

    for (i, record) in table.records.iter().take(n).enumerate() {
        let mut line = vec![i.to_string()];
        for slot in &table.layout.slots {
            let is_date = matches!(slot, ColumnSlot::Field(SalesColumn::Date));
            line.push(display(record.cell(*slot), is_date));
        }
        grid.push(line);
    }

    let cols = grid[0].len();
    let widths: Vec<usize> = (0..cols)
        .map(|c| grid.iter().map(|r| r[c].chars().count()).max().unwrap_or(0))
        .collect();

    grid.iter()
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{:>width$}", cell, width = w))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn display(cell: OutCell<'_>, is_date: bool) -> String {
    match cell {
        OutCell::Blank if is_date => "NaT".to_string(),
        OutCell::Blank => "NaN".to_string(),
        OutCell::Text(s) => s.to_string(),
        OutCell::Number(n) => format_number(n),
        OutCell::Date(d) => d.format("%Y-%m-%d").to_string(),
        OutCell::Passthrough(Data::Float(f)) => format_number(*f),
        OutCell::Passthrough(other) => other.to_string(),
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.1}", n)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{NormalizedDate, SalesRecord};
    use crate::schema::ColumnLayout;
    use chrono::NaiveDate;

    fn table(rows: usize) -> SalesTable {
        let layout = ColumnLayout::from_headers(
            &["producto", "ciudad", "canal", "unidades", "precio_unit", "fecha", "total"]
                .map(String::from),
        )
        .unwrap();
        let records = (0..rows)
            .map(|i| SalesRecord {
                product: format!("P{}", i),
                city: if i % 2 == 0 { Some("Cali".into()) } else { None },
                channel: "Web".into(),
                units: i as f64,
                unit_price: Some(2.5),
                date: if i == 0 {
                    NormalizedDate::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
                } else {
                    NormalizedDate::Unparseable
                },
                total: Some(i as f64 * 2.5),
                passthrough: Vec::new(),
            })
            .collect();
        SalesTable { layout, records }
    }

    #[test]
    fn test_preview_limits_rows() {
        let text = render_preview(&table(15), 10);
        assert_eq!(text.lines().count(), 11);
        assert!(text.lines().next().unwrap().contains("precio_unit"));
    }

    #[test]
    fn test_preview_values() {
        let text = render_preview(&table(2), 10);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[1].contains("2024-03-15"));
        assert!(lines[1].contains("Cali"));
        assert!(lines[2].contains("NaN"));
        assert!(lines[2].contains("NaT"));
        assert!(lines[2].ends_with("2.5"));
    }
}
