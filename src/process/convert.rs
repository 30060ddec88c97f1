use calamine::Data;
use tracing::debug;

use crate::process::date_parser::RawDate;

/// A text cell's content. Blank cells and non-text cells count as missing.
pub fn text_cell(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => Some(s.clone()),
        Data::Empty => None,
        other => {
            debug!(cell = ?other, "non-text value in a text column, treating as missing");
            None
        }
    }
}

/// A numeric cell's value. Text that parses as a number is accepted.
pub fn number_cell(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => {
            let parsed = s.trim().parse::<f64>().ok();
            if parsed.is_none() && !s.trim().is_empty() {
                debug!(text = %s, "non-numeric text in a numeric column, treating as missing");
            }
            parsed
        }
        _ => None,
    }
}

/// Classify a date cell. Date-formatted cells are stored as serials and
/// come back as such.
pub fn date_cell(cell: &Data) -> RawDate {
    match cell {
        Data::Float(f) => RawDate::Serial(*f),
        Data::Int(i) => RawDate::Serial(*i as f64),
        Data::DateTime(dt) => RawDate::Serial(dt.as_f64()),
        Data::String(s) | Data::DateTimeIso(s) => RawDate::Text(s.clone()),
        _ => RawDate::Other,
    }
}

/// Header cell → column name. Blank headers get a positional name.
pub fn header_cell(cell: &Data, idx: usize) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => format!("Unnamed: {}", idx),
        other => other.to_string(),
    }
}
