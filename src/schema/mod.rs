pub mod types;

pub use types::{ColumnSlot, SalesColumn};

use anyhow::{bail, Result};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Column positions of the input sheet, resolved once from the header row.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    /// Header text in output order. Ends with `total` even if the input had none.
    pub headers: Vec<String>,
    /// One slot per entry of `headers`.
    pub slots: Vec<ColumnSlot>,
    /// Input position of each named column that was present.
    pub positions: HashMap<SalesColumn, usize>,
    /// Input positions of the passthrough columns, in order.
    pub passthrough_positions: Vec<usize>,
}

impl ColumnLayout {
    /// Map a header row onto the sales columns.
    ///
    /// Fails on a missing required column. Unknown headers become
    /// passthrough columns; a repeated header keeps its first position and
    /// the repeats are passed through as `name.1`, `name.2`, ...
    pub fn from_headers(raw_headers: &[String]) -> Result<Self> {
        let mut headers = Vec::with_capacity(raw_headers.len() + 1);
        let mut slots = Vec::with_capacity(raw_headers.len() + 1);
        let mut positions = HashMap::new();
        let mut passthrough_positions = Vec::new();

        for (idx, (raw, name)) in raw_headers
            .iter()
            .zip(dedupe_headers(raw_headers))
            .enumerate()
        {
            if name != *raw {
                warn!(header = %raw, renamed = %name, idx, "duplicate column header, passing through");
            }
            let col = if name == *raw {
                SalesColumn::from_header(raw)
            } else {
                None
            };
            headers.push(name);
            match col {
                Some(col) if !positions.contains_key(&col) => {
                    positions.insert(col, idx);
                    slots.push(ColumnSlot::Field(col));
                }
                other => {
                    if other.is_some() {
                        warn!(header = %raw, idx, "duplicate column header, passing through");
                    }
                    slots.push(ColumnSlot::Passthrough(passthrough_positions.len()));
                    passthrough_positions.push(idx);
                }
            }
        }

        for col in SalesColumn::ALL {
            if col.is_required() && !positions.contains_key(&col) {
                bail!("missing required column '{}'", col.header());
            }
        }

        if !positions.contains_key(&SalesColumn::Total) {
            debug!("input has no total column, appending one");
            headers.push(SalesColumn::Total.header().to_string());
            slots.push(ColumnSlot::Field(SalesColumn::Total));
        }

        Ok(Self {
            headers,
            slots,
            positions,
            passthrough_positions,
        })
    }

    /// Input position of a named column, if the sheet had it.
    pub fn position(&self, col: SalesColumn) -> Option<usize> {
        self.positions.get(&col).copied()
    }
}

/// Suffix repeated header names with `.1`, `.2`, ... in order of
/// appearance, skipping suffixed names the sheet already uses.
fn dedupe_headers(raw: &[String]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    raw.iter()
        .map(|header| {
            let mut name = header.clone();
            let mut seen = counts.get(&name).copied().unwrap_or(0);
            while seen > 0 {
                counts.insert(name.clone(), seen + 1);
                name = format!("{}.{}", name, seen);
                seen = counts.get(&name).copied().unwrap_or(0);
            }
            counts.insert(name.clone(), seen + 1);
            name
        })
        .collect()
}
