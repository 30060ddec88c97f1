use tracing::{debug, info, instrument};

use crate::process::date_parser::normalize_date;
use crate::process::trimming::{normalize_text, title_case};
use crate::process::utils::strip_accents;
use crate::process::{RawRecord, RawTable, SalesRecord, SalesTable};

/// Fill value for a missing product or channel, before title casing.
pub const MISSING_TEXT: &str = "sin dato";

/// What the cleaning pass changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleaningStats {
    pub rows: usize,
    pub filled_products: usize,
    pub filled_channels: usize,
    pub filled_units: usize,
    pub unparseable_dates: usize,
    /// Rows whose input total differed from units × unit price.
    pub totals_changed: usize,
}

impl CleaningStats {
    fn observe(&mut self, raw: &RawRecord, clean: &SalesRecord) {
        self.rows += 1;
        if raw.product.is_none() {
            self.filled_products += 1;
        }
        if raw.channel.is_none() {
            self.filled_channels += 1;
        }
        if raw.units.is_none() {
            self.filled_units += 1;
        }
        if clean.date.is_unparseable() {
            self.unparseable_dates += 1;
        }
        if !same_total(raw.total, clean.total) {
            self.totals_changed += 1;
        }
    }
}

fn same_total(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => x == y || (x.is_nan() && y.is_nan()),
        (None, None) => true,
        _ => false,
    }
}

/// Clean one record. Step order matters: text cleanup, title case,
/// defaults, city accents, date, total.
pub fn clean_record(raw: &RawRecord) -> SalesRecord {
    // 1) + 2) whitespace, then title case
    let product = raw.product.as_deref().map(normalize_text);
    let city = raw.city.as_deref().map(normalize_text);
    let channel = raw.channel.as_deref().map(normalize_text);

    // 3) defaults
    let product = product.unwrap_or_else(missing_text);
    let channel = channel.unwrap_or_else(missing_text);
    let units = raw.units.unwrap_or(0.0);

    // 4) accents, city only
    let city = city.map(|c| strip_accents(&c));

    // 5) date
    let date = normalize_date(&raw.date);

    // 6) total, always recomputed
    let total = raw.unit_price.map(|price| units * price);

    SalesRecord {
        product,
        city,
        channel,
        units,
        unit_price: raw.unit_price,
        date,
        total,
        passthrough: raw.passthrough.clone(),
    }
}

fn missing_text() -> String {
    title_case(MISSING_TEXT)
}

/// Clean every record in one pass. No rows are dropped or merged.
#[instrument(level = "info", skip(raw), fields(rows = raw.records.len()))]
pub fn clean_table(raw: &RawTable) -> (SalesTable, CleaningStats) {
    let mut stats = CleaningStats::default();
    let mut records = Vec::with_capacity(raw.records.len());

    for (idx, rec) in raw.records.iter().enumerate() {
        let cleaned = clean_record(rec);
        if cleaned.date.is_unparseable() {
            debug!(row = idx + 2, raw = ?rec.date, "date left empty");
        }
        stats.observe(rec, &cleaned);
        records.push(cleaned);
    }

    info!(
        rows = stats.rows,
        filled_products = stats.filled_products,
        filled_channels = stats.filled_channels,
        filled_units = stats.filled_units,
        unparseable_dates = stats.unparseable_dates,
        totals_changed = stats.totals_changed,
        "cleaned records"
    );

    (
        SalesTable {
            layout: raw.layout.clone(),
            records,
        },
        stats,
    )
}
