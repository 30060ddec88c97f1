pub mod preview;
pub mod summary;
pub mod xlsx;

pub use preview::render_preview;
pub use summary::{city_totals, product_totals};
pub use xlsx::write_sales_workbook;

use calamine::Data;
use chrono::NaiveDate;

use crate::process::SalesRecord;
use crate::schema::{ColumnSlot, SalesColumn};

/// The value a record shows in one output column.
#[derive(Debug, Clone, PartialEq)]
pub enum OutCell<'a> {
    Text(&'a str),
    Number(f64),
    Date(NaiveDate),
    Passthrough(&'a Data),
    Blank,
}

impl SalesRecord {
    pub fn cell(&self, slot: ColumnSlot) -> OutCell<'_> {
        match slot {
            ColumnSlot::Field(col) => match col {
                SalesColumn::Product => OutCell::Text(&self.product),
                SalesColumn::City => self.city.as_deref().map_or(OutCell::Blank, OutCell::Text),
                SalesColumn::Channel => OutCell::Text(&self.channel),
                SalesColumn::Units => OutCell::Number(self.units),
                SalesColumn::UnitPrice => self.unit_price.map_or(OutCell::Blank, OutCell::Number),
                SalesColumn::Total => self.total.map_or(OutCell::Blank, OutCell::Number),
                SalesColumn::Date => self.date.as_date().map_or(OutCell::Blank, OutCell::Date),
            },
            ColumnSlot::Passthrough(i) => match self.passthrough.get(i) {
                Some(Data::Empty) | None => OutCell::Blank,
                Some(data) => OutCell::Passthrough(data),
            },
        }
    }
}
