// src/schema/types.rs

/// The named columns of the sales sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SalesColumn {
    Product,
    City,
    Channel,
    Units,
    UnitPrice,
    Date,
    Total,
}

impl SalesColumn {
    pub const ALL: [SalesColumn; 7] = [
        SalesColumn::Product,
        SalesColumn::City,
        SalesColumn::Channel,
        SalesColumn::Units,
        SalesColumn::UnitPrice,
        SalesColumn::Date,
        SalesColumn::Total,
    ];

    /// Header text as it appears in the workbook.
    pub fn header(self) -> &'static str {
        match self {
            SalesColumn::Product => "producto",
            SalesColumn::City => "ciudad",
            SalesColumn::Channel => "canal",
            SalesColumn::Units => "unidades",
            SalesColumn::UnitPrice => "precio_unit",
            SalesColumn::Date => "fecha",
            SalesColumn::Total => "total",
        }
    }

    pub fn from_header(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|c| c.header() == name)
    }

    /// `total` is recomputed, so the input may omit it.
    pub fn is_required(self) -> bool {
        !matches!(self, SalesColumn::Total)
    }
}

/// Where a header position's value lives in a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSlot {
    Field(SalesColumn),
    /// Index into the record's passthrough cells.
    Passthrough(usize),
}
