//! Sales report reader.
//!
//! Reads the marketplace tax report (one row per invoice line) and yields
//! [`InputRow`]s. Column positions are resolved once from the header.
//!
//! A required column that is absent, from the header or from a short
//! record, is fatal (`MissingField`) when the row is read. Numeric cells
//! stay text until the classifier asks for them, so junk in a cell the row
//! never uses is not an error. Blank cells, and optional columns that are
//! absent, are zero.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{ConvertError, ConvertResult};

/// Header names of the sales report.
pub mod columns {
    /// Seller GSTIN.
    pub const SELLER_GSTIN: &str = "Seller Gstin";
    /// Destination state name.
    pub const SHIP_TO_STATE: &str = "Ship To State";
    /// Taxable value before tax.
    pub const TAXABLE_VALUE: &str = "Tax Exclusive Gross";
    /// IGST rate as a fraction.
    pub const IGST_RATE: &str = "Igst Rate";
    /// IGST on the goods.
    pub const IGST_TAX: &str = "Igst Tax";
    /// IGST on shipping.
    pub const SHIPPING_IGST_TAX: &str = "Shipping Igst Tax";
    /// CGST rate as a fraction.
    pub const CGST_RATE: &str = "Cgst Rate";
    /// CGST on the goods.
    pub const CGST_TAX: &str = "Cgst Tax";
    /// CGST on shipping.
    pub const SHIPPING_CGST_TAX: &str = "Shipping Cgst Tax";
    /// SGST rate as a fraction (optional).
    pub const SGST_RATE: &str = "Sgst Rate";
    /// SGST on the goods.
    pub const SGST_TAX: &str = "Sgst Tax";
    /// SGST on shipping.
    pub const SHIPPING_SGST_TAX: &str = "Shipping Sgst Tax";
    /// Compensation cess (optional).
    pub const CESS: &str = "Compensatory Cess Tax";
    /// Invoice total including tax.
    pub const INVOICE_AMOUNT: &str = "Invoice Amount";
}

/// Numeric columns of the sales report.
///
/// Cells are kept as text on [`InputRow`] and parsed only when the row's
/// classification needs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Taxable value.
    TaxableValue,
    /// IGST rate (fraction, e.g. `0.18`).
    IgstRate,
    /// IGST on the goods.
    IgstTax,
    /// IGST on shipping.
    ShippingIgstTax,
    /// CGST rate (fraction, e.g. `0.09`).
    CgstRate,
    /// CGST on the goods.
    CgstTax,
    /// CGST on shipping.
    ShippingCgstTax,
    /// SGST rate; blank when the report has no such column.
    SgstRate,
    /// SGST on the goods.
    SgstTax,
    /// SGST on shipping.
    ShippingSgstTax,
    /// Compensation cess; blank when the report has no such column.
    Cess,
    /// Invoice total.
    InvoiceAmount,
}

impl Field {
    /// Number of numeric columns.
    pub const COUNT: usize = 12;

    /// Every numeric column, in header order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::TaxableValue,
        Self::IgstRate,
        Self::IgstTax,
        Self::ShippingIgstTax,
        Self::CgstRate,
        Self::CgstTax,
        Self::ShippingCgstTax,
        Self::SgstRate,
        Self::SgstTax,
        Self::ShippingSgstTax,
        Self::Cess,
        Self::InvoiceAmount,
    ];

    /// Header name of the column.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::TaxableValue => columns::TAXABLE_VALUE,
            Self::IgstRate => columns::IGST_RATE,
            Self::IgstTax => columns::IGST_TAX,
            Self::ShippingIgstTax => columns::SHIPPING_IGST_TAX,
            Self::CgstRate => columns::CGST_RATE,
            Self::CgstTax => columns::CGST_TAX,
            Self::ShippingCgstTax => columns::SHIPPING_CGST_TAX,
            Self::SgstRate => columns::SGST_RATE,
            Self::SgstTax => columns::SGST_TAX,
            Self::ShippingSgstTax => columns::SHIPPING_SGST_TAX,
            Self::Cess => columns::CESS,
            Self::InvoiceAmount => columns::INVOICE_AMOUNT,
        }
    }

    /// True for columns a report may leave out entirely.
    #[must_use]
    pub const fn is_optional(self) -> bool {
        matches!(self, Self::SgstRate | Self::Cess)
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// One sales transaction from the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    /// Source line of this row.
    pub line: u64,
    /// Seller GSTIN.
    pub seller_gstin: String,
    /// Destination state name, as written in the report.
    pub ship_to_state: String,
    cells: [String; Field::COUNT],
}

impl InputRow {
    /// A row with every numeric cell blank.
    pub fn new(line: u64, seller_gstin: impl Into<String>, ship_to_state: impl Into<String>) -> Self {
        Self {
            line,
            seller_gstin: seller_gstin.into(),
            ship_to_state: ship_to_state.into(),
            cells: Default::default(),
        }
    }

    /// Sets a cell, builder style.
    #[must_use]
    pub fn with(mut self, field: Field, raw: impl Into<String>) -> Self {
        self.set(field, raw);
        self
    }

    /// Sets a cell.
    pub fn set(&mut self, field: Field, raw: impl Into<String>) {
        self.cells[field.index()] = raw.into();
    }

    /// Cell text as read.
    #[must_use]
    pub fn raw(&self, field: Field) -> &str {
        &self.cells[field.index()]
    }

    /// Parses a cell. Blank cells are zero.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if the cell is not a decimal number.
    pub fn amount(&self, field: Field) -> ConvertResult<Decimal> {
        parse_amount(self.raw(field), field.column(), self.line)
    }
}

/// Header positions of every column the converter reads. Optional numeric
/// columns absent from the header are `None`.
#[derive(Debug, Clone)]
struct Columns {
    seller_gstin: usize,
    ship_to_state: usize,
    numeric: [Option<usize>; Field::COUNT],
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> ConvertResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| ConvertError::MissingField {
                column: name.to_string(),
                line: 1,
            })
        };

        let seller_gstin = require(columns::SELLER_GSTIN)?;
        let ship_to_state = require(columns::SHIP_TO_STATE)?;
        let mut numeric = [None; Field::COUNT];
        for field in Field::ALL {
            numeric[field.index()] = if field.is_optional() {
                find(field.column())
            } else {
                Some(require(field.column())?)
            };
        }

        Ok(Self {
            seller_gstin,
            ship_to_state,
            numeric,
        })
    }
}

/// A single record being decoded, with its line for error reporting.
struct RecordView<'r> {
    record: &'r csv::StringRecord,
    line: u64,
}

impl RecordView<'_> {
    fn text(&self, idx: usize, column: &str) -> ConvertResult<&str> {
        self.record
            .get(idx)
            .ok_or_else(|| ConvertError::MissingField {
                column: column.to_string(),
                line: self.line,
            })
    }

    /// Cell of a numeric column; absent optional columns read as blank.
    fn cell(&self, idx: Option<usize>, field: Field) -> ConvertResult<&str> {
        match idx {
            Some(i) if field.is_optional() => Ok(self.record.get(i).unwrap_or_default()),
            Some(i) => self.text(i, field.column()),
            None => Ok(""),
        }
    }
}

/// Parses a monetary or rate cell. Blank cells are zero.
///
/// # Errors
///
/// Returns `ConvertError::Parse` if the cell is not a decimal number.
pub fn parse_amount(raw: &str, column: &str, line: u64) -> ConvertResult<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| ConvertError::Parse {
            column: column.to_string(),
            line,
            value: raw.to_string(),
        })
}

/// Streams typed rows out of a delimited sales report.
pub struct RowSource<R> {
    reader: csv::Reader<R>,
    columns: Columns,
    record: csv::StringRecord,
    rows_seen: u64,
}

impl RowSource<File> {
    /// Opens a sales report on disk.
    ///
    /// # Errors
    ///
    /// Returns `SourceUnavailable` if the file cannot be opened, or any
    /// header error from [`RowSource::new`].
    pub fn open(path: impl AsRef<Path>) -> ConvertResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConvertError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(file)
    }
}

impl<R: Read> RowSource<R> {
    /// Wraps a reader and resolves the header.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` (line 1) if a required column is not in the
    /// header, or `Csv` if the header cannot be read.
    pub fn new(source: R) -> ConvertResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(source);
        let columns = Columns::resolve(reader.headers()?)?;
        Ok(Self {
            reader,
            columns,
            record: csv::StringRecord::new(),
            rows_seen: 0,
        })
    }

    /// Reads the next row, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns `Csv`, or `MissingField` for a record too short to hold a
    /// required column.
    pub fn next_row(&mut self) -> ConvertResult<Option<InputRow>> {
        if !self.reader.read_record(&mut self.record)? {
            return Ok(None);
        }
        self.rows_seen += 1;
        let line = self
            .record
            .position()
            .map_or(self.rows_seen + 1, csv::Position::line);
        let view = RecordView {
            record: &self.record,
            line,
        };
        let c = &self.columns;

        let mut row = InputRow::new(
            line,
            view.text(c.seller_gstin, columns::SELLER_GSTIN)?.trim(),
            view.text(c.ship_to_state, columns::SHIP_TO_STATE)?,
        );
        for field in Field::ALL {
            row.set(field, view.cell(c.numeric[field.index()], field)?);
        }
        Ok(Some(row))
    }
}

impl<R: Read> Iterator for RowSource<R> {
    type Item = ConvertResult<InputRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HEADER: &str = "Seller Gstin,Ship To State,Tax Exclusive Gross,Igst Rate,Igst Tax,\
Shipping Igst Tax,Cgst Rate,Cgst Tax,Shipping Cgst Tax,Sgst Rate,Sgst Tax,Shipping Sgst Tax,\
Compensatory Cess Tax,Invoice Amount";

    fn rows(body: &str) -> Vec<ConvertResult<InputRow>> {
        let input = format!("{HEADER}\n{body}");
        RowSource::new(input.as_bytes())
            .expect("header resolves")
            .collect()
    }

    #[test]
    fn test_reads_full_row() {
        let parsed = rows("33ABCDE1234F1Z5,Tamil Nadu,1000.00,0,0,0,0.09,90.00,0,0.09,90.00,0,,1180\n");
        assert_eq!(parsed.len(), 1);
        let row = parsed[0].as_ref().expect("row reads");
        assert_eq!(row.line, 2);
        assert_eq!(row.seller_gstin, "33ABCDE1234F1Z5");
        assert_eq!(row.ship_to_state, "Tamil Nadu");
        assert_eq!(row.amount(Field::TaxableValue).unwrap(), dec!(1000.00));
        assert_eq!(row.amount(Field::CgstRate).unwrap(), dec!(0.09));
        assert_eq!(row.amount(Field::CgstTax).unwrap(), dec!(90.00));
        assert_eq!(row.amount(Field::SgstTax).unwrap(), dec!(90.00));
        assert_eq!(row.amount(Field::Cess).unwrap(), Decimal::ZERO);
        assert_eq!(row.amount(Field::InvoiceAmount).unwrap(), dec!(1180));
    }

    #[test]
    fn test_blank_numeric_cells_are_zero() {
        let parsed = rows("33ABCDE1234F1Z5,Kerala,,,,,,,,,,,,\n");
        let row = parsed[0].as_ref().expect("row reads");
        for field in Field::ALL {
            assert_eq!(row.amount(field).unwrap(), Decimal::ZERO, "{field:?}");
        }
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let input = "Seller Gstin,Ship To State,Tax Exclusive Gross,Igst Rate,Igst Tax,\
Shipping Igst Tax,Cgst Rate,Cgst Tax,Shipping Cgst Tax,Sgst Tax,Shipping Sgst Tax,Invoice Amount\n\
33ABCDE1234F1Z5,Kerala,500,0.18,90,0,0,0,0,0,0,590\n";
        let row = RowSource::new(input.as_bytes())
            .expect("header resolves")
            .next_row()
            .expect("row reads")
            .expect("one row");
        assert_eq!(row.raw(Field::Cess), "");
        assert_eq!(row.amount(Field::SgstRate).unwrap(), Decimal::ZERO);
        assert_eq!(row.amount(Field::IgstTax).unwrap(), dec!(90));
        assert_eq!(row.amount(Field::InvoiceAmount).unwrap(), dec!(590));
    }

    #[test]
    fn test_missing_required_column() {
        let input = "Seller Gstin,Ship To State\n33ABCDE1234F1Z5,Kerala\n";
        let err = RowSource::new(input.as_bytes()).err().expect("header rejected");
        match err {
            ConvertError::MissingField { column, line } => {
                assert_eq!(column, "Tax Exclusive Gross");
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_record_reports_missing_field() {
        let parsed = rows("33ABCDE1234F1Z5,Kerala,500,0.18\n");
        match &parsed[0] {
            Err(ConvertError::MissingField { column, line }) => {
                assert_eq!(column, "Igst Tax");
                assert_eq!(*line, 2);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_junk_cells_are_read_as_text() {
        let parsed = rows("33ABCDE1234F1Z5,Goa,0,n/a,n/a,,NA,NA,,,,,,\n");
        let row = parsed[0].as_ref().expect("row reads");
        assert_eq!(row.raw(Field::IgstRate), "n/a");
        assert_eq!(row.amount(Field::TaxableValue).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_non_numeric_value() {
        let parsed = rows("33ABCDE1234F1Z5,Kerala,abc,0.18,90,0,0,0,0,0,0,0,0,590\n");
        let row = parsed[0].as_ref().expect("row reads");
        match row.amount(Field::TaxableValue) {
            Err(ConvertError::Parse {
                column,
                line,
                value,
            }) => {
                assert_eq!(column, "Tax Exclusive Gross");
                assert_eq!(line, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_seller_gstin_is_trimmed() {
        let parsed = rows(" 33ABCDE1234F1Z5 ,Kerala,,,,,,,,,,,,\n");
        assert_eq!(parsed[0].as_ref().unwrap().seller_gstin, "33ABCDE1234F1Z5");
    }

    #[test]
    fn test_parse_amount_forms() {
        assert_eq!(parse_amount(" 12.50 ", "x", 2).ok(), Some(dec!(12.50)));
        assert_eq!(parse_amount("", "x", 2).ok(), Some(Decimal::ZERO));
        assert_eq!(parse_amount("1e3", "x", 2).ok(), Some(dec!(1000)));
        assert_eq!(parse_amount("-4", "x", 2).ok(), Some(dec!(-4)));
        assert!(parse_amount("1,000", "x", 2).is_err());
    }

    #[test]
    fn test_open_missing_file() {
        let err = RowSource::open("/nonexistent/definitely/input.csv")
            .err()
            .expect("open fails");
        assert!(err.is_source_unavailable());
    }
}
