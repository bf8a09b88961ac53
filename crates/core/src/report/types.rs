//! Return document types.
//!
//! Field names on the wire follow the GSTR-1 JSON schema.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::jurisdiction::SupplyType;

/// The GSTR-1 return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Filer GSTIN.
    pub gstin: String,
    /// Filing period, `MMYYYY` by convention.
    pub fp: String,
    /// Format version.
    pub version: String,
    /// Placeholder hash.
    pub hash: String,
    /// B2C (small) lines.
    pub b2cs: Vec<B2csEntry>,
    /// Supplies through e-commerce operators.
    pub supeco: Supeco,
}

/// One B2CS line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct B2csEntry {
    /// Supply type.
    #[serde(rename = "sply_ty")]
    pub supply_type: SupplyType,
    /// Combined rate in percent.
    #[serde(rename = "rt")]
    pub rate: i64,
    /// Type marker.
    #[serde(rename = "typ")]
    pub kind: String,
    /// Place of supply.
    pub pos: String,
    /// Taxable value, two decimals.
    #[serde(rename = "txval", with = "rust_decimal::serde::float")]
    pub taxable_value: Decimal,
    /// Cess, whole rupees.
    #[serde(rename = "csamt")]
    pub cess: i64,
    /// Tax heads for the supply type.
    #[serde(flatten)]
    pub tax: LineTax,
}

/// Tax heads of a B2CS line; inter-state lines carry IGST, intra-state
/// lines carry CGST and SGST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineTax {
    /// Inter-state.
    Inter {
        /// IGST, whole rupees.
        #[serde(rename = "iamt")]
        igst: i64,
    },
    /// Intra-state.
    Intra {
        /// CGST, whole rupees.
        #[serde(rename = "camt")]
        cgst: i64,
        /// SGST, whole rupees.
        #[serde(rename = "samt")]
        sgst: i64,
    },
}

/// The `supeco` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Supeco {
    /// Operators that collected tax at source.
    pub clttx: Vec<CollectorEntry>,
}

/// Totals for one e-commerce operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectorEntry {
    /// Operator GSTIN.
    pub etin: String,
    /// Supply value, two decimals.
    #[serde(rename = "suppval", with = "rust_decimal::serde::float")]
    pub supply_value: Decimal,
    /// IGST, whole rupees.
    pub igst: i64,
    /// CGST, whole rupees.
    pub cgst: i64,
    /// SGST, whole rupees.
    pub sgst: i64,
    /// Cess, whole rupees.
    pub cess: i64,
    /// Amendment flag.
    pub flag: String,
}

impl Report {
    /// Sum of rendered taxable values across all B2CS lines.
    #[must_use]
    pub fn total_taxable_value(&self) -> Decimal {
        self.b2cs.iter().map(|e| e.taxable_value).sum()
    }
}
