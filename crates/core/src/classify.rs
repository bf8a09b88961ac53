//! Row classification.
//!
//! Decides whether a sales row belongs in the return and, if so, which
//! B2CS line it rolls up into and which amounts it carries. Cells are
//! parsed in admission order: taxable value first, then the rate of the
//! row's supply type, then only that supply type's tax heads.

use gstr1_shared::FilingConfig;
use gstr1_shared::types::basis_rate;
use rust_decimal::Decimal;
use tracing::warn;

use crate::error::{ConvertError, ConvertResult};
use crate::jurisdiction::{self, SupplyType};
use crate::source::{Field, InputRow};

/// Adds two amounts, failing instead of overflowing.
pub(crate) fn checked_sum(a: Decimal, b: Decimal, field: &'static str) -> ConvertResult<Decimal> {
    a.checked_add(b).ok_or(ConvertError::AmountOutOfRange { field })
}

/// Identifies one B2CS line: supply type, rate, type marker, and place of
/// supply. Rows with equal keys are summed together.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassificationKey {
    /// Intra- or inter-state.
    pub supply_type: SupplyType,
    /// Combined GST rate in percent, truncated to an integer.
    pub rate: i64,
    /// Type marker (`OE`).
    pub kind: String,
    /// Two-digit place-of-supply code.
    pub pos: String,
}

/// Tax amounts of one row, goods plus shipping, for the heads that apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxSplit {
    /// Inter-state: IGST only.
    Inter {
        /// IGST + shipping IGST.
        igst: Decimal,
    },
    /// Intra-state: CGST and SGST.
    Intra {
        /// CGST + shipping CGST.
        cgst: Decimal,
        /// SGST + shipping SGST.
        sgst: Decimal,
    },
}

impl TaxSplit {
    /// Derives the row's tax heads for the given supply type. Columns of
    /// the other supply type are not read.
    ///
    /// # Errors
    ///
    /// Returns `Parse` for a non-numeric tax cell, or `AmountOutOfRange` if
    /// goods and shipping tax cannot be added.
    pub fn from_row(row: &InputRow, supply_type: SupplyType) -> ConvertResult<Self> {
        Ok(match supply_type {
            SupplyType::Inter => Self::Inter {
                igst: checked_sum(
                    row.amount(Field::IgstTax)?,
                    row.amount(Field::ShippingIgstTax)?,
                    "iamt",
                )?,
            },
            SupplyType::Intra => Self::Intra {
                cgst: checked_sum(
                    row.amount(Field::CgstTax)?,
                    row.amount(Field::ShippingCgstTax)?,
                    "camt",
                )?,
                sgst: checked_sum(
                    row.amount(Field::SgstTax)?,
                    row.amount(Field::ShippingSgstTax)?,
                    "samt",
                )?,
            },
        })
    }
}

/// An admitted row: where it goes and what it adds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Target B2CS line.
    pub key: ClassificationKey,
    /// Taxable value (positive).
    pub taxable_value: Decimal,
    /// Tax heads carried by the row.
    pub tax: TaxSplit,
    /// Compensation cess.
    pub cess: Decimal,
    /// Invoice total; the operator entry only sees positive amounts.
    pub invoice_amount: Decimal,
}

/// Why a row was left out of the return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Taxable value is zero, blank, or negative.
    NonPositiveTaxableValue,
    /// Rate for the row's supply type is zero, blank, or negative.
    NonPositiveRate,
}

impl SkipReason {
    /// Short label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NonPositiveTaxableValue => "non_positive_taxable_value",
            Self::NonPositiveRate => "non_positive_rate",
        }
    }
}

/// Outcome of classifying one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The row contributes to the return.
    Admitted(Classification),
    /// The row is filtered out. This is not an error.
    Skipped(SkipReason),
}

/// Classifies rows against the filing configuration.
pub struct Classifier<'a> {
    config: &'a FilingConfig,
}

impl<'a> Classifier<'a> {
    /// Creates a classifier.
    #[must_use]
    pub const fn new(config: &'a FilingConfig) -> Self {
        Self { config }
    }

    /// Classifies a single row.
    ///
    /// Rows without a positive taxable value, or whose rate for their supply
    /// type truncates to zero or below, are skipped rather than zero-filled.
    /// A skipped row has none of its remaining cells parsed.
    ///
    /// # Errors
    ///
    /// Returns `Parse` for a non-numeric cell the row needs, or
    /// `AmountOutOfRange` if the rate cannot be scaled or tax heads cannot
    /// be added.
    pub fn classify(&self, row: &InputRow) -> ConvertResult<Admission> {
        let taxable_value = row.amount(Field::TaxableValue)?;
        if taxable_value <= Decimal::ZERO {
            return Ok(Admission::Skipped(SkipReason::NonPositiveTaxableValue));
        }

        let pos = jurisdiction::pos_code(&row.ship_to_state, &self.config.fallback_state_code);
        let supply_type = SupplyType::for_pos(pos, &self.config.home_state_code);

        let stated_rate = match supply_type {
            SupplyType::Inter => row.amount(Field::IgstRate)?,
            SupplyType::Intra => row.amount(Field::CgstRate)?,
        };
        let rate = basis_rate(stated_rate, supply_type.rate_multiplier())
            .ok_or(ConvertError::AmountOutOfRange { field: "rt" })?;
        if rate <= 0 {
            return Ok(Admission::Skipped(SkipReason::NonPositiveRate));
        }

        // Informational only; an unreadable SGST rate is ignored.
        if supply_type == SupplyType::Intra
            && let Ok(sgst_rate) = row.amount(Field::SgstRate)
            && !sgst_rate.is_zero()
            && sgst_rate != stated_rate
        {
            warn!(
                line = row.line,
                cgst_rate = %stated_rate,
                sgst_rate = %sgst_rate,
                "CGST and SGST rates differ; line rate uses CGST"
            );
        }

        Ok(Admission::Admitted(Classification {
            key: ClassificationKey {
                supply_type,
                rate,
                kind: self.config.supply_kind.clone(),
                pos: pos.to_string(),
            },
            taxable_value,
            tax: TaxSplit::from_row(row, supply_type)?,
            cess: row.amount(Field::Cess)?,
            invoice_amount: row.amount(Field::InvoiceAmount)?,
        }))
    }
}
