//! Running totals for the return.
//!
//! Two independent accumulators are kept: one per B2CS line key and one per
//! e-commerce operator (a single ETIN in practice). Entries are created with
//! an explicit zero record on first use and only ever grow while rows are
//! folded in. Totals stay exact decimals until the report is rendered; a
//! sum that would leave the decimal range fails the conversion.

use std::collections::BTreeMap;

use gstr1_shared::{FilerPolicy, FilingConfig};
use rust_decimal::Decimal;
use tracing::warn;

use crate::classify::{Classification, ClassificationKey, SkipReason, TaxSplit, checked_sum};
use crate::error::{ConvertError, ConvertResult};
use crate::source::InputRow;

/// Tax head totals shared by both accumulators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaxTotals {
    /// IGST total.
    pub igst: Decimal,
    /// CGST total.
    pub cgst: Decimal,
    /// SGST total.
    pub sgst: Decimal,
}

impl TaxTotals {
    /// All heads at zero.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            igst: Decimal::ZERO,
            cgst: Decimal::ZERO,
            sgst: Decimal::ZERO,
        }
    }

    /// Adds one row's tax heads.
    ///
    /// # Errors
    ///
    /// Returns `AmountOutOfRange` if a head overflows.
    pub fn add(&mut self, split: &TaxSplit) -> ConvertResult<()> {
        match *split {
            TaxSplit::Inter { igst } => self.igst = checked_sum(self.igst, igst, "igst")?,
            TaxSplit::Intra { cgst, sgst } => {
                self.cgst = checked_sum(self.cgst, cgst, "cgst")?;
                self.sgst = checked_sum(self.sgst, sgst, "sgst")?;
            }
        }
        Ok(())
    }
}

/// Totals for one B2CS line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineAggregate {
    /// Sum of taxable values.
    pub taxable_value: Decimal,
    /// Tax head sums; only the heads of the key's supply type move.
    pub tax: TaxTotals,
    /// Cess sum.
    pub cess: Decimal,
}

impl LineAggregate {
    /// An empty line.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            taxable_value: Decimal::ZERO,
            tax: TaxTotals::zero(),
            cess: Decimal::ZERO,
        }
    }

    fn add(&mut self, row: &Classification) -> ConvertResult<()> {
        self.taxable_value = checked_sum(self.taxable_value, row.taxable_value, "txval")?;
        self.tax.add(&row.tax)?;
        self.cess = checked_sum(self.cess, row.cess, "csamt")?;
        Ok(())
    }
}

/// Totals for one e-commerce operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorAggregate {
    /// Sum of invoice amounts.
    pub supply_value: Decimal,
    /// Tax head sums.
    pub tax: TaxTotals,
    /// Cess sum.
    pub cess: Decimal,
}

impl CollectorAggregate {
    /// An empty operator entry.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            supply_value: Decimal::ZERO,
            tax: TaxTotals::zero(),
            cess: Decimal::ZERO,
        }
    }

    fn add(&mut self, row: &Classification) -> ConvertResult<()> {
        self.supply_value = checked_sum(self.supply_value, row.invoice_amount, "suppval")?;
        self.tax.add(&row.tax)?;
        self.cess = checked_sum(self.cess, row.cess, "cess")?;
        Ok(())
    }
}

/// Row counters, logged once the input is exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FoldStats {
    /// Rows read from the source.
    pub rows_read: u64,
    /// Rows folded into a B2CS line.
    pub rows_admitted: u64,
    /// Rows skipped for a non-positive taxable value.
    pub skipped_taxable_value: u64,
    /// Rows skipped for a non-positive rate.
    pub skipped_rate: u64,
    /// Admitted rows that also reached the operator entry.
    pub collector_rows: u64,
}

impl FoldStats {
    /// All counters at zero.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            rows_read: 0,
            rows_admitted: 0,
            skipped_taxable_value: 0,
            skipped_rate: 0,
            collector_rows: 0,
        }
    }
}

/// Everything the report builder needs, handed over once.
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    /// Seller GSTIN chosen under the filer policy, if any row was read.
    pub filer: Option<String>,
    /// B2CS line totals.
    pub lines: BTreeMap<ClassificationKey, LineAggregate>,
    /// Operator totals, keyed by ETIN.
    pub collectors: BTreeMap<String, CollectorAggregate>,
    /// Row counters.
    pub stats: FoldStats,
}

/// Folds classified rows into the two accumulators.
pub struct Aggregator<'a> {
    config: &'a FilingConfig,
    filer: Option<String>,
    lines: BTreeMap<ClassificationKey, LineAggregate>,
    collectors: BTreeMap<String, CollectorAggregate>,
    stats: FoldStats,
}

impl<'a> Aggregator<'a> {
    /// Creates an empty aggregator.
    #[must_use]
    pub const fn new(config: &'a FilingConfig) -> Self {
        Self {
            config,
            filer: None,
            lines: BTreeMap::new(),
            collectors: BTreeMap::new(),
            stats: FoldStats::zero(),
        }
    }

    /// Records the seller of a row, whether or not the row is admitted.
    ///
    /// # Errors
    ///
    /// Returns `MixedFilers` under [`FilerPolicy::RejectMixed`] when the
    /// seller differs from the one seen first.
    pub fn observe_seller(&mut self, row: &InputRow) -> ConvertResult<()> {
        self.stats.rows_read += 1;
        match self.filer.as_deref() {
            Some(current) if current != row.seller_gstin => match self.config.filer_policy {
                FilerPolicy::RejectMixed => {
                    return Err(ConvertError::MixedFilers {
                        first: current.to_string(),
                        other: row.seller_gstin.clone(),
                        line: row.line,
                    });
                }
                FilerPolicy::LastWins => {
                    warn!(
                        line = row.line,
                        previous = current,
                        seller = %row.seller_gstin,
                        "Seller GSTIN changed; last row wins"
                    );
                    self.filer = Some(row.seller_gstin.clone());
                }
            },
            Some(_) => {}
            None => self.filer = Some(row.seller_gstin.clone()),
        }
        Ok(())
    }

    /// Counts a row the classifier left out.
    pub fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::NonPositiveTaxableValue => self.stats.skipped_taxable_value += 1,
            SkipReason::NonPositiveRate => self.stats.skipped_rate += 1,
        }
    }

    /// Folds an admitted row into its B2CS line and, when the invoice amount
    /// is positive, into the operator entry.
    ///
    /// Both accumulators receive the same [`TaxSplit`], so one row can never
    /// contribute different tax to the two sections.
    ///
    /// # Errors
    ///
    /// Returns `AmountOutOfRange` if a running total overflows.
    pub fn fold(&mut self, classified: &Classification) -> ConvertResult<()> {
        self.stats.rows_admitted += 1;

        self.lines
            .entry(classified.key.clone())
            .or_insert_with(LineAggregate::zero)
            .add(classified)?;

        if classified.invoice_amount > Decimal::ZERO {
            self.stats.collector_rows += 1;
            self.collectors
                .entry(self.config.collector_etin.clone())
                .or_insert_with(CollectorAggregate::zero)
                .add(classified)?;
        }
        Ok(())
    }

    /// Current counters.
    #[must_use]
    pub const fn stats(&self) -> &FoldStats {
        &self.stats
    }

    /// Consumes the aggregator.
    #[must_use]
    pub fn finish(self) -> Aggregates {
        Aggregates {
            filer: self.filer,
            lines: self.lines,
            collectors: self.collectors,
            stats: self.stats,
        }
    }
}
