//! Return document builder.

use std::collections::BTreeMap;

use gstr1_shared::FilingConfig;
use gstr1_shared::types::{round_cents, round_whole};
use rust_decimal::Decimal;

use super::types::{B2csEntry, CollectorEntry, LineTax, Report, Supeco};
use crate::aggregate::{Aggregates, CollectorAggregate, LineAggregate};
use crate::classify::ClassificationKey;
use crate::error::{ConvertError, ConvertResult};
use crate::jurisdiction::SupplyType;

/// Builds the GSTR-1 document from accumulated totals.
pub struct ReportBuilder;

impl ReportBuilder {
    /// Generates the return, consuming the accumulators.
    ///
    /// The filer is the seller chosen while folding; a source without any
    /// rows yields an empty GSTIN.
    ///
    /// # Errors
    ///
    /// Returns `AmountOutOfRange` if a total cannot be rendered.
    pub fn build(
        aggregates: Aggregates,
        period: &str,
        config: &FilingConfig,
    ) -> ConvertResult<Report> {
        Ok(Report {
            gstin: aggregates.filer.unwrap_or_default(),
            fp: period.to_string(),
            version: config.version.clone(),
            hash: config.hash.clone(),
            b2cs: Self::line_items(&aggregates.lines)?,
            supeco: Supeco {
                clttx: Self::collector_entries(&aggregates.collectors, &config.collector_flag)?,
            },
        })
    }

    /// Renders B2CS lines. Lines without a positive taxable value are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns `AmountOutOfRange` if a total cannot be rendered.
    pub fn line_items(
        lines: &BTreeMap<ClassificationKey, LineAggregate>,
    ) -> ConvertResult<Vec<B2csEntry>> {
        lines
            .iter()
            .filter(|(_, line)| line.taxable_value > Decimal::ZERO)
            .map(|(key, line)| -> ConvertResult<B2csEntry> {
                let tax = match key.supply_type {
                    SupplyType::Inter => LineTax::Inter {
                        igst: whole(line.tax.igst, "iamt")?,
                    },
                    SupplyType::Intra => LineTax::Intra {
                        cgst: whole(line.tax.cgst, "camt")?,
                        sgst: whole(line.tax.sgst, "samt")?,
                    },
                };
                Ok(B2csEntry {
                    supply_type: key.supply_type,
                    rate: key.rate,
                    kind: key.kind.clone(),
                    pos: key.pos.clone(),
                    taxable_value: round_cents(line.taxable_value),
                    cess: whole(line.cess, "csamt")?,
                    tax,
                })
            })
            .collect()
    }

    /// Renders operator entries. Entries without a positive supply value
    /// are dropped.
    ///
    /// # Errors
    ///
    /// Returns `AmountOutOfRange` if a total cannot be rendered.
    pub fn collector_entries(
        collectors: &BTreeMap<String, CollectorAggregate>,
        flag: &str,
    ) -> ConvertResult<Vec<CollectorEntry>> {
        collectors
            .iter()
            .filter(|(_, c)| c.supply_value > Decimal::ZERO)
            .map(|(etin, c)| -> ConvertResult<CollectorEntry> {
                Ok(CollectorEntry {
                    etin: etin.clone(),
                    supply_value: round_cents(c.supply_value),
                    igst: whole(c.tax.igst, "igst")?,
                    cgst: whole(c.tax.cgst, "cgst")?,
                    sgst: whole(c.tax.sgst, "sgst")?,
                    cess: whole(c.cess, "cess")?,
                    flag: flag.to_string(),
                })
            })
            .collect()
    }
}

fn whole(value: Decimal, field: &'static str) -> ConvertResult<i64> {
    round_whole(value).ok_or(ConvertError::AmountOutOfRange { field })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::TaxTotals;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn key(supply_type: SupplyType, rate: i64, pos: &str) -> ClassificationKey {
        ClassificationKey {
            supply_type,
            rate,
            kind: "OE".to_string(),
            pos: pos.to_string(),
        }
    }

    #[test]
    fn test_inter_line_shape() {
        let mut lines = BTreeMap::new();
        lines.insert(
            key(SupplyType::Inter, 18, "97"),
            LineAggregate {
                taxable_value: dec!(500),
                tax: TaxTotals {
                    igst: dec!(90),
                    ..TaxTotals::zero()
                },
                cess: Decimal::ZERO,
            },
        );

        let items = ReportBuilder::line_items(&lines).unwrap();
        assert_eq!(
            serde_json::to_value(&items).unwrap(),
            json!([{
                "sply_ty": "INTER",
                "rt": 18,
                "typ": "OE",
                "pos": "97",
                "txval": 500.0,
                "csamt": 0,
                "iamt": 90
            }])
        );
    }

    #[test]
    fn test_intra_line_shape() {
        let mut lines = BTreeMap::new();
        lines.insert(
            key(SupplyType::Intra, 18, "33"),
            LineAggregate {
                taxable_value: dec!(1000.00),
                tax: TaxTotals {
                    cgst: dec!(90.00),
                    sgst: dec!(90.00),
                    ..TaxTotals::zero()
                },
                cess: dec!(0.5),
            },
        );

        let items = ReportBuilder::line_items(&lines).unwrap();
        assert_eq!(
            serde_json::to_value(&items).unwrap(),
            json!([{
                "sply_ty": "INTRA",
                "rt": 18,
                "typ": "OE",
                "pos": "33",
                "txval": 1000.0,
                "csamt": 1,
                "camt": 90,
                "samt": 90
            }])
        );
    }

    #[test]
    fn test_rounding_of_line_amounts() {
        let mut lines = BTreeMap::new();
        lines.insert(
            key(SupplyType::Inter, 12, "29"),
            LineAggregate {
                taxable_value: dec!(123.455),
                tax: TaxTotals {
                    igst: dec!(14.5),
                    ..TaxTotals::zero()
                },
                cess: dec!(0.49),
            },
        );

        let items = ReportBuilder::line_items(&lines).unwrap();
        assert_eq!(items[0].taxable_value, dec!(123.46));
        assert_eq!(items[0].tax, LineTax::Inter { igst: 15 });
        assert_eq!(items[0].cess, 0);
    }

    #[test]
    fn test_non_positive_lines_dropped() {
        let mut lines = BTreeMap::new();
        lines.insert(key(SupplyType::Inter, 18, "29"), LineAggregate::zero());
        lines.insert(
            key(SupplyType::Inter, 5, "29"),
            LineAggregate {
                taxable_value: dec!(-10),
                ..LineAggregate::zero()
            },
        );
        assert!(ReportBuilder::line_items(&lines).unwrap().is_empty());
    }

    #[test]
    fn test_collector_entry_shape() {
        let mut collectors = BTreeMap::new();
        collectors.insert(
            "33AAICA3918J1C0".to_string(),
            CollectorAggregate {
                supply_value: dec!(300),
                tax: TaxTotals {
                    igst: dec!(30),
                    cgst: dec!(4.5),
                    sgst: dec!(4.5),
                },
                cess: Decimal::ZERO,
            },
        );
        collectors.insert("29EMPTY0000E1Z0".to_string(), CollectorAggregate::zero());

        let entries = ReportBuilder::collector_entries(&collectors, "N").unwrap();
        assert_eq!(
            serde_json::to_value(&entries).unwrap(),
            json!([{
                "etin": "33AAICA3918J1C0",
                "suppval": 300.0,
                "igst": 30,
                "cgst": 5,
                "sgst": 5,
                "cess": 0,
                "flag": "N"
            }])
        );
    }

    #[test]
    fn test_build_stamps_config() {
        let config = FilingConfig::default();
        let aggregates = Aggregates {
            filer: Some("33ABCDE1234F1Z5".to_string()),
            ..Aggregates::default()
        };

        let report = ReportBuilder::build(aggregates, "042024", &config).unwrap();
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "gstin": "33ABCDE1234F1Z5",
                "fp": "042024",
                "version": "GST3.1.6",
                "hash": "hash",
                "b2cs": [],
                "supeco": { "clttx": [] }
            })
        );
    }

    #[test]
    fn test_out_of_range_amount() {
        let mut lines = BTreeMap::new();
        lines.insert(
            key(SupplyType::Inter, 18, "29"),
            LineAggregate {
                taxable_value: dec!(1),
                tax: TaxTotals {
                    igst: Decimal::MAX,
                    ..TaxTotals::zero()
                },
                cess: Decimal::ZERO,
            },
        );
        assert!(matches!(
            ReportBuilder::line_items(&lines),
            Err(ConvertError::AmountOutOfRange { field: "iamt" })
        ));
    }
}
