//! End-to-end conversion: sales report in, GSTR-1 document out.

use std::io::Read;
use std::path::Path;

use gstr1_shared::FilingConfig;
use tracing::{debug, info, warn};

use crate::aggregate::Aggregator;
use crate::classify::{Admission, Classifier};
use crate::error::ConvertResult;
use crate::report::{Report, ReportBuilder};
use crate::source::RowSource;

/// Converts a delimited sales report into a GSTR-1 return.
///
/// The source is consumed in a single pass. `period` is copied into the
/// document as given; a value that does not look like `MMYYYY` is logged
/// but not rejected.
///
/// # Errors
///
/// Returns the first `MissingField`, `Parse`, `Csv`, `MixedFilers`, or
/// `AmountOutOfRange` error met.
pub fn build_report<R: Read>(
    source: R,
    period: &str,
    config: &FilingConfig,
) -> ConvertResult<Report> {
    convert(RowSource::new(source)?, period, config)
}

/// Opens a sales report on disk and converts it.
///
/// # Errors
///
/// Returns `SourceUnavailable` if the file cannot be opened, otherwise as
/// [`build_report`].
pub fn build_report_from_path(
    path: impl AsRef<Path>,
    period: &str,
    config: &FilingConfig,
) -> ConvertResult<Report> {
    let path = path.as_ref();
    info!(path = %path.display(), period, "Converting sales report");
    convert(RowSource::open(path)?, period, config)
}

fn convert<R: Read>(
    rows: RowSource<R>,
    period: &str,
    config: &FilingConfig,
) -> ConvertResult<Report> {
    if !is_filing_period(period) {
        warn!(period, "Filing period is not in MMYYYY form");
    }

    let classifier = Classifier::new(config);
    let mut aggregator = Aggregator::new(config);

    for row in rows {
        let row = row?;
        aggregator.observe_seller(&row)?;
        match classifier.classify(&row)? {
            Admission::Admitted(classified) => aggregator.fold(&classified)?,
            Admission::Skipped(reason) => {
                debug!(line = row.line, reason = reason.as_str(), "Skipping row");
                aggregator.record_skip(reason);
            }
        }
    }

    let aggregates = aggregator.finish();
    let stats = aggregates.stats;
    let report = ReportBuilder::build(aggregates, period, config)?;

    info!(
        rows_read = stats.rows_read,
        rows_admitted = stats.rows_admitted,
        skipped_taxable_value = stats.skipped_taxable_value,
        skipped_rate = stats.skipped_rate,
        b2cs_lines = report.b2cs.len(),
        collectors = report.supeco.clttx.len(),
        "Conversion finished"
    );

    Ok(report)
}

/// True for a two-digit month (01-12) followed by a four-digit year.
#[must_use]
pub fn is_filing_period(period: &str) -> bool {
    if period.len() != 6 || !period.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    matches!(period.get(..2).and_then(|m| m.parse::<u8>().ok()), Some(1..=12))
}
