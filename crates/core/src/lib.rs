//! Core conversion logic for GSTR-1 returns.
//!
//! This crate turns a marketplace sales report into the GSTR-1 JSON
//! document. It reads from any `std::io::Read`; choosing files, prompting,
//! and writing the result are left to the caller.
//!
//! # Modules
//!
//! - `source` - Sales report reader
//! - `jurisdiction` - State name to place-of-supply code
//! - `classify` - Row admission and B2CS line keys
//! - `aggregate` - Exact-decimal running totals
//! - `report` - Return document types and builder
//! - `pipeline` - `build_report` entry points

pub mod aggregate;
pub mod classify;
pub mod error;
pub mod jurisdiction;
pub mod pipeline;
pub mod report;
pub mod source;

pub use error::{ConvertError, ConvertResult};
pub use pipeline::{build_report, build_report_from_path};
pub use report::{Report, ReportBuilder};
