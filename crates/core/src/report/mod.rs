//! GSTR-1 document generation.
//!
//! Turns the accumulated totals into the return document:
//! - B2CS lines (one per supply type, rate, and place of supply)
//! - The `supeco` section with e-commerce operator totals

pub mod service;
pub mod types;


pub use service::ReportBuilder;
pub use types::*;
