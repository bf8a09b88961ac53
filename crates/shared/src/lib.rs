//! Shared types, errors, and configuration for the GSTR-1 converter.
//!
//! This crate provides common pieces used by the core pipeline and the CLI:
//! - Money rounding rules for return amounts
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use self::config::{AppConfig, FilerPolicy, FilingConfig};
pub use self::error::{AppError, AppResult};
