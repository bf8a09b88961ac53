//! Common types used across the application.

pub mod money;

pub use money::{basis_rate, round_cents, round_whole};
