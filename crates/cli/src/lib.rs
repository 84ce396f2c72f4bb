//! CLI utilities for droidcfg
//!
//! Provides shared terminal output:
//! - Status messages
//! - Aligned key/value rows
//! - Error and warning reports

#![warn(missing_docs)]

pub mod output;
