//! Core utilities for droidcfg
//!
//! This crate provides functionality shared by the resolver and the CLI:
//!
//! - **Error handling**: errors with codes, context, recovery suggestions and exit codes
//! - **Validation**: a fluent validator that collects every problem at once
//! - **Configuration**: TOML-based tool configuration with defaults
//!
//! # Example
//!
//! ```rust,no_run
//! use droidcfg_core::config::Config;
//!
//! let config = Config::load(None).expect("invalid .droidcfg.toml");
//! println!("required plugins: {:?}", config.schema.resolver.required_plugins);
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

