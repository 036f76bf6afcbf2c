//! # callscope-core
//!
//! Core types for the callscope call-graph engine.
//! Provides errors, configuration, tracing setup, shared collections,
//! and constants used by the analysis crate and the CLI.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;
