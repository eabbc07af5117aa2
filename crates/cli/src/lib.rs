#![deny(missing_docs)]
//! litdoc command-line driver: configuration and the batch pipeline.

/// Batch driver and per-file pipeline.
pub mod batch;
/// Run configuration.
pub mod config;

pub use batch::{BatchSummary, Context, FileOutcome, document_file, run_batch};
pub use config::{Config, ConfigError, DEFAULT_CONFIG_FILE};
