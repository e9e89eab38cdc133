//! Error taxonomy (spec §7).
//!
//! Config errors are fatal at startup; engine errors are per-trade and
//! absorbed by the worker that raised them. Invariant violations (empty
//! pop, full push, negative sum) are programming errors and panic rather
//! than flow through either enum.

use std::fmt;

/// Invalid or missing configuration, raised before the pipeline is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `worker_pool_size` was zero.
    ZeroWorkerPoolSize,
    /// `window_size` was zero.
    ZeroWindowSize,
    /// `product_ids` was empty.
    NoProductIds,
    /// A product ID did not match the expected pair pattern.
    InvalidProductId { id: String, reason: String },
    /// The config file at the given path could not be read or parsed.
    ConfigFile { path: String, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroWorkerPoolSize => {
                write!(f, "worker_pool_size must be greater than zero")
            }
            Self::ZeroWindowSize => write!(f, "window_size must be at least 1"),
            Self::NoProductIds => write!(f, "product_ids must not be empty"),
            Self::InvalidProductId { id, reason } => {
                write!(f, "invalid product id '{id}': {reason}")
            }
            Self::ConfigFile { path, reason } => {
                write!(f, "failed to load config file '{path}': {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Runtime error raised while routing or aggregating a single trade.
///
/// Never fatal: the worker pool logs and discards the offending trade and
/// continues (spec §4.5, §7.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The trade's pair is not in the fixed, pre-configured product set.
    UnknownProduct { pair: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownProduct { pair } => {
                write!(f, "product id '{pair}' is not tracked by this engine")
            }
        }
    }
}

impl std::error::Error for EngineError {}
