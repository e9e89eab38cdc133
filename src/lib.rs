//! Streaming VWAP engine.
//!
//! Exposes the core ingestion pipeline (queue, worker pool, cancellation),
//! the per-pair sliding-window aggregator, and the config/error/transport
//! glue used by the `vwap` binary.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod transport;
pub mod vwap;

pub use config::Config;
pub use error::{ConfigError, EngineError};
pub use pipeline::supervisor::Supervisor;
pub use vwap::types::{PairId, Trade, VwapResult};
