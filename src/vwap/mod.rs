//! The streaming VWAP core: window, pair engine, registry, object pools,
//! and the shared data model (spec §3, §4.1-§4.3).

pub mod engine;
pub mod pool;
pub mod registry;
pub mod types;
pub mod window;

pub use engine::PairEngine;
pub use pool::{SlotPool, TradePool};
pub use registry::EngineRegistry;
pub use types::{PairId, Trade, VwapResult};
