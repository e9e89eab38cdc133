//! Shared data model (spec §3): trade events, window slots, and results.

use std::fmt;
use std::sync::Arc;

use bigdecimal::BigDecimal;

/// An opaque, cheaply-cloneable interned trading pair identifier, e.g.
/// `BTC-USD`. Cloning a `PairId` bumps an `Arc` refcount rather than
/// allocating a new string, since the same handful of pairs flow through
/// every trade and result on the hot path.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PairId(Arc<str>);

impl PairId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PairId {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for PairId {
    fn from(s: String) -> Self {
        Self(Arc::from(s.as_str()))
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single executed trade, already parsed, ready for ingestion.
///
/// Lives from enqueue on the trade queue until a worker returns it (and its
/// two decimal fields) to the object pool after aggregation (spec §3).
#[derive(Debug, Clone)]
pub struct Trade {
    pub pair: PairId,
    pub price: BigDecimal,
    pub size: BigDecimal,
}

impl Trade {
    pub fn new(pair: PairId, price: BigDecimal, size: BigDecimal) -> Self {
        Self { pair, price, size }
    }
}

/// One window entry: the price*size and size contribution of a single
/// trade, immutable once stored (spec §3, "Window slot").
#[derive(Debug, Clone)]
pub struct Slot {
    pub pv: BigDecimal,
    pub v: BigDecimal,
}

impl Slot {
    pub fn zeroed() -> Self {
        Self {
            pv: BigDecimal::from(0),
            v: BigDecimal::from(0),
        }
    }

    /// Resets this slot in place so the pool hands out a cleared object.
    pub fn recycle(&mut self, pv: BigDecimal, v: BigDecimal) {
        self.pv = pv;
        self.v = v;
    }
}

/// One VWAP update for a pair, emitted after every ingested trade.
#[derive(Debug, Clone)]
pub struct VwapResult {
    pub pair: PairId,
    pub vwap: BigDecimal,
}
