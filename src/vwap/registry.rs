//! C3: immutable mapping from pair to its engine (spec §4.3).

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::EngineError;

use super::engine::PairEngine;
use super::types::PairId;

/// Built once, from the fixed configured pair set, at startup. Never
/// mutated afterward, so `lookup` needs no lock — a deliberate
/// simplification the spec calls out explicitly (§4.3): adding hot-pair
/// registration at runtime would require a different locking discipline.
pub struct EngineRegistry {
    engines: HashMap<PairId, Arc<PairEngine>>,
}

impl EngineRegistry {
    pub fn new(product_ids: &[String], window_size: u16) -> Self {
        let engines = product_ids
            .iter()
            .map(|id| {
                let pair = PairId::from(id.as_str());
                (pair.clone(), Arc::new(PairEngine::new(pair, window_size)))
            })
            .collect();
        Self { engines }
    }

    /// Lock-free lookup over the frozen map.
    pub fn lookup(&self, pair: &str) -> Result<Arc<PairEngine>, EngineError> {
        self.engines
            .get(&PairId::from(pair))
            .cloned()
            .ok_or_else(|| EngineError::UnknownProduct {
                pair: pair.to_string(),
            })
    }
}
