//! C6: fixed-size worker pool draining the trade queue (spec §4.5).
//!
//! Workers run as tokio tasks rather than OS threads — the spec requires
//! parallelism, not merely concurrency, and a multi-threaded tokio runtime
//! schedules these tasks across cores exactly like the original's
//! `errgroup`-managed goroutines (see `workflow/pool.go` in
//! `original_source/`). Each worker loops: pull a trade, look it up in the
//! registry, aggregate, push the result, recycle. A per-trade error (an
//! unknown pair) is logged and the trade dropped; the pool itself never
//! stops because of it (spec §4.5, §7.3).
//!
//! Shutdown is channel-close driven, not signal-driven: the supervisor
//! closes the trade queue (C4) on cancellation (see `Supervisor::cancel`),
//! and a worker simply keeps calling `trade_rx.recv()` until it returns
//! `None` — i.e. until C4 is closed *and* fully drained — then exits (spec
//! §4.4, "Workers drain C4 until closed-and-empty, then exit"; §5(2),
//! "workers finish the current trade, then exit on next empty read").

use std::sync::Arc;
use tracing::{debug, error};

use crate::vwap::{EngineRegistry, SlotPool, Trade, TradePool};

use super::queue::{ResultSender, TradeReceiver};

/// Spawns one worker task. Returns its `JoinHandle` so the supervisor can
/// await orderly shutdown.
pub fn spawn(
    worker_id: usize,
    trade_rx: TradeReceiver,
    result_tx: ResultSender,
    registry: Arc<EngineRegistry>,
    trade_pool: Arc<TradePool>,
    slot_pool: Arc<SlotPool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(trade) = trade_rx.recv().await {
            process_one(worker_id, trade, &result_tx, &registry, &trade_pool, &slot_pool).await;
        }
        debug!(worker = worker_id, "worker exiting");
    })
}

async fn process_one(
    worker_id: usize,
    mut trade: Trade,
    result_tx: &ResultSender,
    registry: &EngineRegistry,
    trade_pool: &TradePool,
    slot_pool: &SlotPool,
) {
    match registry.lookup(trade.pair.as_str()) {
        Ok(engine) => {
            let price = std::mem::replace(&mut trade.price, bigdecimal::BigDecimal::from(0));
            let size = std::mem::replace(&mut trade.size, bigdecimal::BigDecimal::from(0));
            let result = engine.ingest(price, size, slot_pool);
            debug!(worker = worker_id, pair = %result.pair, vwap = %result.vwap, "produced result");
            if result_tx.send(result).await.is_err() {
                // C5 closed under us; the supervisor is tearing down.
            }
        }
        Err(err) => {
            error!(worker = worker_id, pair = %trade.pair, error = %err, "dropping trade");
        }
    }

    // Return the emptied trade shell to the pool rather than allocating a
    // fresh one — `submit_trade` overwrites all three fields on reuse.
    trade_pool.put(trade);
}
