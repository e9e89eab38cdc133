//! C7: owns the registry, the two queues, and the worker pool; starts
//! workers and drives orderly, cancellation-aware shutdown (spec §4.6).

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bigdecimal::BigDecimal;
use futures_util::future::join_all;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::Config;
use crate::vwap::types::PairId;
use crate::vwap::{EngineRegistry, SlotPool, Trade, TradePool, VwapResult};

use super::queue::{result_queue, trade_queue, ResultReceiver, TradeSender};
use super::worker;

/// Grace period the supervisor gives the worker pool to exit after
/// cancellation before abandoning it (spec §4.6, §5).
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// The trade queue (C4) was closed; `submit_trade` can no longer accept
/// new work. Raised only after cancellation has begun.
#[derive(Debug)]
pub struct QueueClosed;

impl fmt::Display for QueueClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trade queue is closed")
    }
}

impl std::error::Error for QueueClosed {}

pub struct Supervisor {
    // `None` once `cancel` has closed the trade queue (C4); dropping the
    // sender is what lets every worker's `recv()` eventually return `None`
    // once the queue is drained, rather than discarding whatever is still
    // queued (spec §4.4, §4.6).
    trade_tx: Mutex<Option<TradeSender>>,
    result_rx: Mutex<ResultReceiver>,
    workers: Mutex<Vec<tokio::task::JoinHandle<()>>>,
    trade_pool: Arc<TradePool>,
}

impl Supervisor {
    /// Start: constructs the registry from `config`, allocates both
    /// queues, and spawns `config.worker_pool_size` workers (spec §4.6
    /// step 1).
    pub fn start(config: &Config) -> Self {
        let registry = Arc::new(EngineRegistry::new(
            &config.product_ids,
            config.window_size,
        ));
        let slot_pool = Arc::new(SlotPool::new());
        let trade_pool = Arc::new(TradePool::new());

        let (trade_tx, trade_rx) = trade_queue(config.worker_pool_size as usize);
        let (result_tx, result_rx) = result_queue(config.window_size as usize);

        let mut workers = Vec::with_capacity(config.worker_pool_size as usize);
        for id in 0..config.worker_pool_size {
            workers.push(worker::spawn(
                id as usize,
                trade_rx.clone(),
                result_tx.clone(),
                registry.clone(),
                trade_pool.clone(),
                slot_pool.clone(),
            ));
        }
        // `result_tx` itself is not retained: C5 closes once every worker's
        // clone has been dropped, i.e. once the whole pool has exited.
        drop(result_tx);

        info!(
            workers = config.worker_pool_size,
            window = config.window_size,
            pairs = config.product_ids.len(),
            "pipeline started"
        );

        Self {
            trade_tx: Mutex::new(Some(trade_tx)),
            result_rx: Mutex::new(result_rx),
            workers: Mutex::new(workers),
            trade_pool,
        }
    }

    /// Input sink: `submit_trade(pair, price, size)` (spec §6). Blocks
    /// under backpressure when the trade queue is full — the sole
    /// mechanism absorbing feed bursts without unbounded memory growth
    /// (spec §4.4).
    pub async fn submit_trade(
        &self,
        pair: PairId,
        price: BigDecimal,
        size: BigDecimal,
    ) -> Result<(), QueueClosed> {
        let trade = match self.trade_pool.get() {
            Some(mut recycled) => {
                recycled.pair = pair;
                recycled.price = price;
                recycled.size = size;
                recycled
            }
            None => Trade::new(pair, price, size),
        };
        match self.trade_tx.lock().await.as_ref() {
            Some(tx) => tx.send(trade).await.map_err(|_| QueueClosed),
            None => Err(QueueClosed),
        }
    }

    /// Output source: pulls the next VWAP result, or `None` once C5 is
    /// closed and drained (spec §6).
    pub async fn next_result(&self) -> Option<VwapResult> {
        self.result_rx.lock().await.recv().await
    }

    /// Cancel: closes the trade queue (C4) so every worker's `recv()` drains
    /// whatever is still queued and then returns `None`, then waits for the
    /// whole pool to exit (bounded by a 1 second grace period), after which
    /// C5 closes on its own as the workers' `ResultSender` clones are
    /// dropped (spec §4.4, §4.6 step 3, §5).
    pub async fn cancel(&self) {
        self.trade_tx.lock().await.take();

        let handles = {
            let mut guard = self.workers.lock().await;
            std::mem::take(&mut *guard)
        };

        match tokio::time::timeout(SHUTDOWN_GRACE, join_all(handles)).await {
            Ok(_) => info!("all workers exited cleanly"),
            Err(_) => warn!(
                grace_ms = SHUTDOWN_GRACE.as_millis(),
                "shutdown grace period elapsed; abandoning remaining workers"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            worker_pool_size: 4,
            window_size: 10,
            product_ids: vec!["BTC-USD".to_string()],
            socket_url: "wss://example.invalid".to_string(),
            devlogging: false,
        }
    }

    #[tokio::test]
    async fn submit_then_receive_one_result() {
        let sup = Supervisor::start(&test_config());
        sup.submit_trade(PairId::from("BTC-USD"), BigDecimal::from(2), BigDecimal::from(1))
            .await
            .unwrap();
        let result = sup.next_result().await.expect("expected a result");
        assert_eq!(result.pair.as_str(), "BTC-USD");
        sup.cancel().await;
    }

    #[tokio::test]
    async fn unknown_pair_yields_no_result() {
        let sup = Supervisor::start(&test_config());
        sup.submit_trade(PairId::from("ZZZ-ZZZ"), BigDecimal::from(2), BigDecimal::from(1))
            .await
            .unwrap();
        sup.submit_trade(PairId::from("BTC-USD"), BigDecimal::from(3), BigDecimal::from(1))
            .await
            .unwrap();
        let result = sup.next_result().await.expect("expected one result, for BTC-USD");
        assert_eq!(result.pair.as_str(), "BTC-USD");
        sup.cancel().await;
    }

    #[tokio::test]
    async fn cancel_drains_and_closes_result_queue() {
        let sup = Supervisor::start(&test_config());
        sup.submit_trade(PairId::from("BTC-USD"), BigDecimal::from(1), BigDecimal::from(1))
            .await
            .unwrap();
        sup.cancel().await;
        // Buffered result (if any raced in before cancellation) drains
        // first, then the channel reports closed.
        while let Some(_r) = sup.next_result().await {}
        assert!(sup.next_result().await.is_none());
    }

    #[tokio::test]
    async fn cancel_still_delivers_results_for_trades_submitted_before_it() {
        let sup = Supervisor::start(&test_config());
        for _ in 0..3 {
            sup.submit_trade(PairId::from("BTC-USD"), BigDecimal::from(2), BigDecimal::from(1))
                .await
                .unwrap();
        }
        sup.cancel().await;

        let mut results = Vec::new();
        while let Some(r) = sup.next_result().await {
            results.push(r);
        }
        assert_eq!(results.len(), 3, "all three queued trades must be drained, not dropped");
    }

    #[tokio::test]
    async fn submit_after_cancel_is_rejected() {
        let sup = Supervisor::start(&test_config());
        sup.cancel().await;
        let err = sup
            .submit_trade(PairId::from("BTC-USD"), BigDecimal::from(1), BigDecimal::from(1))
            .await;
        assert!(err.is_err());
    }
}
