//! C4 (trade queue) and C5 (result queue): bounded FIFO channels (spec
//! §4.4).
//!
//! Both are built on `tokio::sync::mpsc`. The result queue (C5) is
//! naturally multi-producer/single-consumer, which is exactly what
//! `mpsc` provides. The trade queue (C4) needs the opposite shape —
//! single-producer, multi-consumer, since the whole worker pool drains
//! it — so the receiving half is wrapped in a `tokio::sync::Mutex` shared
//! across workers: a worker holds the lock only for the duration of one
//! `recv`, then releases it to process the trade, giving every worker a
//! fair shot at the next item without serializing the actual aggregation
//! work.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::vwap::Trade;
use crate::vwap::VwapResult;

pub type TradeSender = mpsc::Sender<Trade>;
pub type ResultSender = mpsc::Sender<VwapResult>;
pub type ResultReceiver = mpsc::Receiver<VwapResult>;

/// Shared consumer handle for the trade queue (C4). Cloning shares the
/// same underlying receiver.
#[derive(Clone)]
pub struct TradeReceiver {
    inner: Arc<Mutex<mpsc::Receiver<Trade>>>,
}

impl TradeReceiver {
    /// Awaits the next trade, or `None` once the queue is closed and
    /// drained. Cancel-safe: if the surrounding `select!` drops this
    /// future before it resolves, no trade is lost and no other waiter is
    /// starved, since both the mutex acquisition and the inner `recv` are
    /// themselves cancel-safe.
    pub async fn recv(&self) -> Option<Trade> {
        self.inner.lock().await.recv().await
    }
}

/// Creates the trade queue (C4) with the given bounded capacity
/// (`worker_pool_size`, per spec §4.4).
pub fn trade_queue(capacity: usize) -> (TradeSender, TradeReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (
        tx,
        TradeReceiver {
            inner: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Creates the result queue (C5) with the given bounded capacity
/// (`window_size`, per spec §4.4).
pub fn result_queue(capacity: usize) -> (ResultSender, ResultReceiver) {
    mpsc::channel(capacity)
}
