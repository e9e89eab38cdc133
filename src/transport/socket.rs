//! Websocket ingestor: connects to the trade feed, subscribes, and turns
//! `match`/`last_match` messages into submissions on the pipeline.
//!
//! Grounded in the teacher's reconnect loop (`src/edge/receiver.rs`) and in
//! the original's `workflow/stream.go` `ingestTradesStream`, whose message
//! dispatch (`subscriptions` / `match` / `last_match` / `error` / unknown)
//! is reproduced unchanged: `match` and `last_match` are handled identically,
//! per the original, since both carry a completed trade.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::pipeline::Supervisor;
use crate::vwap::types::PairId;

use super::messages::{
    FeedMessage, SubscribeRequest, ERROR_TYPE, LAST_MATCH_TYPE, MATCH_TYPE, SUB_ACK_TYPE,
};

const INITIAL_RECONNECT_DELAY: Duration = Duration::from_millis(100);
const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(30);
const CLOSE_GRACE: Duration = Duration::from_secs(1);

pub struct Ingestor {
    socket_url: String,
    product_ids: Vec<String>,
}

impl Ingestor {
    pub fn new(socket_url: String, product_ids: Vec<String>) -> Self {
        Self {
            socket_url,
            product_ids,
        }
    }

    /// Runs the connect/subscribe/read/reconnect loop until `cancel_rx`
    /// reports cancellation. Each ingested `match`/`last_match` trade is
    /// handed to `supervisor.submit_trade`, which applies C4's backpressure.
    pub async fn run(self, supervisor: Arc<Supervisor>, mut cancel_rx: watch::Receiver<bool>) -> Result<()> {
        let mut reconnect_delay = INITIAL_RECONNECT_DELAY;

        while !*cancel_rx.borrow() {
            info!(url = %self.socket_url, "connecting to trade feed");
            match tokio_tungstenite::connect_async(&self.socket_url).await {
                Ok((stream, _response)) => {
                    reconnect_delay = INITIAL_RECONNECT_DELAY;
                    let (mut write, mut read) = stream.split();

                    let sub = SubscribeRequest::new(&self.product_ids);
                    let sub_json = serde_json::to_string(&sub)
                        .context("failed to encode subscribe request")?;
                    if let Err(err) = write.send(Message::Text(sub_json)).await {
                        error!(error = %err, "failed to send subscribe request");
                        self.sleep_before_reconnect(&mut reconnect_delay).await;
                        continue;
                    }

                    loop {
                        tokio::select! {
                            biased;
                            _ = cancel_rx.changed() => {
                                if *cancel_rx.borrow() {
                                    Self::close_gracefully(&mut write, &mut read).await;
                                    return Ok(());
                                }
                            }
                            msg = read.next() => {
                                match msg {
                                    Some(Ok(Message::Text(text))) => {
                                        self.handle_message(&text, &supervisor).await;
                                    }
                                    Some(Ok(Message::Ping(payload))) => {
                                        let _ = write.send(Message::Pong(payload)).await;
                                    }
                                    Some(Ok(Message::Close(_))) => {
                                        info!("feed closed the connection");
                                        break;
                                    }
                                    Some(Ok(_)) => {}
                                    Some(Err(err)) => {
                                        warn!(error = %err, "feed read error");
                                        break;
                                    }
                                    None => {
                                        info!("feed stream ended");
                                        break;
                                    }
                                }
                            }
                        }
                    }
                }
                Err(err) => {
                    error!(error = %err, "connection to trade feed failed");
                }
            }

            if *cancel_rx.borrow() {
                return Ok(());
            }
            self.sleep_before_reconnect(&mut reconnect_delay).await;
        }
        Ok(())
    }

    async fn sleep_before_reconnect(&self, delay: &mut Duration) {
        info!(delay_ms = delay.as_millis(), "reconnecting after delay");
        tokio::time::sleep(*delay).await;
        *delay = (*delay * 2).min(MAX_RECONNECT_DELAY);
    }

    async fn handle_message(&self, text: &str, supervisor: &Arc<Supervisor>) {
        let msg: FeedMessage = match serde_json::from_str(text) {
            Ok(msg) => msg,
            Err(err) => {
                warn!(error = %err, "failed to decode feed message");
                return;
            }
        };

        match msg.msg_type.as_str() {
            SUB_ACK_TYPE => info!("subscribed"),
            MATCH_TYPE | LAST_MATCH_TYPE => {
                let (Some(price), Some(size)) = (msg.price, msg.size) else {
                    warn!(product_id = %msg.product_id, "match message missing price or size");
                    return;
                };
                let pair = PairId::from(msg.product_id.as_str());
                debug!(pair = %pair, %price, %size, "received trade");
                if supervisor.submit_trade(pair, price, size).await.is_err() {
                    debug!("trade queue closed; dropping remaining feed messages");
                }
            }
            ERROR_TYPE => warn!(reason = %msg.reason, message = %msg.message, "feed reported an error"),
            other => debug!(msg_type = %other, "ignoring unrecognized feed message"),
        }
    }

    /// Sends a close frame and waits briefly for the server to acknowledge,
    /// mirroring the original's `gracefulSocketClose` (1 second timeout).
    async fn close_gracefully<S, R>(write: &mut S, read: &mut R)
    where
        S: futures_util::Sink<Message> + Unpin,
        R: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
            + Unpin,
    {
        let _ = write.send(Message::Close(None)).await;

        let drain = async {
            while let Some(msg) = read.next().await {
                if matches!(msg, Ok(Message::Close(_)) | Err(_)) {
                    break;
                }
            }
        };
        let _ = tokio::time::timeout(CLOSE_GRACE, drain).await;
    }
}
