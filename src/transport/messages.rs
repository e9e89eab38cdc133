//! Wire shapes for the trade feed, matching the original's `types.SubReq` /
//! `types.TradeMsg` (see `original_source/types/msgs.go`).

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

pub const SUB_REQ_TYPE: &str = "subscribe";
pub const SUB_ACK_TYPE: &str = "subscriptions";
pub const MATCH_TYPE: &str = "match";
pub const LAST_MATCH_TYPE: &str = "last_match";
pub const ERROR_TYPE: &str = "error";
const MATCHES_CHANNEL: &str = "matches";

/// `{"type":"subscribe","product_ids":["BTC-USD","ETH-USD"],"channels":["matches"]}`
#[derive(Debug, Serialize)]
pub struct SubscribeRequest {
    #[serde(rename = "type")]
    pub msg_type: &'static str,
    pub product_ids: Vec<String>,
    pub channels: Vec<&'static str>,
}

impl SubscribeRequest {
    pub fn new(product_ids: &[String]) -> Self {
        Self {
            msg_type: SUB_REQ_TYPE,
            product_ids: product_ids.to_vec(),
            channels: vec![MATCHES_CHANNEL],
        }
    }
}

/// Any inbound feed message. Carries more fields than any single variant
/// needs, since the feed interleaves subscription acks, matches, and
/// errors on the same socket.
#[derive(Debug, Deserialize)]
pub struct FeedMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub product_id: String,
    pub size: Option<BigDecimal>,
    pub price: Option<BigDecimal>,
}
