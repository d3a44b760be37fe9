//! Trade execution types

use crate::ids::OrderId;
use serde::{Deserialize, Serialize};

/// An executed trade, appended to the symbol's transaction log
///
/// Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Per-symbol monotonic sequence, starting at 1
    pub sequence: u64,
    pub price: u64,
    pub quantity: u64,
    /// Unix nanos
    pub timestamp: i64,
    pub bid_order_id: OrderId,
    pub ask_order_id: OrderId,
}

/// Execution price for a crossing bid/ask pair: the midpoint, rounded down
///
/// Computed in `u128` so that two prices near `u64::MAX` do not overflow.
pub fn midpoint_price(bid_price: u64, ask_price: u64) -> u64 {
    ((bid_price as u128 + ask_price as u128) / 2) as u64
}
