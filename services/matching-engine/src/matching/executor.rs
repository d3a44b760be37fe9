//! Trade execution logic
//!
//! Prices a crossing pair and stamps the resulting trade with the book's
//! next sequence number.

use types::ids::OrderId;
use types::order::Order;
use types::trade::{midpoint_price, Trade};

/// Per-book trade generator
#[derive(Debug, Clone)]
pub struct MatchExecutor {
    sequence_counter: u64,
}

impl MatchExecutor {
    /// Create a new match executor with starting sequence number
    pub fn new(starting_sequence: u64) -> Self {
        Self {
            sequence_counter: starting_sequence,
        }
    }

    /// Get next sequence number (monotonically increasing)
    fn next_sequence(&mut self) -> u64 {
        let seq = self.sequence_counter;
        self.sequence_counter += 1;
        seq
    }

    /// Execute a trade between the best bid and best ask
    ///
    /// Price is the integer midpoint of the two limits, rounded down;
    /// quantity is the smaller of the two remaining quantities.
    pub fn execute_trade(&mut self, bid: &Order, ask: &Order, timestamp: i64) -> Trade {
        self.execute_at(
            bid.id,
            ask.id,
            midpoint_price(bid.price, ask.price),
            bid.quantity.min(ask.quantity),
            timestamp,
        )
    }

    fn execute_at(
        &mut self,
        bid_order_id: OrderId,
        ask_order_id: OrderId,
        price: u64,
        quantity: u64,
        timestamp: i64,
    ) -> Trade {
        Trade {
            sequence: self.next_sequence(),
            price,
            quantity,
            timestamp,
            bid_order_id,
            ask_order_id,
        }
    }
}

impl Default for MatchExecutor {
    fn default() -> Self {
        Self::new(1)
    }
}
