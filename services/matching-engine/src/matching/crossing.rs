//! Crossing detection logic
//!
//! Determines when a bid and ask can match based on price compatibility

/// A bid and an ask cross when the bid is at or above the ask
pub fn can_match(bid_price: u64, ask_price: u64) -> bool {
    bid_price >= ask_price
}
