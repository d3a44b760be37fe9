//! Order lifecycle types
//!
//! A resting order only ever loses quantity. Matching moves it through
//! `Resting → PartiallyFilled → Filled`; an explicit cancel ends it as
//! `Cancelled`. Both terminal states remove it from the book.

use crate::errors::OrderError;
use crate::ids::{Address, OrderId};
use serde::{Deserialize, Serialize};

/// Wire byte for a buy entry in book reports
pub const SIDE_BUY_BYTE: u8 = b'B';

/// Wire byte written for a sell entry in book reports
pub const SIDE_SELL_BYTE: u8 = b'S';

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Decode the one-byte side flag. Only `'B'` means buy; every other
    /// value is read as sell.
    pub fn from_wire(byte: u8) -> Self {
        if byte == SIDE_BUY_BYTE {
            Side::Buy
        } else {
            Side::Sell
        }
    }

    pub fn to_wire(&self) -> u8 {
        match self {
            Side::Buy => SIDE_BUY_BYTE,
            Side::Sell => SIDE_SELL_BYTE,
        }
    }
}

/// Order lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// On the book with its original quantity
    Resting,
    /// On the book after at least one fill
    PartiallyFilled,
    /// Quantity exhausted and removed (terminal)
    Filled,
    /// Removed on request (terminal)
    Cancelled,
}

impl OrderStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
    }

    /// Whether `self → next` is a legal lifecycle transition
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Resting, PartiallyFilled)
                | (Resting, Filled)
                | (Resting, Cancelled)
                | (PartiallyFilled, PartiallyFilled)
                | (PartiallyFilled, Filled)
                | (PartiallyFilled, Cancelled)
        )
    }
}

/// A limit order as it rests on the book
///
/// `price` and `quantity` are integer ledger units; `quantity` is the
/// remaining (unfilled) amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub trader: Address,
    pub side: Side,
    pub price: u64,
    pub quantity: u64,
    /// Unix nanos, stamped by the engine on submission
    pub timestamp: i64,
    pub status: OrderStatus,
}

impl Order {
    /// Create a new resting order. The engine overwrites `timestamp` when the
    /// order is submitted.
    pub fn new(id: impl Into<OrderId>, trader: Address, side: Side, price: u64, quantity: u64) -> Self {
        Self {
            id: id.into(),
            trader,
            side,
            price,
            quantity,
            timestamp: 0,
            status: OrderStatus::Resting,
        }
    }

    pub fn is_filled(&self) -> bool {
        self.quantity == 0
    }

    /// Reduce remaining quantity by a matched amount
    pub fn fill(&mut self, qty: u64) -> Result<(), OrderError> {
        if self.status.is_terminal() {
            return Err(OrderError::AlreadyTerminal { order_id: self.id, status: self.status });
        }
        let remaining = self.quantity.checked_sub(qty).ok_or(OrderError::Overfill {
            order_id: self.id,
            remaining: self.quantity,
            fill: qty,
        })?;

        self.quantity = remaining;
        self.status = if remaining == 0 {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };
        Ok(())
    }

    /// Mark the order cancelled
    pub fn cancel(&mut self) -> Result<(), OrderError> {
        if !self.status.can_transition_to(OrderStatus::Cancelled) {
            return Err(OrderError::AlreadyTerminal { order_id: self.id, status: self.status });
        }
        self.status = OrderStatus::Cancelled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(qty: u64) -> Order {
        Order::new(7, Address::ZERO, Side::Buy, 100, qty)
    }

    #[test]
    fn test_side_wire_byte() {
        assert_eq!(Side::from_wire(0x42), Side::Buy);
        assert_eq!(Side::from_wire(b'S'), Side::Sell);
        assert_eq!(Side::from_wire(0x00), Side::Sell);
        assert_eq!(Side::Buy.to_wire(), 0x42);
    }

    #[test]
    fn test_order_partial_then_full_fill() {
        let mut o = order(5);
        o.fill(3).unwrap();
        assert_eq!(o.quantity, 2);
        assert_eq!(o.status, OrderStatus::PartiallyFilled);

        o.fill(2).unwrap();
        assert!(o.is_filled());
        assert_eq!(o.status, OrderStatus::Filled);
    }

    #[test]
    fn test_order_overfill_rejected() {
        let mut o = order(1);
        assert!(matches!(o.fill(2), Err(OrderError::Overfill { .. })));
        assert_eq!(o.quantity, 1);
    }

    #[test]
    fn test_terminal_order_cannot_change() {
        let mut o = order(1);
        o.fill(1).unwrap();
        assert!(o.cancel().is_err());
        assert!(o.fill(0).is_err());
    }

    #[test]
    fn test_status_transitions() {
        assert!(OrderStatus::Resting.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::PartiallyFilled.can_transition_to(OrderStatus::Filled));
        assert!(!OrderStatus::Filled.can_transition_to(OrderStatus::Resting));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Filled));
        assert!(!OrderStatus::PartiallyFilled.can_transition_to(OrderStatus::Resting));
    }
}
