//! Order book infrastructure module
//!
//! Contains price levels, the bid and ask books, and [`SymbolBook`], which
//! ties both sides of one symbol to its id index and transaction log.

pub mod price_level;
pub mod bid_book;
pub mod ask_book;

pub use price_level::PriceLevel;
pub use bid_book::BidBook;
pub use ask_book::AskBook;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use types::errors::EngineError;
use types::ids::{OrderId, Symbol};
use types::order::{Order, Side};
use types::trade::Trade;

/// Both sides of one symbol's book plus its append-only trade log
#[derive(Debug, Clone)]
pub struct SymbolBook {
    symbol: Symbol,
    pub(crate) bids: BidBook,
    pub(crate) asks: AskBook,
    /// Where each resting order lives, for cancel by id
    index: HashMap<OrderId, (Side, u64)>,
    pub(crate) transactions: Vec<Trade>,
    /// Last timestamp handed to an order on this book
    last_stamp: i64,
}

impl SymbolBook {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            bids: BidBook::new(),
            asks: AskBook::new(),
            index: HashMap::new(),
            transactions: Vec::new(),
            last_stamp: i64::MIN,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Stamp and rest an order on its side of the book
    ///
    /// Stamps never go backwards on a book, so arrival order and timestamp
    /// order agree even if the clock does not.
    pub fn insert(&mut self, mut order: Order, now: i64) -> Result<(), EngineError> {
        if self.index.contains_key(&order.id) {
            return Err(EngineError::DuplicateOrderId {
                symbol: self.symbol.to_string(),
                order_id: order.id,
            });
        }
        if order.quantity == 0 {
            return Err(EngineError::InvalidOrder(format!(
                "order {} has zero quantity",
                order.id
            )));
        }
        if order.status.is_terminal() {
            return Err(EngineError::InvalidOrder(format!(
                "order {} is {:?} and cannot rest",
                order.id, order.status
            )));
        }

        self.last_stamp = self.last_stamp.max(now);
        order.timestamp = self.last_stamp;

        self.index.insert(order.id, (order.side, order.price));
        match order.side {
            Side::Buy => self.bids.insert(order),
            Side::Sell => self.asks.insert(order),
        }
        Ok(())
    }

    /// Remove a resting order by id from whichever side holds it
    pub fn remove(&mut self, order_id: &OrderId) -> Option<Order> {
        let (side, price) = self.index.remove(order_id)?;
        match side {
            Side::Buy => self.bids.remove(order_id, price),
            Side::Sell => self.asks.remove(order_id, price),
        }
    }

    /// Forget a filled order; called by the matcher after it pops one
    pub(crate) fn forget(&mut self, order_id: &OrderId) {
        self.index.remove(order_id);
    }

    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.index.contains_key(order_id)
    }

    /// Drop every resting order, keeping the transaction log
    pub fn clear_orders(&mut self) {
        self.bids = BidBook::new();
        self.asks = AskBook::new();
        self.index.clear();
    }

    pub fn transactions(&self) -> &[Trade] {
        &self.transactions
    }

    pub fn order_count(&self) -> usize {
        self.index.len()
    }

    /// True when the best bid is at or above the best ask
    pub fn is_crossed(&self) -> bool {
        matches!(
            (self.bids.best_price(), self.asks.best_price()),
            (Some(bid), Some(ask)) if bid >= ask
        )
    }

    /// Up to `depth` orders per side, in priority order
    pub fn snapshot(&self, depth: usize) -> BookSnapshot {
        BookSnapshot {
            symbol: self.symbol.clone(),
            bids: self.bids.orders().take(depth).cloned().collect(),
            asks: self.asks.orders().take(depth).cloned().collect(),
        }
    }

    /// Up to `levels` aggregated price levels per side, best first
    pub fn depth(&self, levels: usize) -> BookDepth {
        BookDepth {
            symbol: self.symbol.clone(),
            bids: self.bids.depth_snapshot(levels),
            asks: self.asks.depth_snapshot(levels),
        }
    }
}

/// Aggregated view of a book: (price, total resting quantity) per level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDepth {
    pub symbol: Symbol,
    pub bids: Vec<(u64, u128)>,
    pub asks: Vec<(u64, u128)>,
}

/// Point-in-time copy of a symbol's resting orders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub symbol: Symbol,
    /// Best bid first
    pub bids: Vec<Order>,
    /// Best ask first
    pub asks: Vec<Order>,
}

impl BookSnapshot {
    /// Bids and asks alternated best-first (bid, ask, bid, …), as the
    /// remote exchange lays out its book reports
    pub fn interleaved(&self) -> impl Iterator<Item = &Order> {
        let longest = self.bids.len().max(self.asks.len());
        (0..longest).flat_map(move |i| self.bids.get(i).into_iter().chain(self.asks.get(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::Address;
    use types::order::OrderStatus;

    fn order(id: u64, side: Side, price: u64, qty: u64) -> Order {
        Order::new(id, Address::ZERO, side, price, qty)
    }

    #[test]
    fn test_insert_and_remove_by_id() {
        let mut book = SymbolBook::new(Symbol::new("CTSI/USDT"));
        book.insert(order(1, Side::Buy, 100, 5), 10).unwrap();
        book.insert(order(2, Side::Sell, 110, 5), 11).unwrap();

        assert_eq!(book.order_count(), 2);
        assert_eq!(book.remove(&OrderId(2)).unwrap().side, Side::Sell);
        assert!(book.remove(&OrderId(2)).is_none());
        assert!(book.asks.is_empty());
    }

    #[test]
    fn test_duplicate_id_rejected_across_sides() {
        let mut book = SymbolBook::new(Symbol::new("CTSI/USDT"));
        book.insert(order(1, Side::Buy, 100, 5), 10).unwrap();
        let err = book.insert(order(1, Side::Sell, 200, 5), 11).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateOrderId { .. }));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut book = SymbolBook::new(Symbol::new("CTSI/USDT"));
        assert!(matches!(
            book.insert(order(1, Side::Buy, 100, 0), 10),
            Err(EngineError::InvalidOrder(_))
        ));
    }

    #[test]
    fn test_terminal_status_rejected() {
        let mut book = SymbolBook::new(Symbol::new("CTSI/USDT"));
        for status in [OrderStatus::Cancelled, OrderStatus::Filled] {
            let mut o = order(1, Side::Sell, 90, 3);
            o.status = status;
            assert!(matches!(book.insert(o, 10), Err(EngineError::InvalidOrder(_))));
        }
        assert_eq!(book.order_count(), 0);

        let mut partial = order(2, Side::Sell, 90, 3);
        partial.status = OrderStatus::PartiallyFilled;
        book.insert(partial, 11).unwrap();
        assert!(book.contains(&OrderId(2)));
    }

    #[test]
    fn test_stamps_never_go_backwards() {
        let mut book = SymbolBook::new(Symbol::new("CTSI/USDT"));
        book.insert(order(1, Side::Buy, 100, 5), 50).unwrap();
        book.insert(order(2, Side::Buy, 100, 5), 20).unwrap();

        let snap = book.snapshot(10);
        assert_eq!(snap.bids[0].timestamp, 50);
        assert_eq!(snap.bids[1].timestamp, 50);
        assert_eq!(snap.bids[0].id, OrderId(1));
    }

    #[test]
    fn test_snapshot_interleaved() {
        let mut book = SymbolBook::new(Symbol::new("CTSI/USDT"));
        book.insert(order(1, Side::Buy, 100, 1), 1).unwrap();
        book.insert(order(2, Side::Buy, 99, 1), 2).unwrap();
        book.insert(order(3, Side::Buy, 98, 1), 3).unwrap();
        book.insert(order(4, Side::Sell, 101, 1), 4).unwrap();

        let snap = book.snapshot(10);
        let ids: Vec<_> = snap.interleaved().map(|o| o.id.value()).collect();
        assert_eq!(ids, vec![1, 4, 2, 3]);
    }

    #[test]
    fn test_depth_aggregates_levels() {
        let mut book = SymbolBook::new(Symbol::new("CTSI/USDT"));
        book.insert(order(1, Side::Buy, 100, 2), 1).unwrap();
        book.insert(order(2, Side::Buy, 100, 3), 2).unwrap();
        book.insert(order(3, Side::Buy, 99, 1), 3).unwrap();
        book.insert(order(4, Side::Sell, 105, 4), 4).unwrap();

        let depth = book.depth(1);
        assert_eq!(depth.bids, vec![(100, 5)]);
        assert_eq!(depth.asks, vec![(105, 4)]);
        assert_eq!(book.depth(10).bids.len(), 2);
    }

    #[test]
    fn test_is_crossed() {
        let mut book = SymbolBook::new(Symbol::new("CTSI/USDT"));
        book.insert(order(1, Side::Buy, 100, 1), 1).unwrap();
        assert!(!book.is_crossed());
        book.insert(order(2, Side::Sell, 100, 1), 2).unwrap();
        assert!(book.is_crossed());
    }
}
