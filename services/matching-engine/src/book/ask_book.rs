//! Ask (sell-side) order book
//!
//! Maintains sell orders sorted by price ascending (best ask first).
//! BTreeMap keeps iteration deterministic.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::order::Order;

use super::price_level::PriceLevel;

/// Ask (sell) side order book
///
/// The lowest ask is best. At each price level orders are FIFO.
#[derive(Debug, Clone, Default)]
pub struct AskBook {
    levels: BTreeMap<u64, PriceLevel>,
}

impl AskBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, order: Order) {
        self.levels.entry(order.price).or_default().insert(order);
    }

    /// Remove an order resting at `price`
    pub fn remove(&mut self, order_id: &OrderId, price: u64) -> Option<Order> {
        let level = self.levels.get_mut(&price)?;
        let order = level.remove(order_id)?;
        if level.is_empty() {
            self.levels.remove(&price);
        }
        Some(order)
    }

    /// Highest-priority ask: best price, then earliest arrival
    pub fn best(&self) -> Option<&Order> {
        self.levels.values().next().and_then(PriceLevel::front)
    }

    pub fn best_price(&self) -> Option<u64> {
        self.levels.keys().next().copied()
    }

    /// Fill the best ask by `qty`, returning it if fully filled
    pub(crate) fn fill_best(&mut self, qty: u64) -> Result<Option<Order>, types::errors::OrderError> {
        let Some(mut entry) = self.levels.first_entry() else {
            return Ok(None);
        };
        let filled = entry.get_mut().fill_front(qty)?;
        if entry.get().is_empty() {
            entry.remove();
        }
        Ok(filled)
    }

    /// Top `depth` price levels as (price, total quantity)
    pub fn depth_snapshot(&self, depth: usize) -> Vec<(u64, u128)> {
        self.levels
            .iter()
            .take(depth)
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect()
    }

    /// Resting orders in priority order
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.levels.values().flat_map(PriceLevel::iter)
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn total_quantity(&self) -> u128 {
        self.levels.values().map(PriceLevel::total_quantity).sum()
    }
}
