//! Price level with FIFO queue
//!
//! A price level holds every resting order at one price. Orders keep their
//! arrival order, which gives time priority among equal prices.

use std::collections::VecDeque;
use types::ids::OrderId;
use types::order::Order;

/// All resting orders at a single price, oldest first
#[derive(Debug, Clone, Default)]
pub struct PriceLevel {
    orders: VecDeque<Order>,
    /// Sum of remaining quantity, widened so many large orders cannot overflow
    total_quantity: u128,
}

impl PriceLevel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an order at the back of the queue (time priority)
    pub fn insert(&mut self, order: Order) {
        self.total_quantity += order.quantity as u128;
        self.orders.push_back(order);
    }

    /// Remove an order by id, returning it if present
    pub fn remove(&mut self, order_id: &OrderId) -> Option<Order> {
        let position = self.orders.iter().position(|o| &o.id == order_id)?;
        let order = self.orders.remove(position)?;
        self.total_quantity -= order.quantity as u128;
        Some(order)
    }

    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Fill the front order by `qty`; a fully filled order is popped and
    /// returned.
    pub fn fill_front(&mut self, qty: u64) -> Result<Option<Order>, types::errors::OrderError> {
        let Some(front) = self.orders.front_mut() else {
            return Ok(None);
        };
        front.fill(qty)?;
        self.total_quantity -= qty as u128;

        if front.is_filled() {
            Ok(self.orders.pop_front())
        } else {
            Ok(None)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn total_quantity(&self) -> u128 {
        self.total_quantity
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}
