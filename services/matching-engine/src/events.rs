//! Event structures for the matching engine
//!
//! A [`BookUpdate`] is fanned out to subscribers after every mutation of a
//! symbol's book.

use serde::{Deserialize, Serialize};
use types::ids::{OrderId, Symbol};
use types::trade::Trade;

use crate::book::BookSnapshot;

/// What changed the book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateCause {
    Submitted { order_id: OrderId },
    Cancelled { order_id: OrderId },
    /// The whole book was replaced from a remote report
    Replaced,
}

/// Book and transaction log of one symbol after a mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookUpdate {
    pub symbol: Symbol,
    pub cause: UpdateCause,
    pub book: BookSnapshot,
    /// Trades executed by this mutation
    pub trades: Vec<Trade>,
    /// Length of the symbol's transaction log after this mutation; `trades`
    /// are its last entries
    pub log_len: usize,
}
