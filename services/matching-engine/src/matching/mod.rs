//! Matching logic module
//!
//! Continuous double auction: while the best bid is at or above the best
//! ask, trade the smaller quantity at the midpoint and drop whatever fills.

pub mod crossing;
pub mod executor;

pub use crossing::can_match;
pub use executor::MatchExecutor;

use types::errors::{EngineError, OrderError};
use types::trade::Trade;

use crate::book::SymbolBook;

/// Match a book until it is no longer crossed
///
/// Returns the trades of this pass in execution order; they are also
/// appended to the book's transaction log. Every iteration fills at least
/// one of the two best orders, so the loop terminates.
pub fn match_book(
    book: &mut SymbolBook,
    executor: &mut MatchExecutor,
    timestamp: i64,
) -> Result<Vec<Trade>, EngineError> {
    let mut trades = Vec::new();

    loop {
        let (bid, ask) = match (book.bids.best(), book.asks.best()) {
            (Some(bid), Some(ask)) if can_match(bid.price, ask.price) => (bid, ask),
            _ => break,
        };

        // Both fronts must accept the fill before either side is touched
        for order in [bid, ask] {
            if order.status.is_terminal() {
                return Err(OrderError::AlreadyTerminal {
                    order_id: order.id,
                    status: order.status,
                }
                .into());
            }
        }

        let trade = executor.execute_trade(bid, ask, timestamp);

        if let Some(filled) = book.bids.fill_best(trade.quantity)? {
            book.forget(&filled.id);
        }
        if let Some(filled) = book.asks.fill_best(trade.quantity)? {
            book.forget(&filled.id);
        }

        book.transactions.push(trade.clone());
        trades.push(trade);
    }

    debug_assert!(!book.is_crossed());
    Ok(trades)
}
