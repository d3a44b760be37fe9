//! Matching engine core
//!
//! Book manager: one lock per symbol, so mutations of the same symbol are
//! serialized while different symbols proceed in parallel. Subscribers are
//! notified after the lock is released.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info};
use types::errors::EngineError;
use types::ids::{OrderId, Symbol};
use types::order::Order;
use types::trade::Trade;

use crate::book::{BookDepth, BookSnapshot, SymbolBook};
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::events::{BookUpdate, UpdateCause};
use crate::matching::{match_book, MatchExecutor};
use crate::subscribers::{SubscriptionId, Subscribers};
use crate::wallet::Wallets;

/// Book plus the executor that numbers its trades
#[derive(Debug)]
struct BookCell {
    book: SymbolBook,
    executor: MatchExecutor,
}

/// Reference matching engine over a fixed set of symbols
pub struct MatchingEngine {
    books: DashMap<Symbol, Arc<Mutex<BookCell>>>,
    subscribers: Subscribers,
    wallets: Wallets,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    next_order_id: AtomicU64,
}

impl MatchingEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let books = DashMap::new();
        for symbol in config.symbols() {
            let cell = BookCell {
                book: SymbolBook::new(symbol.clone()),
                executor: MatchExecutor::default(),
            };
            books.insert(symbol, Arc::new(Mutex::new(cell)));
        }
        info!(symbols = books.len(), "Matching engine ready");

        Self {
            books,
            subscribers: Subscribers::new(config.subscriber_capacity),
            wallets: Wallets::new(),
            clock,
            config,
            next_order_id: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Listed symbols, sorted
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut symbols: Vec<_> = self.books.iter().map(|e| e.key().clone()).collect();
        symbols.sort();
        symbols
    }

    /// Fresh order id for callers that do not mint their own
    pub fn next_order_id(&self) -> OrderId {
        OrderId(self.next_order_id.fetch_add(1, Ordering::Relaxed))
    }

    fn cell(&self, symbol: &str) -> Result<Arc<Mutex<BookCell>>, EngineError> {
        self.books
            .get(&Symbol::new(symbol))
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| EngineError::UnknownSymbol {
                symbol: symbol.to_string(),
            })
    }

    /// Rest an order on `symbol`, then match the book
    ///
    /// Returns the trades this submission caused.
    pub fn submit(&self, symbol: &str, order: Order) -> Result<Vec<Trade>, EngineError> {
        let cell = self.cell(symbol)?;
        let order_id = order.id;

        let update = {
            let mut guard = cell.lock();
            let BookCell { book, executor } = &mut *guard;
            let now = self.clock.now_nanos();

            book.insert(order, now)?;
            debug!(%symbol, %order_id, "Order accepted");

            let trades = match_book(book, executor, now)?;
            if !trades.is_empty() {
                info!(%symbol, %order_id, trades = trades.len(), "Orders matched");
            }
            Self::update(book, UpdateCause::Submitted { order_id }, trades)
        };

        self.subscribers.publish(&update);
        Ok(update.trades)
    }

    /// Remove order `order_id` from either side of `symbol`, then match
    ///
    /// Cancelling an id that is not resting is a no-op and returns `None`.
    pub fn cancel(&self, symbol: &str, order_id: OrderId) -> Result<Option<Order>, EngineError> {
        let cell = self.cell(symbol)?;

        let (cancelled, update) = {
            let mut guard = cell.lock();
            let BookCell { book, executor } = &mut *guard;

            let Some(mut order) = book.remove(&order_id) else {
                debug!(%symbol, %order_id, "Cancel for unknown order ignored");
                return Ok(None);
            };
            order.cancel()?;
            debug!(%symbol, %order_id, "Order cancelled");

            let trades = match_book(book, executor, self.clock.now_nanos())?;
            (order, Self::update(book, UpdateCause::Cancelled { order_id }, trades))
        };

        self.subscribers.publish(&update);
        Ok(Some(cancelled))
    }

    /// Replace every resting order of `symbol`, keeping its transaction log
    ///
    /// Orders are stamped in the given order, so earlier entries keep time
    /// priority at equal prices. A crossed input is matched.
    pub fn replace_book(&self, symbol: &str, orders: Vec<Order>) -> Result<Vec<Trade>, EngineError> {
        let cell = self.cell(symbol)?;

        let update = {
            let mut guard = cell.lock();
            let BookCell { book, executor } = &mut *guard;
            let now = self.clock.now_nanos();

            let mut staged = SymbolBook::new(book.symbol().clone());
            for order in orders {
                staged.insert(order, now)?;
            }
            book.clear_orders();
            for order in staged.bids.orders().chain(staged.asks.orders()) {
                book.insert(order.clone(), now)?;
            }
            info!(%symbol, orders = book.order_count(), "Book replaced");

            let trades = match_book(book, executor, now)?;
            Self::update(book, UpdateCause::Replaced, trades)
        };

        self.subscribers.publish(&update);
        Ok(update.trades)
    }

    fn update(book: &SymbolBook, cause: UpdateCause, trades: Vec<Trade>) -> BookUpdate {
        BookUpdate {
            symbol: book.symbol().clone(),
            cause,
            book: book.snapshot(usize::MAX),
            trades,
            log_len: book.transactions().len(),
        }
    }

    /// Up to `depth` resting orders per side, best first
    pub fn book_snapshot(&self, symbol: &str, depth: usize) -> Result<BookSnapshot, EngineError> {
        Ok(self.cell(symbol)?.lock().book.snapshot(depth))
    }

    /// Up to `levels` aggregated price levels per side, best first
    pub fn depth(&self, symbol: &str, levels: usize) -> Result<BookDepth, EngineError> {
        Ok(self.cell(symbol)?.lock().book.depth(levels))
    }

    pub fn transactions(&self, symbol: &str) -> Result<Vec<Trade>, EngineError> {
        Ok(self.cell(symbol)?.lock().book.transactions().to_vec())
    }

    /// (timestamp, price) pairs from the transaction log, oldest first
    pub fn time_series(&self, symbol: &str) -> Result<Vec<(i64, u64)>, EngineError> {
        Ok(self
            .cell(symbol)?
            .lock()
            .book
            .transactions()
            .iter()
            .map(|t| (t.timestamp, t.price))
            .collect())
    }

    pub fn subscribe(&self) -> (SubscriptionId, tokio::sync::mpsc::Receiver<BookUpdate>) {
        self.subscribers.subscribe()
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    pub fn subscribers(&self) -> &Subscribers {
        &self.subscribers
    }

    pub fn wallets(&self) -> &Wallets {
        &self.wallets
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
