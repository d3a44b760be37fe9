//! Market session: closed action dispatch over the engine
//!
//! Holds the selected symbol and the last book mirrored from the remote
//! exchange for each symbol. Mirroring a report also compares it with what
//! the reference engine would report at the same depth.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use inspect_codec::{BookEntry, BookQuery, BookReport};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use types::errors::EngineError;
use types::ids::{OrderId, Symbol};
use types::order::Order;
use types::trade::Trade;

use crate::engine::MatchingEngine;

pub const DEFAULT_SYMBOL: &str = "CTSI/USDT";

/// Every mutation a session accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    SubmitOrder { symbol: String, order: Order },
    CancelOrder { symbol: String, order_id: OrderId },
    /// Mirror a book report decoded from the remote exchange
    UpdateBook { report: BookReport },
    SwitchSymbol { symbol: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Submitted { trades: Vec<Trade> },
    Cancelled { order: Option<Order> },
    BookMirrored { divergences: Vec<Divergence> },
    SymbolSwitched { symbol: Symbol },
}

/// One difference between the remote book and the reference engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Divergence {
    /// Remote has an order the engine does not
    Missing { remote: BookEntry },
    /// Engine has an order the remote does not
    Unexpected { local: BookEntry },
    /// Same id, different side, price, quantity or trader
    Mismatch { remote: BookEntry, local: BookEntry },
}

pub struct MarketSession {
    engine: Arc<MatchingEngine>,
    selected: Symbol,
    mirrors: HashMap<String, BookReport>,
}

impl MarketSession {
    pub fn new(engine: Arc<MatchingEngine>) -> Self {
        Self {
            engine,
            selected: Symbol::new(DEFAULT_SYMBOL),
            mirrors: HashMap::new(),
        }
    }

    pub fn engine(&self) -> &Arc<MatchingEngine> {
        &self.engine
    }

    pub fn selected_symbol(&self) -> &Symbol {
        &self.selected
    }

    pub fn mirrored(&self, symbol: &str) -> Option<&BookReport> {
        self.mirrors.get(symbol)
    }

    /// Mirrored book of the selected symbol
    pub fn current_book(&self) -> Option<&BookReport> {
        self.mirrored(self.selected.as_str())
    }

    pub fn dispatch(&mut self, action: Action) -> Result<Outcome, EngineError> {
        match action {
            Action::SubmitOrder { symbol, order } => {
                let trades = self.engine.submit(&symbol, order)?;
                Ok(Outcome::Submitted { trades })
            }
            Action::CancelOrder { symbol, order_id } => {
                let order = self.engine.cancel(&symbol, order_id)?;
                Ok(Outcome::Cancelled { order })
            }
            Action::UpdateBook { report } => {
                let divergences = self.compare(&report)?;
                if !divergences.is_empty() {
                    warn!(
                        symbol = %report.symbol,
                        divergences = divergences.len(),
                        "Remote book differs from reference engine"
                    );
                }
                self.mirrors.insert(report.symbol.clone(), report);
                Ok(Outcome::BookMirrored { divergences })
            }
            Action::SwitchSymbol { symbol } => {
                let symbol = Symbol::new(symbol);
                if !self.engine.symbols().contains(&symbol) {
                    return Err(EngineError::UnknownSymbol {
                        symbol: symbol.to_string(),
                    });
                }
                info!(%symbol, "Selected symbol");
                self.selected = symbol.clone();
                Ok(Outcome::SymbolSwitched { symbol })
            }
        }
    }

    /// Compare a remote report with the engine's report at the same depth
    pub fn compare(&self, remote: &BookReport) -> Result<Vec<Divergence>, EngineError> {
        let depth = u32::try_from(remote.entries.len()).unwrap_or(u32::MAX);
        let local = self
            .engine
            .book_report(&BookQuery::new(remote.symbol.clone(), depth))?;
        Ok(diff_reports(remote, &local))
    }
}

/// Differences between two reports, matched by order id, in id order
pub fn diff_reports(remote: &BookReport, local: &BookReport) -> Vec<Divergence> {
    let remote_by_id: BTreeMap<OrderId, &BookEntry> =
        remote.entries.iter().map(|e| (e.id, e)).collect();
    let local_by_id: BTreeMap<OrderId, &BookEntry> =
        local.entries.iter().map(|e| (e.id, e)).collect();

    let mut divergences = Vec::new();
    for (id, remote_entry) in &remote_by_id {
        match local_by_id.get(id) {
            None => divergences.push(Divergence::Missing {
                remote: (*remote_entry).clone(),
            }),
            Some(local_entry) if local_entry != remote_entry => {
                divergences.push(Divergence::Mismatch {
                    remote: (*remote_entry).clone(),
                    local: (*local_entry).clone(),
                })
            }
            Some(_) => {}
        }
    }
    for (id, local_entry) in &local_by_id {
        if !remote_by_id.contains_key(id) {
            divergences.push(Divergence::Unexpected {
                local: (*local_entry).clone(),
            });
        }
    }
    divergences
}
