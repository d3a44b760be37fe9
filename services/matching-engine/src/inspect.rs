//! Read-only inspect endpoint over the reference engine
//!
//! Answers the same binary queries the remote exchange answers, in the same
//! byte layouts, so decoded reports from both can be compared directly.

use inspect_codec::{
    decode_query, encode_book_report, encode_wallet_report, BookEntry, BookQuery, BookReport,
    Query, WalletEntry, WalletQuery, WalletReport,
};
use tracing::debug;
use types::errors::EngineError;
use types::ids::Address;

use crate::engine::MatchingEngine;

/// Most balances a wallet report carries
pub const MAX_WALLET_REPORT_ENTRIES: usize = 16;

impl MatchingEngine {
    /// Book entries alternating bid, ask, bid, … best first, up to the
    /// query depth. An unlisted symbol yields an empty report.
    pub fn book_report(&self, query: &BookQuery) -> Result<BookReport, EngineError> {
        let limit = (query.depth as usize).min(self.config().report_limit());

        let snapshot = match self.book_snapshot(&query.symbol, limit) {
            Ok(snapshot) => snapshot,
            Err(EngineError::UnknownSymbol { .. }) => {
                return Ok(BookReport::new(query.symbol.clone(), Vec::new()))
            }
            Err(e) => return Err(e),
        };

        let entries = snapshot
            .interleaved()
            .take(limit)
            .map(|o| BookEntry {
                trader: o.trader,
                id: o.id,
                side: o.side,
                quantity: o.quantity,
                price: o.price,
            })
            .collect();

        Ok(BookReport::new(query.symbol.clone(), entries))
    }

    pub fn wallet_report(&self, query: &WalletQuery) -> Result<WalletReport, EngineError> {
        let trader: Address = query.trader.parse()?;
        let entries = self
            .wallets()
            .balances(&trader)
            .into_iter()
            .take(MAX_WALLET_REPORT_ENTRIES)
            .map(|(token, quantity)| WalletEntry { token, quantity })
            .collect();
        Ok(WalletReport { entries })
    }

    /// Decode a binary inspect payload and return the encoded report
    pub fn inspect(&self, payload: &[u8]) -> Result<Vec<u8>, EngineError> {
        let query = decode_query(payload)?;
        debug!(?query, "Inspect query");

        match query {
            Query::Book(q) => Ok(encode_book_report(&self.book_report(&q)?)?),
            Query::Wallet(q) => Ok(encode_wallet_report(&self.wallet_report(&q)?)),
        }
    }
}
