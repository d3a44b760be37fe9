//! Inspect Codec: binary payloads for the ledger inspect endpoint
//!
//! Translates between structured queries/reports and the fixed byte layouts
//! the remote exchange reads and writes:
//!
//! | Message | Size | Layout |
//! |---|---|---|
//! | BookQuery | 19 B | tag `0x42`, symbol(10, NUL-padded), depth(8, LE) |
//! | BookReport | 20 + 45·n B | reserved(2), symbol(10), count(8, LE), entries |
//! | BookReport entry | 45 B | trader(20), id(8 LE), side(1), quantity(8 LE), price(8 LE) |
//! | WalletQuery | 21 B | tag `0x57`, trader(20) |
//! | WalletReport entry | 28 B | token(20), quantity(8 LE), repeated to end of buffer |
//!
//! # Determinism
//! Every function is pure: no I/O, no shared state, identical output for
//! identical input. Safe to call concurrently from any thread.

pub mod wire;
pub mod book;
pub mod wallet;
pub mod query;

pub use book::{
    decode_book_query, decode_book_report, decode_book_report_bytes, encode_book_query,
    encode_book_report, BookEntry, BookQuery, BookReport,
};
pub use query::{decode_query, Query};
pub use wallet::{
    decode_wallet_query, decode_wallet_report, decode_wallet_report_hex, encode_wallet_query,
    encode_wallet_report, WalletEntry, WalletQuery, WalletReport,
};
pub use wire::{BOOK_TAG, MAX_BOOK_ENTRIES, WALLET_TAG};
