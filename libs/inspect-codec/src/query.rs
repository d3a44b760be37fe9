//! Tag-dispatched inspect queries
//!
//! The first byte of an inspect payload selects the query kind.

use serde::{Deserialize, Serialize};
use types::errors::{DecodingError, EncodingError};

use crate::book::{decode_book_query, encode_book_query, BookQuery};
use crate::wallet::{decode_wallet_query, encode_wallet_query, WalletQuery};
use crate::wire::{BOOK_TAG, WALLET_TAG};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Query {
    Book(BookQuery),
    Wallet(WalletQuery),
}

impl Query {
    pub fn tag(&self) -> u8 {
        match self {
            Query::Book(_) => BOOK_TAG,
            Query::Wallet(_) => WALLET_TAG,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, EncodingError> {
        match self {
            Query::Book(q) => encode_book_query(q).map(|b| b.to_vec()),
            Query::Wallet(q) => encode_wallet_query(q).map(|b| b.to_vec()),
        }
    }
}

/// Decode an inspect payload by its tag byte
pub fn decode_query(buf: &[u8]) -> Result<Query, DecodingError> {
    match buf.first() {
        Some(&BOOK_TAG) => decode_book_query(buf).map(Query::Book),
        Some(&WALLET_TAG) => decode_wallet_query(buf).map(Query::Wallet),
        Some(&tag) => Err(DecodingError::UnknownTag(tag)),
        None => Err(DecodingError::BufferTooShort { required: 1, actual: 0 }),
    }
}
