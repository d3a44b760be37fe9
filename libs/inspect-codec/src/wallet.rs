//! Wallet query and wallet report codec

use serde::{Deserialize, Serialize};
use types::errors::{DecodingError, EncodingError};
use types::ids::{Address, ADDRESS_LEN};

use crate::wire::{
    decode_hex_payload, read_address, read_u64_le, WALLET_ENTRY_LEN, WALLET_QUERY_LEN, WALLET_TAG,
};

/// Request for a trader's token balances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletQuery {
    /// `0x`-prefixed hex address
    pub trader: String,
}

impl WalletQuery {
    pub fn new(trader: impl Into<String>) -> Self {
        Self { trader: trader.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletEntry {
    pub token: Address,
    pub quantity: u64,
}

/// Decoded answer to a [`WalletQuery`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletReport {
    pub entries: Vec<WalletEntry>,
}

impl WalletReport {
    pub fn balance_of(&self, token: &Address) -> Option<u64> {
        self.entries.iter().find(|e| &e.token == token).map(|e| e.quantity)
    }
}

/// Encode a wallet query into its 21-byte wire form
pub fn encode_wallet_query(query: &WalletQuery) -> Result<[u8; WALLET_QUERY_LEN], EncodingError> {
    let trader: Address = query.trader.parse()?;

    let mut buf = [0u8; WALLET_QUERY_LEN];
    buf[0] = WALLET_TAG;
    buf[1..].copy_from_slice(trader.as_bytes());
    Ok(buf)
}

/// Decode a 21-byte wallet query; the trader comes back lowercased
pub fn decode_wallet_query(buf: &[u8]) -> Result<WalletQuery, DecodingError> {
    if buf.len() != WALLET_QUERY_LEN {
        return Err(DecodingError::UnexpectedLength {
            expected: WALLET_QUERY_LEN,
            actual: buf.len(),
        });
    }
    if buf[0] != WALLET_TAG {
        return Err(DecodingError::UnknownTag(buf[0]));
    }
    let trader = read_address(buf, 1)?;
    Ok(WalletQuery { trader: trader.to_string() })
}

/// Decode a wallet report: back-to-back 28-byte records, no count field
pub fn decode_wallet_report(buf: &[u8]) -> Result<WalletReport, DecodingError> {
    if buf.len() % WALLET_ENTRY_LEN != 0 {
        return Err(DecodingError::TruncatedRecord {
            len: buf.len(),
            record_size: WALLET_ENTRY_LEN,
        });
    }

    let entries = buf
        .chunks_exact(WALLET_ENTRY_LEN)
        .map(|record| {
            Ok(WalletEntry {
                token: read_address(record, 0)?,
                quantity: read_u64_le(record, ADDRESS_LEN)?,
            })
        })
        .collect::<Result<Vec<_>, DecodingError>>()?;

    Ok(WalletReport { entries })
}

/// Hex flavour of [`decode_wallet_report`]
pub fn decode_wallet_report_hex(hex_payload: &str) -> Result<WalletReport, DecodingError> {
    decode_wallet_report(&decode_hex_payload(hex_payload)?)
}

pub fn encode_wallet_report(report: &WalletReport) -> Vec<u8> {
    let mut buf = Vec::with_capacity(report.entries.len() * WALLET_ENTRY_LEN);
    for entry in &report.entries {
        buf.extend_from_slice(entry.token.as_bytes());
        buf.extend_from_slice(&entry.quantity.to_le_bytes());
    }
    buf
}
