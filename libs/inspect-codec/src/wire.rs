//! Layout constants and bounds-checked primitive readers
//!
//! All multi-byte integers on the wire are little-endian.

use types::errors::{DecodingError, EncodingError};
use types::ids::{Address, ADDRESS_LEN, SYMBOL_LEN};

/// Tag byte of a book query (and of a book report)
pub const BOOK_TAG: u8 = 0x42;

/// Tag byte of a wallet query
pub const WALLET_TAG: u8 = 0x57;

/// Hard cap on decoded book entries, whatever the wire declares
pub const MAX_BOOK_ENTRIES: usize = 200;

pub const BOOK_QUERY_LEN: usize = 1 + SYMBOL_LEN + 8;
pub const WALLET_QUERY_LEN: usize = 1 + ADDRESS_LEN;

pub const BOOK_REPORT_HEADER_LEN: usize = 20;
pub const BOOK_REPORT_SYMBOL_OFFSET: usize = 2;
pub const BOOK_REPORT_COUNT_OFFSET: usize = 12;
pub const BOOK_ENTRY_LEN: usize = 45;

// Field offsets inside one book entry
pub const ENTRY_TRADER_OFFSET: usize = 0;
pub const ENTRY_ID_OFFSET: usize = 20;
pub const ENTRY_SIDE_OFFSET: usize = 28;
pub const ENTRY_QUANTITY_OFFSET: usize = 29;
pub const ENTRY_PRICE_OFFSET: usize = 37;

pub const WALLET_ENTRY_LEN: usize = ADDRESS_LEN + 8;

/// Read a little-endian u64 at `offset`
pub fn read_u64_le(buf: &[u8], offset: usize) -> Result<u64, DecodingError> {
    let bytes = buf
        .get(offset..offset + 8)
        .ok_or(DecodingError::BufferTooShort {
            required: offset + 8,
            actual: buf.len(),
        })?;
    let mut raw = [0u8; 8];
    raw.copy_from_slice(bytes);
    Ok(u64::from_le_bytes(raw))
}

/// Read a 20-byte address at `offset`
pub fn read_address(buf: &[u8], offset: usize) -> Result<Address, DecodingError> {
    buf.get(offset..offset + ADDRESS_LEN)
        .and_then(Address::from_slice)
        .ok_or(DecodingError::BufferTooShort {
            required: offset + ADDRESS_LEN,
            actual: buf.len(),
        })
}

/// Read a NUL-padded symbol slot, dropping the trailing padding
pub fn read_symbol(buf: &[u8], offset: usize) -> Result<String, DecodingError> {
    let slot = buf
        .get(offset..offset + SYMBOL_LEN)
        .ok_or(DecodingError::BufferTooShort {
            required: offset + SYMBOL_LEN,
            actual: buf.len(),
        })?;
    let end = slot.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    let text = &slot[..end];
    if !text.is_ascii() {
        return Err(DecodingError::InvalidSymbol);
    }
    Ok(text.iter().map(|&b| b as char).collect())
}

/// Write `symbol` into a zero-padded 10-byte slot. Wire symbols are ASCII.
pub fn symbol_slot(symbol: &str) -> Result<[u8; SYMBOL_LEN], EncodingError> {
    if !symbol.is_ascii() {
        return Err(EncodingError::NonAsciiSymbol {
            symbol: symbol.to_string(),
        });
    }
    let bytes = symbol.as_bytes();
    if bytes.len() > SYMBOL_LEN {
        return Err(EncodingError::SymbolTooLong { len: bytes.len() });
    }
    let mut slot = [0u8; SYMBOL_LEN];
    slot[..bytes.len()].copy_from_slice(bytes);
    Ok(slot)
}

/// Decode a hex payload as returned by the inspect endpoint
///
/// A leading `0x` is tolerated; odd length or non-hex digits are rejected.
pub fn decode_hex_payload(payload: &str) -> Result<Vec<u8>, DecodingError> {
    let digits = payload.trim();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);
    hex::decode(digits).map_err(|e| DecodingError::InvalidHex(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_u64_le() {
        let buf = [0xff, 0x0a, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(read_u64_le(&buf, 1).unwrap(), 10);
        assert_eq!(
            read_u64_le(&buf, 2),
            Err(DecodingError::BufferTooShort { required: 10, actual: 9 })
        );
    }

    #[test]
    fn test_read_symbol_strips_trailing_nul() {
        let mut buf = [0u8; 10];
        buf[..4].copy_from_slice(b"ACME");
        assert_eq!(read_symbol(&buf, 0).unwrap(), "ACME");
        assert_eq!(read_symbol(&[0u8; 10], 0).unwrap(), "");
    }

    #[test]
    fn test_read_symbol_rejects_non_ascii() {
        let mut buf = [0u8; 10];
        buf[0] = 0xc3;
        assert_eq!(read_symbol(&buf, 0), Err(DecodingError::InvalidSymbol));
    }

    #[test]
    fn test_symbol_slot() {
        let slot = symbol_slot("CTSI/USDT").unwrap();
        assert_eq!(&slot[..9], b"CTSI/USDT");
        assert_eq!(slot[9], 0);
        assert_eq!(
            symbol_slot("CTSI/USDT/X"),
            Err(EncodingError::SymbolTooLong { len: 11 })
        );
    }

    #[test]
    fn test_symbol_slot_rejects_non_ascii() {
        assert_eq!(
            symbol_slot("ÉTH/USD"),
            Err(EncodingError::NonAsciiSymbol {
                symbol: "ÉTH/USD".to_string()
            })
        );
    }

    #[test]
    fn test_decode_hex_payload() {
        assert_eq!(decode_hex_payload("0a0B").unwrap(), vec![0x0a, 0x0b]);
        assert_eq!(decode_hex_payload("0x0a").unwrap(), vec![0x0a]);
        assert!(matches!(decode_hex_payload("abc"), Err(DecodingError::InvalidHex(_))));
        assert!(matches!(decode_hex_payload("zz"), Err(DecodingError::InvalidHex(_))));
    }
}
