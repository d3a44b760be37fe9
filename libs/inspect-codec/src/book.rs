//! Book query and book report codec

use serde::{Deserialize, Serialize};
use types::errors::{DecodingError, EncodingError};
use types::ids::{Address, OrderId};
use types::order::Side;

use crate::wire::{
    decode_hex_payload, read_address, read_symbol, read_u64_le, symbol_slot, BOOK_ENTRY_LEN,
    BOOK_QUERY_LEN, BOOK_REPORT_COUNT_OFFSET, BOOK_REPORT_HEADER_LEN, BOOK_REPORT_SYMBOL_OFFSET,
    BOOK_TAG, ENTRY_ID_OFFSET, ENTRY_PRICE_OFFSET, ENTRY_QUANTITY_OFFSET, ENTRY_SIDE_OFFSET,
    ENTRY_TRADER_OFFSET, MAX_BOOK_ENTRIES,
};

/// Request for the top `depth` entries of a symbol's book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookQuery {
    pub symbol: String,
    pub depth: u32,
}

impl BookQuery {
    pub fn new(symbol: impl Into<String>, depth: u32) -> Self {
        Self { symbol: symbol.into(), depth }
    }
}

/// One resting order as reported by the remote book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEntry {
    pub trader: Address,
    pub id: OrderId,
    pub side: Side,
    pub quantity: u64,
    pub price: u64,
}

/// Decoded answer to a [`BookQuery`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookReport {
    pub symbol: String,
    pub entries: Vec<BookEntry>,
    /// The wire declared more entries than [`MAX_BOOK_ENTRIES`]; the excess
    /// was ignored.
    pub truncated: bool,
}

impl BookReport {
    pub fn new(symbol: impl Into<String>, entries: Vec<BookEntry>) -> Self {
        Self {
            symbol: symbol.into(),
            entries,
            truncated: false,
        }
    }

    pub fn bids(&self) -> impl Iterator<Item = &BookEntry> {
        self.entries.iter().filter(|e| e.side == Side::Buy)
    }

    pub fn asks(&self) -> impl Iterator<Item = &BookEntry> {
        self.entries.iter().filter(|e| e.side == Side::Sell)
    }
}

/// Encode a book query into its 19-byte wire form
///
/// The 32-bit depth travels in an 8-byte little-endian slot.
pub fn encode_book_query(query: &BookQuery) -> Result<[u8; BOOK_QUERY_LEN], EncodingError> {
    let symbol = symbol_slot(&query.symbol)?;

    let mut buf = [0u8; BOOK_QUERY_LEN];
    buf[0] = BOOK_TAG;
    buf[1..11].copy_from_slice(&symbol);
    buf[11..19].copy_from_slice(&(query.depth as u64).to_le_bytes());
    Ok(buf)
}

/// Decode a 19-byte book query
pub fn decode_book_query(buf: &[u8]) -> Result<BookQuery, DecodingError> {
    if buf.len() != BOOK_QUERY_LEN {
        return Err(DecodingError::UnexpectedLength {
            expected: BOOK_QUERY_LEN,
            actual: buf.len(),
        });
    }
    if buf[0] != BOOK_TAG {
        return Err(DecodingError::UnknownTag(buf[0]));
    }

    let symbol = read_symbol(buf, 1)?;
    let raw_depth = read_u64_le(buf, 11)?;
    let depth = u32::try_from(raw_depth).map_err(|_| DecodingError::DepthOutOfRange(raw_depth))?;
    Ok(BookQuery { symbol, depth })
}

/// Decode a hex-encoded book report, as returned by the inspect endpoint
pub fn decode_book_report(hex_payload: &str) -> Result<BookReport, DecodingError> {
    let buf = decode_hex_payload(hex_payload)?;
    decode_book_report_bytes(&buf)
}

/// Decode a raw book report
///
/// At most [`MAX_BOOK_ENTRIES`] entries are read regardless of the declared
/// count. The buffer must hold every entry that will be read; bytes past
/// the last one are ignored.
pub fn decode_book_report_bytes(buf: &[u8]) -> Result<BookReport, DecodingError> {
    if buf.len() < BOOK_REPORT_HEADER_LEN {
        return Err(DecodingError::BufferTooShort {
            required: BOOK_REPORT_HEADER_LEN,
            actual: buf.len(),
        });
    }

    let symbol = read_symbol(buf, BOOK_REPORT_SYMBOL_OFFSET)?;
    let declared = read_u64_le(buf, BOOK_REPORT_COUNT_OFFSET)?;
    let count = declared.min(MAX_BOOK_ENTRIES as u64) as usize;

    let required = BOOK_REPORT_HEADER_LEN + count * BOOK_ENTRY_LEN;
    if buf.len() < required {
        return Err(DecodingError::BufferTooShort {
            required,
            actual: buf.len(),
        });
    }

    let entries = (0..count)
        .map(|i| decode_entry(buf, BOOK_REPORT_HEADER_LEN + i * BOOK_ENTRY_LEN))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BookReport {
        symbol,
        entries,
        truncated: declared > MAX_BOOK_ENTRIES as u64,
    })
}

fn decode_entry(buf: &[u8], start: usize) -> Result<BookEntry, DecodingError> {
    let side_byte = *buf
        .get(start + ENTRY_SIDE_OFFSET)
        .ok_or(DecodingError::BufferTooShort {
            required: start + BOOK_ENTRY_LEN,
            actual: buf.len(),
        })?;

    Ok(BookEntry {
        trader: read_address(buf, start + ENTRY_TRADER_OFFSET)?,
        id: OrderId(read_u64_le(buf, start + ENTRY_ID_OFFSET)?),
        side: Side::from_wire(side_byte),
        quantity: read_u64_le(buf, start + ENTRY_QUANTITY_OFFSET)?,
        price: read_u64_le(buf, start + ENTRY_PRICE_OFFSET)?,
    })
}

/// Encode a book report in the layout the remote exchange produces
///
/// Byte 0 carries the book tag and byte 1 is reserved (zero). Entries past
/// [`MAX_BOOK_ENTRIES`] are not written.
pub fn encode_book_report(report: &BookReport) -> Result<Vec<u8>, EncodingError> {
    let symbol = symbol_slot(&report.symbol)?;
    let count = report.entries.len().min(MAX_BOOK_ENTRIES);

    let mut buf = Vec::with_capacity(BOOK_REPORT_HEADER_LEN + count * BOOK_ENTRY_LEN);
    buf.push(BOOK_TAG);
    buf.push(0);
    buf.extend_from_slice(&symbol);
    buf.extend_from_slice(&(count as u64).to_le_bytes());

    for entry in report.entries.iter().take(count) {
        buf.extend_from_slice(entry.trader.as_bytes());
        buf.extend_from_slice(&entry.id.value().to_le_bytes());
        buf.push(entry.side.to_wire());
        buf.extend_from_slice(&entry.quantity.to_le_bytes());
        buf.extend_from_slice(&entry.price.to_le_bytes());
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::ADDRESS_LEN;

    fn entry(n: u8, side: Side) -> BookEntry {
        BookEntry {
            trader: Address::from_bytes([n; ADDRESS_LEN]),
            id: OrderId(n as u64),
            side,
            quantity: 10 * n as u64,
            price: 1000 + n as u64,
        }
    }

    /// Hand-built report header followed by `entries` raw entry bytes
    fn raw_report(symbol: &[u8], declared: u64, entries: &[[u8; BOOK_ENTRY_LEN]]) -> Vec<u8> {
        let mut buf = vec![0x42, 0x00];
        let mut slot = [0u8; 10];
        slot[..symbol.len()].copy_from_slice(symbol);
        buf.extend_from_slice(&slot);
        buf.extend_from_slice(&declared.to_le_bytes());
        for e in entries {
            buf.extend_from_slice(e);
        }
        buf
    }

    fn raw_entry(trader: u8, id: u64, side: u8, qty: u64, price: u64) -> [u8; BOOK_ENTRY_LEN] {
        let mut e = [0u8; BOOK_ENTRY_LEN];
        e[0..20].copy_from_slice(&[trader; 20]);
        e[20..28].copy_from_slice(&id.to_le_bytes());
        e[28] = side;
        e[29..37].copy_from_slice(&qty.to_le_bytes());
        e[37..45].copy_from_slice(&price.to_le_bytes());
        e
    }

    #[test]
    fn test_encode_book_query_layout() {
        let bytes = encode_book_query(&BookQuery::new("CTSI/USDT", 10)).unwrap();

        assert_eq!(bytes.len(), 19);
        assert_eq!(bytes[0], 0x42);
        assert_eq!(&bytes[1..10], b"CTSI/USDT");
        assert_eq!(bytes[10], 0x00);
        assert_eq!(&bytes[11..19], &[0x0a, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_encode_book_query_full_width_symbol() {
        let bytes = encode_book_query(&BookQuery::new("ABCDE/FGHI", u32::MAX)).unwrap();
        assert_eq!(&bytes[1..11], b"ABCDE/FGHI");
        assert_eq!(&bytes[11..19], &[0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0]);
    }

    #[test]
    fn test_encode_book_query_symbol_too_long() {
        let err = encode_book_query(&BookQuery::new("CTSI/USDT/X", 1)).unwrap_err();
        assert_eq!(err, EncodingError::SymbolTooLong { len: 11 });
    }

    #[test]
    fn test_encode_book_query_non_ascii_symbol() {
        // 8 UTF-8 bytes fit the slot but would not decode back
        let err = encode_book_query(&BookQuery::new("ÉTH/USD", 1)).unwrap_err();
        assert!(matches!(err, EncodingError::NonAsciiSymbol { .. }));
    }

    #[test]
    fn test_decode_book_query() {
        let bytes = encode_book_query(&BookQuery::new("ADA/BTC", 64)).unwrap();
        assert_eq!(decode_book_query(&bytes).unwrap(), BookQuery::new("ADA/BTC", 64));
    }

    #[test]
    fn test_decode_book_query_rejects_wrong_tag_and_length() {
        let mut bytes = encode_book_query(&BookQuery::new("ADA/BTC", 1)).unwrap();
        assert_eq!(
            decode_book_query(&bytes[..18]),
            Err(DecodingError::UnexpectedLength { expected: 19, actual: 18 })
        );
        bytes[0] = 0x57;
        assert_eq!(decode_book_query(&bytes), Err(DecodingError::UnknownTag(0x57)));
    }

    #[test]
    fn test_decode_book_query_depth_out_of_range() {
        let mut bytes = encode_book_query(&BookQuery::new("ADA/BTC", 1)).unwrap();
        bytes[15] = 1;
        assert_eq!(
            decode_book_query(&bytes),
            Err(DecodingError::DepthOutOfRange(1u64 << 32 | 1))
        );
    }

    #[test]
    fn test_decode_book_report_per_entry_offsets() {
        let buf = raw_report(
            b"CTSI/USDT",
            2,
            &[raw_entry(0xaa, 1, b'B', 5, 100), raw_entry(0xbb, 2, b'S', 7, 120)],
        );
        let report = decode_book_report(&hex::encode(&buf)).unwrap();

        assert_eq!(report.symbol, "CTSI/USDT");
        assert!(!report.truncated);
        assert_eq!(report.entries.len(), 2);

        let second = &report.entries[1];
        assert_eq!(second.trader.to_string(), format!("0x{}", "bb".repeat(20)));
        assert_eq!(second.id, OrderId(2));
        assert_eq!(second.side, Side::Sell);
        assert_eq!(second.quantity, 7);
        assert_eq!(second.price, 120);

        assert_eq!(report.bids().count(), 1);
        assert_eq!(report.asks().count(), 1);
    }

    #[test]
    fn test_decode_book_report_side_flag() {
        let buf = raw_report(b"X", 2, &[raw_entry(1, 1, 0x42, 1, 1), raw_entry(2, 2, 0x00, 1, 1)]);
        let report = decode_book_report_bytes(&buf).unwrap();
        assert_eq!(report.entries[0].side, Side::Buy);
        assert_eq!(report.entries[1].side, Side::Sell);
    }

    #[test]
    fn test_decode_book_report_empty() {
        let report = decode_book_report_bytes(&raw_report(b"ACME", 0, &[])).unwrap();
        assert_eq!(report.symbol, "ACME");
        assert!(report.entries.is_empty());
    }

    #[test]
    fn test_decode_book_report_short_header() {
        assert_eq!(
            decode_book_report_bytes(&[0x42; 19]),
            Err(DecodingError::BufferTooShort { required: 20, actual: 19 })
        );
    }

    #[test]
    fn test_decode_book_report_missing_entry_bytes() {
        let buf = raw_report(b"ACME", 3, &[raw_entry(1, 1, b'B', 1, 1)]);
        assert_eq!(
            decode_book_report_bytes(&buf),
            Err(DecodingError::BufferTooShort { required: 20 + 3 * 45, actual: 65 })
        );
    }

    #[test]
    fn test_decode_book_report_huge_count_few_entries() {
        let entries: Vec<_> = (0..5).map(|i| raw_entry(i, i as u64, b'B', 1, 1)).collect();
        let buf = raw_report(b"ACME", 10_000, &entries);
        assert_eq!(
            decode_book_report_bytes(&buf),
            Err(DecodingError::BufferTooShort { required: 20 + 200 * 45, actual: 20 + 5 * 45 })
        );
    }

    #[test]
    fn test_decode_book_report_caps_at_200() {
        let entries: Vec<_> = (0..250u64).map(|i| raw_entry(1, i, b'S', i, i)).collect();
        let buf = raw_report(b"ACME", 10_000, &entries);
        let report = decode_book_report_bytes(&buf).unwrap();
        assert_eq!(report.entries.len(), 200);
        assert!(report.truncated);
        assert_eq!(report.entries[199].id, OrderId(199));
    }

    #[test]
    fn test_decode_book_report_invalid_hex() {
        assert!(matches!(decode_book_report("4"), Err(DecodingError::InvalidHex(_))));
        assert!(matches!(decode_book_report("zz"), Err(DecodingError::InvalidHex(_))));
    }

    #[test]
    fn test_encode_book_report_layout() {
        let report = BookReport::new("CTSI/USDT", vec![entry(1, Side::Buy), entry(2, Side::Sell)]);
        let buf = encode_book_report(&report).unwrap();

        assert_eq!(buf.len(), 20 + 2 * 45);
        assert_eq!(buf[0], 0x42);
        assert_eq!(buf[1], 0x00);
        assert_eq!(&buf[2..11], b"CTSI/USDT");
        assert_eq!(&buf[12..20], &2u64.to_le_bytes());
        assert_eq!(buf[20 + 28], b'B');
        assert_eq!(buf[20 + 45 + 28], b'S');
        assert_eq!(decode_book_report_bytes(&buf).unwrap(), report);
    }

    #[test]
    fn test_encode_book_report_writes_at_most_200() {
        let entries = (0..=255u8).map(|n| entry(n, Side::Buy)).collect();
        let buf = encode_book_report(&BookReport::new("ACME", entries)).unwrap();
        assert_eq!(buf.len(), 20 + 200 * 45);
        assert_eq!(&buf[12..20], &200u64.to_le_bytes());
    }

    #[test]
    fn test_book_report_json_shape() {
        let report = BookReport::new("ACME", vec![entry(1, Side::Buy)]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["entries"][0]["side"], "buy");
        assert_eq!(json["entries"][0]["trader"], format!("0x{}", "01".repeat(20)));
        assert_eq!(json["truncated"], false);
    }
}
