//! Error types for the codec and the matching engine
//!
//! Error taxonomy using thiserror. Every variant is a local, recoverable
//! condition surfaced to the caller.

use thiserror::Error;

use crate::ids::OrderId;
use crate::order::OrderStatus;

/// Top-level error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Decoding error: {0}")]
    Decoding(#[from] DecodingError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Input violates a size or format precondition of an outgoing message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Symbol is {len} bytes, at most 10 fit the wire slot")]
    SymbolTooLong { len: usize },

    #[error("Symbol is not ASCII: {symbol}")]
    NonAsciiSymbol { symbol: String },

    #[error("Invalid address {input}: {reason}")]
    InvalidAddress { input: String, reason: String },
}

/// Incoming buffer does not match the expected layout
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodingError {
    #[error("Invalid hex payload: {0}")]
    InvalidHex(String),

    #[error("Buffer too short: required {required} bytes, got {actual}")]
    BufferTooShort { required: usize, actual: usize },

    #[error("Unexpected buffer length: expected {expected} bytes, got {actual}")]
    UnexpectedLength { expected: usize, actual: usize },

    #[error("Truncated record: {len} bytes is not a multiple of {record_size}")]
    TruncatedRecord { len: usize, record_size: usize },

    #[error("Unknown message tag: {0:#04x}")]
    UnknownTag(u8),

    #[error("Depth {0} does not fit in 32 bits")]
    DepthOutOfRange(u64),

    #[error("Symbol bytes are not valid ASCII")]
    InvalidSymbol,
}

/// Order-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("Fill of {fill} exceeds remaining {remaining} on order {order_id}")]
    Overfill { order_id: OrderId, remaining: u64, fill: u64 },

    #[error("Order {order_id} already in terminal state {status:?}")]
    AlreadyTerminal { order_id: OrderId, status: OrderStatus },
}

/// Matching-engine errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("Order {order_id} already resting on {symbol}")]
    DuplicateOrderId { symbol: String, order_id: OrderId },

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    #[error("Insufficient funds for {trader} in {token}: required {required}, available {available}")]
    InsufficientFunds {
        trader: String,
        token: String,
        required: u64,
        available: u64,
    },

    #[error("Balance overflow for {trader} in {token}")]
    BalanceOverflow { trader: String, token: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Decoding error: {0}")]
    Decoding(#[from] DecodingError),
}
