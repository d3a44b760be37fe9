//! Types library for the inspect client and reference exchange
//!
//! Shared definitions used by both the wire codec and the matching engine,
//! so that a book decoded from the remote ledger and a book produced by the
//! local engine speak the same vocabulary.
//!
//! # Modules
//! - `ids`: Identifiers (Address, Symbol, OrderId)
//! - `order`: Order side, lifecycle state and resting order
//! - `trade`: Executed trade record
//! - `errors`: Error taxonomy

pub mod ids;
pub mod order;
pub mod trade;
pub mod errors;
