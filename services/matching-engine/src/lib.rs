//! Matching Engine Service
//!
//! Reference price-time priority matching engine for a fixed set of symbols.
//! Every mutation of a book runs the match loop to completion, appends the
//! resulting trades to that symbol's transaction log and notifies
//! subscribers.
//!
//! **Key Invariants:**
//! - No crossed book after a match pass
//! - Trades execute at the floor midpoint of the two limit prices
//! - Trade quantity is the smaller of the two remaining quantities
//! - Integer arithmetic only
//!
//! The [`inspect`] module answers binary inspect queries from the engine's
//! state, and [`session`] dispatches the closed set of user actions.

pub mod book;
pub mod clock;
pub mod config;
pub mod engine;
pub mod events;
pub mod inspect;
pub mod matching;
pub mod session;
pub mod subscribers;
pub mod wallet;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use engine::MatchingEngine;
pub use events::{BookUpdate, UpdateCause};
pub use session::{Action, Divergence, MarketSession, Outcome};
pub use subscribers::{SubscriptionId, Subscribers};
pub use wallet::Wallets;
