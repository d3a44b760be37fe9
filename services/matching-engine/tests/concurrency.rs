//! Concurrency test
//!
//! Symbols are locked independently, so threads driving different symbols
//! through one shared engine must each see a consistent book.

use std::sync::Arc;
use std::thread;

use matching_engine::MatchingEngine;
use types::ids::Address;
use types::order::{Order, Side};

#[test]
fn test_concurrent_symbols() {
    let engine = Arc::new(MatchingEngine::default());
    let symbols = ["BTC/USDT", "DOGE/USDT", "CTSI/USDT", "ADA/BTC"];

    let handles: Vec<_> = symbols
        .iter()
        .map(|symbol| {
            let engine = Arc::clone(&engine);
            let symbol = symbol.to_string();
            thread::spawn(move || {
                for _ in 0..500 {
                    let sell = Order::new(engine.next_order_id(), Address::ZERO, Side::Sell, 50_000, 1);
                    engine.submit(&symbol, sell).unwrap();
                    let buy = Order::new(engine.next_order_id(), Address::ZERO, Side::Buy, 50_000, 1);
                    engine.submit(&symbol, buy).unwrap();
                }
                engine.transactions(&symbol).unwrap().len()
            })
        })
        .collect();

    let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(total, 2000);

    for symbol in symbols {
        let book = engine.book_snapshot(symbol, usize::MAX).unwrap();
        assert!(book.bids.is_empty() && book.asks.is_empty());
    }
}

#[test]
fn test_concurrent_same_symbol() {
    let engine = Arc::new(MatchingEngine::default());

    let handles: Vec<_> = [Side::Buy, Side::Sell]
        .into_iter()
        .map(|side| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for _ in 0..1000 {
                    let order = Order::new(engine.next_order_id(), Address::ZERO, side, 100, 1);
                    engine.submit("CTSI/USDT", order).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let trades = engine.transactions("CTSI/USDT").unwrap();
    assert_eq!(trades.len(), 1000);
    let sequences: Vec<u64> = trades.iter().map(|t| t.sequence).collect();
    assert!(sequences.windows(2).all(|w| w[0] < w[1]));
}
