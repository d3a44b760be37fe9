//! Per-trader token balances
//!
//! Balances move only through deposits and withdrawals; trades are not
//! settled against wallets here.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::info;
use types::errors::EngineError;
use types::ids::Address;

#[derive(Debug, Default)]
pub struct Wallets {
    balances: RwLock<BTreeMap<Address, BTreeMap<Address, u64>>>,
}

impl Wallets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deposit(&self, trader: Address, token: Address, amount: u64) -> Result<u64, EngineError> {
        let mut balances = self.balances.write();
        let balance = balances.entry(trader).or_default().entry(token).or_insert(0);
        *balance = balance.checked_add(amount).ok_or_else(|| EngineError::BalanceOverflow {
            trader: trader.to_string(),
            token: token.to_string(),
        })?;
        info!(%trader, %token, amount, balance = *balance, "Deposit");
        Ok(*balance)
    }

    pub fn withdraw(&self, trader: Address, token: Address, amount: u64) -> Result<u64, EngineError> {
        let mut balances = self.balances.write();
        let available = balances
            .get(&trader)
            .and_then(|w| w.get(&token))
            .copied()
            .unwrap_or(0);
        if available < amount {
            return Err(EngineError::InsufficientFunds {
                trader: trader.to_string(),
                token: token.to_string(),
                required: amount,
                available,
            });
        }

        let remaining = available - amount;
        balances.entry(trader).or_default().insert(token, remaining);
        info!(%trader, %token, amount, balance = remaining, "Withdrawal");
        Ok(remaining)
    }

    pub fn balance(&self, trader: &Address, token: &Address) -> u64 {
        self.balances
            .read()
            .get(trader)
            .and_then(|w| w.get(token))
            .copied()
            .unwrap_or(0)
    }

    /// All balances of a trader, ordered by token address
    pub fn balances(&self, trader: &Address) -> Vec<(Address, u64)> {
        self.balances
            .read()
            .get(trader)
            .map(|w| w.iter().map(|(token, qty)| (*token, *qty)).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    #[test]
    fn test_deposit_and_withdraw() {
        let wallets = Wallets::new();
        assert_eq!(wallets.deposit(addr(1), addr(9), 100).unwrap(), 100);
        assert_eq!(wallets.withdraw(addr(1), addr(9), 40).unwrap(), 60);
        assert_eq!(wallets.balance(&addr(1), &addr(9)), 60);
    }

    #[test]
    fn test_withdraw_insufficient_funds() {
        let wallets = Wallets::new();
        wallets.deposit(addr(1), addr(9), 10).unwrap();
        let err = wallets.withdraw(addr(1), addr(9), 11).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientFunds {
                trader: addr(1).to_string(),
                token: addr(9).to_string(),
                required: 11,
                available: 10,
            }
        );
        assert_eq!(wallets.balance(&addr(1), &addr(9)), 10);
    }

    #[test]
    fn test_deposit_overflow() {
        let wallets = Wallets::new();
        wallets.deposit(addr(1), addr(9), u64::MAX).unwrap();
        assert!(matches!(
            wallets.deposit(addr(1), addr(9), 1),
            Err(EngineError::BalanceOverflow { .. })
        ));
    }

    #[test]
    fn test_balances_sorted_by_token() {
        let wallets = Wallets::new();
        wallets.deposit(addr(1), addr(7), 1).unwrap();
        wallets.deposit(addr(1), addr(3), 2).unwrap();
        assert_eq!(wallets.balances(&addr(1)), vec![(addr(3), 2), (addr(7), 1)]);
        assert!(wallets.balances(&addr(2)).is_empty());
    }
}
