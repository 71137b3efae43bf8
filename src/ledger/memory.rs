// InMemoryLedger - Balance map implementing the Ledger trait
//
// Used by tests and by hosts that keep balances in-process.

use crate::account::AccountId;
use crate::ledger::{Ledger, Transfer, TransferError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Account balances with atomic transfers.
///
/// Sending from an account that was never credited is an error; receiving
/// opens the account.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InMemoryLedger {
    balances: HashMap<AccountId, u64>,
    history: Vec<Transfer>,
}

impl InMemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: open an account with a starting balance
    pub fn with_balance(mut self, account: AccountId, amount: u64) -> Self {
        self.balances.insert(account, amount);
        self
    }

    /// Credit an account out of thin air (genesis / faucet)
    pub fn mint(&mut self, account: &AccountId, amount: u64) -> Result<u64, TransferError> {
        let balance = self.balances.entry(*account).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(TransferError::Overflow)?;
        Ok(*balance)
    }

    /// Balance of an account (0 if unknown)
    pub fn balance_of(&self, account: &AccountId) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Check whether an account has ever been opened
    pub fn has_account(&self, account: &AccountId) -> bool {
        self.balances.contains_key(account)
    }

    /// Sum of all balances
    pub fn total_supply(&self) -> u64 {
        self.balances.values().fold(0u64, |acc, b| acc.saturating_add(*b))
    }

    /// Every transfer applied so far, oldest first
    pub fn history(&self) -> &[Transfer] {
        &self.history
    }

    /// Number of transfers applied so far
    pub fn transfer_count(&self) -> usize {
        self.history.len()
    }

    fn apply(balances: &mut HashMap<AccountId, u64>, leg: &Transfer) -> Result<(), TransferError> {
        if leg.amount == 0 {
            return Err(TransferError::InvalidAmount);
        }
        if leg.from == leg.to {
            return Err(TransferError::SameAccount);
        }

        let available = *balances
            .get(&leg.from)
            .ok_or(TransferError::UnknownAccount(leg.from))?;
        if available < leg.amount {
            return Err(TransferError::InsufficientBalance {
                available,
                required: leg.amount,
            });
        }

        let credited = balances
            .get(&leg.to)
            .copied()
            .unwrap_or(0)
            .checked_add(leg.amount)
            .ok_or(TransferError::Overflow)?;

        balances.insert(leg.from, available - leg.amount);
        balances.insert(leg.to, credited);
        Ok(())
    }
}

impl Ledger for InMemoryLedger {
    fn transfer(&mut self, amount: u64, from: &AccountId, to: &AccountId) -> Result<(), TransferError> {
        let leg = Transfer::new(amount, *from, *to);
        Self::apply(&mut self.balances, &leg)?;
        self.history.push(leg);
        Ok(())
    }

    /// Stage every leg on a copy and swap it in only when all legs succeed
    fn transfer_batch(&mut self, transfers: &[Transfer]) -> Result<(), TransferError> {
        let mut staged = self.balances.clone();
        for leg in transfers {
            Self::apply(&mut staged, leg)?;
        }
        self.balances = staged;
        self.history.extend(transfers.iter().cloned());
        Ok(())
    }
}
