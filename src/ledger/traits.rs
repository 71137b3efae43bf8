// Ledger and clock traits - the only way the marketplace touches value and time

use crate::account::AccountId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a ledger reports when a value movement cannot complete.
/// A failed transfer leaves both balances unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Insufficient balance: available {available}, required {required}")]
    InsufficientBalance { available: u64, required: u64 },

    #[error("Unknown account: {0}")]
    UnknownAccount(AccountId),

    #[error("Sender and recipient are the same account")]
    SameAccount,

    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Balance would overflow")]
    Overflow,

    #[error("Rollback of an applied transfer failed: {0}")]
    RollbackFailed(String),
}

/// One leg of a value movement
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub amount: u64,
    pub from: AccountId,
    pub to: AccountId,
}

impl Transfer {
    pub fn new(amount: u64, from: AccountId, to: AccountId) -> Self {
        Self { amount, from, to }
    }

    /// The same leg in the opposite direction
    pub fn reversed(&self) -> Self {
        Self {
            amount: self.amount,
            from: self.to,
            to: self.from,
        }
    }
}

/// Atomic value-transfer primitive between two accounts.
///
/// `transfer` must debit exactly `amount` from `from` and credit exactly
/// `amount` to `to`, or change nothing and return an error.
pub trait Ledger {
    fn transfer(&mut self, amount: u64, from: &AccountId, to: &AccountId) -> Result<(), TransferError>;

    /// Apply several legs as one unit.
    ///
    /// The default applies legs in order and, when one fails, reverses the
    /// already applied legs newest first. Under serial execution the reversal
    /// cannot run short of funds because each recipient was just credited.
    fn transfer_batch(&mut self, transfers: &[Transfer]) -> Result<(), TransferError> {
        for (idx, leg) in transfers.iter().enumerate() {
            if let Err(err) = self.transfer(leg.amount, &leg.from, &leg.to) {
                for applied in transfers[..idx].iter().rev() {
                    let back = applied.reversed();
                    self.transfer(back.amount, &back.from, &back.to)
                        .map_err(|e| TransferError::RollbackFailed(e.to_string()))?;
                }
                return Err(err);
            }
        }
        Ok(())
    }
}

/// Monotonic block-height source used for expiry comparisons
pub trait Clock {
    fn current_height(&self) -> u64;
}
