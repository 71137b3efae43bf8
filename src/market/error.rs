use crate::ledger::TransferError;
use thiserror::Error;

/// Errors returned by marketplace operations.
///
/// Any error means the call committed nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    #[error("Not found")]
    NotFound,

    /// Reserved; no current operation returns it
    #[error("Already exists")]
    AlreadyExists,

    #[error("Insufficient stake: provided {stake}, minimum {minimum}")]
    InsufficientStake { stake: u64, minimum: u64 },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid rating {0}: must be within 1..=100")]
    InvalidRating(u8),

    #[error("Transfer failed: {0}")]
    TransferFailed(#[from] TransferError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("State export/import error: {0}")]
    StateError(String),
}
