// MarketStore - Persistent key-value storage using sled
//
// Provides typed access for storing:
// - Marketplace state snapshots
// - The custody and owner accounts the snapshot was taken with

use crate::account::AccountId;
use crate::market::{MarketError, MarketState};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Key prefixes for organizing data
mod keys {
    pub const MARKET_STATE: &[u8] = b"market:state";
    pub const MARKET_ACCOUNTS: &[u8] = b"market:accounts";
}

/// Errors from storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open database: {0}")]
    OpenFailed(String),

    #[error("Database operation failed: {0}")]
    DatabaseError(String),

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Flush failed: {0}")]
    FlushFailed(String),
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}

/// Statistics about the storage
#[derive(Clone, Debug)]
pub struct StorageStats {
    /// Number of keys in the database
    pub key_count: usize,
    /// Approximate disk size in bytes
    pub disk_size_bytes: u64,
}

/// Custody and owner accounts a marketplace runs with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketAccounts {
    pub custody: AccountId,
    pub owner: AccountId,
}

/// Persistent store for marketplace snapshots
///
/// Uses sled for crash-safe, embedded storage.
/// All writes are atomic and durable after flush.
pub struct MarketStore {
    db: sled::Db,
}

impl MarketStore {
    /// Open or create a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(|e| StoreError::OpenFailed(e.to_string()))?;
        Ok(Self { db })
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.db.is_empty())
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::FlushFailed(e.to_string()))?;
        Ok(())
    }

    /// Get storage statistics
    pub fn stats(&self) -> Result<StorageStats, StoreError> {
        Ok(StorageStats {
            key_count: self.db.len(),
            disk_size_bytes: self.db.size_on_disk().unwrap_or(0),
        })
    }

    fn put_raw(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.db.insert(key, value)?;
        Ok(())
    }

    fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.db.get(key)?.map(|v| v.to_vec()))
    }

    // ========================================================================
    // MARKET STATE PERSISTENCE
    // ========================================================================

    /// Save a marketplace snapshot, replacing any earlier one
    pub fn save_state(&self, state: &MarketState) -> Result<(), StoreError> {
        let bytes = state
            .to_bytes()
            .map_err(|e: MarketError| StoreError::SerializationFailed(e.to_string()))?;
        self.put_raw(keys::MARKET_STATE, &bytes)
    }

    /// Load the last saved marketplace snapshot
    pub fn load_state(&self) -> Result<Option<MarketState>, StoreError> {
        match self.get_raw(keys::MARKET_STATE)? {
            Some(bytes) => {
                let state = MarketState::from_bytes(&bytes)
                    .map_err(|e: MarketError| StoreError::DeserializationFailed(e.to_string()))?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    /// Drop the saved snapshot
    pub fn clear_state(&self) -> Result<(), StoreError> {
        self.db.remove(keys::MARKET_STATE)?;
        Ok(())
    }

    // ========================================================================
    // ACCOUNTS
    // ========================================================================

    pub fn save_accounts(&self, accounts: &MarketAccounts) -> Result<(), StoreError> {
        let bytes = postcard::to_allocvec(accounts)
            .map_err(|e| StoreError::SerializationFailed(e.to_string()))?;
        self.put_raw(keys::MARKET_ACCOUNTS, &bytes)
    }

    pub fn load_accounts(&self) -> Result<Option<MarketAccounts>, StoreError> {
        match self.get_raw(keys::MARKET_ACCOUNTS)? {
            Some(bytes) => {
                let accounts = postcard::from_bytes(&bytes)
                    .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;
                Ok(Some(accounts))
            }
            None => Ok(None),
        }
    }
}
