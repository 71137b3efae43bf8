use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const ACCOUNT_PREFIX: &str = "acct:";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Invalid account format: {0}")]
    InvalidFormat(String),

    #[error("Invalid base58 encoding: {0}")]
    InvalidBase58(String),

    #[error("Invalid account length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// Identifier of a ledger account (provider, subscriber, custody, owner).
///
/// The marketplace never interprets the bytes; it only compares them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId([u8; 32]);

impl AccountId {
    /// Generate a random account ID
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Derive a deterministic account ID from a human-readable label
    pub fn from_label(label: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"account:");
        hasher.update(label.as_bytes());
        let result = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&result);
        Self(bytes)
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short hex form for log lines
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", ACCOUNT_PREFIX, bs58::encode(self.0).into_string())
    }
}

impl FromStr for AccountId {
    type Err = AccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key_part = s
            .strip_prefix(ACCOUNT_PREFIX)
            .ok_or_else(|| AccountIdError::InvalidFormat(format!("missing '{}' prefix", ACCOUNT_PREFIX)))?;

        if key_part.is_empty() {
            return Err(AccountIdError::InvalidFormat("key part cannot be empty".into()));
        }

        let bytes = bs58::decode(key_part)
            .into_vec()
            .map_err(|e| AccountIdError::InvalidBase58(e.to_string()))?;

        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| AccountIdError::InvalidLength(bytes.len()))?;
        Ok(Self(arr))
    }
}
