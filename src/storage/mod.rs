// Storage module - PERSISTENCE
// Handles persistent snapshots of the marketplace state using sled

mod store;

pub use store::{MarketAccounts, MarketStore, StorageStats, StoreError};
