// Market state - every map the marketplace owns, plus its id sequences
//
// The whole struct is the unit of export/import, so a restored marketplace
// continues with the same ids and counters.

use crate::account::AccountId;
use crate::market::bundle::Bundle;
use crate::market::referral::ReferralAccrual;
use crate::market::registry::Dataset;
use crate::market::subscription::{RenewalState, Subscription};
use crate::market::tracker::{Analytics, Category, Featured, Rating, Review, Usage, Version};
use crate::market::MarketError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Single-writer id generator. Starts at 1 and only moves forward.
///
/// Creating operations `advance` only after their transfer has gone
/// through, so a failed call consumes no id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    next: u64,
}

impl Sequence {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// The id the next `advance` will hand out
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Hand out the current id and move on
    pub fn advance(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

/// Running totals over the marketplace's lifetime
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketStats {
    pub datasets_registered: u64,
    pub datasets_deactivated: u64,
    pub bundles_created: u64,
    /// Access windows granted (direct, renewal, bundle member, bulk)
    pub subscriptions_granted: u64,
    pub renewals: u64,
    /// Stake currently held in custody
    pub stake_in_custody: u64,
    /// Value paid subscriber -> provider
    pub provider_volume: u64,
    /// Value paid into custody by bulk purchases
    pub custody_volume: u64,
    /// Value paid out of custody to referrers
    pub referral_payouts: u64,
}

/// Serializable snapshot of the marketplace
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MarketState {
    pub(crate) datasets: HashMap<u64, Dataset>,
    pub(crate) subscriptions: HashMap<(u64, AccountId), Subscription>,
    pub(crate) renewals: HashMap<(u64, AccountId), RenewalState>,
    pub(crate) ratings: HashMap<(u64, AccountId), Rating>,
    pub(crate) reviews: HashMap<(u64, AccountId), Review>,
    pub(crate) usage: HashMap<u64, Usage>,
    pub(crate) analytics: HashMap<u64, Analytics>,
    pub(crate) categories: HashMap<u64, Category>,
    pub(crate) featured: HashMap<u64, Featured>,
    pub(crate) versions: HashMap<u64, Version>,
    pub(crate) bundles: HashMap<u64, Bundle>,
    pub(crate) bundle_subscriptions: HashMap<(u64, AccountId), Subscription>,
    pub(crate) referrals: HashMap<AccountId, ReferralAccrual>,
    pub(crate) next_dataset_id: Sequence,
    pub(crate) next_bundle_id: Sequence,
    pub(crate) version_counter: Sequence,
    pub(crate) stats: MarketStats,
}

impl MarketState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dataset_count(&self) -> usize {
        self.datasets.len()
    }

    pub fn bundle_count(&self) -> usize {
        self.bundles.len()
    }

    pub fn stats(&self) -> &MarketStats {
        &self.stats
    }

    pub fn dataset(&self, dataset_id: u64) -> Option<&Dataset> {
        self.datasets.get(&dataset_id)
    }

    pub fn bundle(&self, bundle_id: u64) -> Option<&Bundle> {
        self.bundles.get(&bundle_id)
    }

    /// Every dataset, ordered by id
    pub fn datasets_sorted(&self) -> Vec<&Dataset> {
        let mut datasets: Vec<&Dataset> = self.datasets.values().collect();
        datasets.sort_by_key(|d| d.id());
        datasets
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, MarketError> {
        postcard::to_allocvec(self).map_err(|e| MarketError::StateError(e.to_string()))
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MarketError> {
        postcard::from_bytes(bytes).map_err(|e| MarketError::StateError(e.to_string()))
    }
}
