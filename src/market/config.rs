// Marketplace configuration - economic constants and field bounds

use crate::market::MarketError;

/// Configuration for the marketplace
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarketConfig {
    /// Minimum stake (minor units) a provider locks to register a dataset
    pub min_stake: u64,
    /// Length of every access window, in block heights
    pub subscription_period: u64,
    /// Quality score a dataset starts with
    pub initial_quality_score: u64,
    /// Share of the dataset price paid to a referrer
    pub referral_reward_percent: u64,
    /// Flat discount applied to bulk purchases at or above the threshold
    pub bulk_discount_percent: u64,
    /// Number of datasets from which the bulk discount applies
    pub bulk_discount_threshold: usize,
    /// Upper bound on dataset ids in a bundle or bulk purchase
    pub max_bundle_datasets: usize,
    pub max_name_len: usize,
    pub max_description_len: usize,
    pub max_review_len: usize,
    pub max_category_len: usize,
    pub max_tags: usize,
}

impl MarketConfig {
    /// Create a new config with builder pattern
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_stake(mut self, stake: u64) -> Self {
        self.min_stake = stake;
        self
    }

    pub fn with_subscription_period(mut self, blocks: u64) -> Self {
        self.subscription_period = blocks;
        self
    }

    pub fn with_referral_reward_percent(mut self, percent: u64) -> Self {
        self.referral_reward_percent = percent;
        self
    }

    pub fn with_bulk_discount(mut self, percent: u64, threshold: usize) -> Self {
        self.bulk_discount_percent = percent;
        self.bulk_discount_threshold = threshold;
        self
    }

    pub fn with_max_bundle_datasets(mut self, max: usize) -> Self {
        self.max_bundle_datasets = max;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), MarketError> {
        if self.subscription_period == 0 {
            return Err(MarketError::InvalidInput(
                "subscription_period must be > 0".to_string(),
            ));
        }
        if self.initial_quality_score > 100 {
            return Err(MarketError::InvalidInput(
                "initial_quality_score must be <= 100".to_string(),
            ));
        }
        if self.referral_reward_percent > 100 || self.bulk_discount_percent > 100 {
            return Err(MarketError::InvalidInput(
                "percentages must be <= 100".to_string(),
            ));
        }
        if self.max_bundle_datasets == 0 {
            return Err(MarketError::InvalidInput(
                "max_bundle_datasets must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            min_stake: 1_000_000,
            subscription_period: 1440,
            initial_quality_score: 50,
            referral_reward_percent: 5,
            bulk_discount_percent: 10,
            bulk_discount_threshold: 3,
            max_bundle_datasets: 10,
            max_name_len: 64,
            max_description_len: 256,
            max_review_len: 500,
            max_category_len: 32,
            max_tags: 5,
        }
    }
}
