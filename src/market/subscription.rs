// Subscription Ledger - per-subscriber access windows, renewals, feedback

use crate::account::AccountId;
use crate::ledger::{Clock, Ledger};
use crate::market::engine::percent_of;
use crate::market::tracker::{Rating, Review};
use crate::market::{MarketError, MarketEvent, Marketplace};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// An access window. Overwritten, never deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    expiry: u64,
}

impl Subscription {
    pub fn new(expiry: u64) -> Self {
        Self { expiry }
    }

    pub fn expiry(&self) -> u64 {
        self.expiry
    }

    /// Access check: valid strictly before the expiry height
    pub fn grants_access_at(&self, height: u64) -> bool {
        height < self.expiry
    }

    /// Rating and review check: still allowed at exactly the expiry height.
    /// Deliberately one block looser than `grants_access_at`.
    pub fn allows_feedback_at(&self, height: u64) -> bool {
        height <= self.expiry
    }
}

/// Renewals made by one subscriber on one dataset
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalState {
    pub renewal_count: u64,
}

/// What a renewal charged
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalReceipt {
    /// Count after this renewal
    pub renewal_count: u64,
    pub discount_percent: u64,
    pub price_paid: u64,
}

/// Loyalty discount for a renewal, from the count of earlier renewals
pub fn loyalty_discount_percent(prior_renewals: u64) -> u64 {
    match prior_renewals {
        n if n >= 5 => 15,
        n if n >= 3 => 10,
        n if n >= 1 => 5,
        _ => 0,
    }
}

impl<L: Ledger, C: Clock> Marketplace<L, C> {
    /// Buy an access window on a dataset, paying the provider directly.
    ///
    /// Subscribing again restarts the window from the current height
    /// rather than extending it. Returns the new expiry.
    pub fn subscribe_to_dataset(&mut self, caller: &AccountId, dataset_id: u64) -> Result<u64, MarketError> {
        let dataset = self.active_dataset(dataset_id)?;
        let (provider, price) = (dataset.provider, dataset.price);

        self.pay(price, caller, &provider)?;

        let expiry = self.commit_subscription(dataset_id, caller, price);
        self.events.push(MarketEvent::Subscribed {
            dataset_id,
            subscriber: *caller,
            expiry,
            paid: price,
        });
        info!(dataset_id, subscriber = %caller.short(), expiry, price, "subscribed to dataset");

        Ok(expiry)
    }

    /// State writes of a paid direct subscription
    pub(crate) fn commit_subscription(&mut self, dataset_id: u64, subscriber: &AccountId, paid: u64) -> u64 {
        let expiry = self.window_end();
        self.grant_window(dataset_id, subscriber, expiry);
        self.bump_usage(dataset_id);
        self.state.stats.provider_volume = self.state.stats.provider_volume.saturating_add(paid);
        expiry
    }

    /// Write (or overwrite) a dataset access window
    pub(crate) fn grant_window(&mut self, dataset_id: u64, subscriber: &AccountId, expiry: u64) {
        self.state
            .subscriptions
            .insert((dataset_id, *subscriber), Subscription::new(expiry));
        self.state.stats.subscriptions_granted += 1;
    }

    /// True iff `account` holds a window on the dataset that has not expired
    pub fn has_subscription(&self, dataset_id: u64, account: &AccountId) -> bool {
        let height = self.clock.current_height();
        self.state
            .subscriptions
            .get(&(dataset_id, *account))
            .map(|s| s.grants_access_at(height))
            .unwrap_or(false)
    }

    /// The latest window on record, expired or not
    pub fn get_subscription(&self, dataset_id: u64, account: &AccountId) -> Option<&Subscription> {
        self.state.subscriptions.get(&(dataset_id, *account))
    }

    /// Renew an existing subscription at a loyalty discount.
    ///
    /// The tier comes from the renewal count before this call.
    pub fn renew_subscription(&mut self, caller: &AccountId, dataset_id: u64) -> Result<RenewalReceipt, MarketError> {
        if !self.state.datasets.contains_key(&dataset_id)
            || !self.state.subscriptions.contains_key(&(dataset_id, *caller))
        {
            return Err(MarketError::NotFound);
        }
        let dataset = self.active_dataset(dataset_id)?;
        let (provider, price) = (dataset.provider, dataset.price);

        let prior = self
            .state
            .renewals
            .get(&(dataset_id, *caller))
            .map(|r| r.renewal_count)
            .unwrap_or(0);
        let discount_percent = loyalty_discount_percent(prior);
        let price_paid = percent_of(price, 100 - discount_percent);

        self.pay(price_paid, caller, &provider)?;

        let expiry = self.commit_subscription(dataset_id, caller, price_paid);
        let renewal_count = prior + 1;
        self.state
            .renewals
            .insert((dataset_id, *caller), RenewalState { renewal_count });
        self.state.stats.renewals += 1;

        self.events.push(MarketEvent::Renewed {
            dataset_id,
            subscriber: *caller,
            renewal_count,
            discount_percent,
            paid: price_paid,
        });
        info!(
            dataset_id,
            subscriber = %caller.short(),
            renewal_count,
            discount_percent,
            price_paid,
            expiry,
            "subscription renewed"
        );

        Ok(RenewalReceipt {
            renewal_count,
            discount_percent,
            price_paid,
        })
    }

    pub fn get_renewal_info(&self, dataset_id: u64, account: &AccountId) -> Option<&RenewalState> {
        self.state.renewals.get(&(dataset_id, *account))
    }

    /// Rate a dataset. The dataset's quality score becomes this rating;
    /// there is no averaging across raters.
    pub fn rate_dataset(&mut self, caller: &AccountId, dataset_id: u64, rating: u8) -> Result<(), MarketError> {
        let dataset = self
            .state
            .datasets
            .get(&dataset_id)
            .ok_or(MarketError::NotFound)?;
        let subscription = self
            .state
            .subscriptions
            .get(&(dataset_id, *caller))
            .ok_or(MarketError::Unauthorized)?;
        if !(1..=100).contains(&rating) {
            return Err(MarketError::InvalidRating(rating));
        }
        let height = self.clock.current_height();
        if !subscription.allows_feedback_at(height) {
            return Err(MarketError::Unauthorized);
        }

        let mut updated = dataset.clone();
        updated.quality_score = u64::from(rating);
        self.state.datasets.insert(dataset_id, updated);
        self.state.ratings.insert(
            (dataset_id, *caller),
            Rating {
                rating,
                rated_at: height,
            },
        );

        self.events.push(MarketEvent::Rated {
            dataset_id,
            rater: *caller,
            rating,
        });
        debug!(dataset_id, rater = %caller.short(), rating, "dataset rated");

        Ok(())
    }

    /// Leave a free-text review. Same subscription boundary as rating;
    /// a later review from the same account replaces the earlier one.
    pub fn add_review(&mut self, caller: &AccountId, dataset_id: u64, text: &str) -> Result<(), MarketError> {
        if !self.state.datasets.contains_key(&dataset_id) {
            return Err(MarketError::NotFound);
        }
        let height = self.clock.current_height();
        let allowed = self
            .state
            .subscriptions
            .get(&(dataset_id, *caller))
            .map(|s| s.allows_feedback_at(height))
            .unwrap_or(false);
        if !allowed {
            return Err(MarketError::Unauthorized);
        }
        self.check_len("review", text, self.config.max_review_len)?;

        self.state.reviews.insert(
            (dataset_id, *caller),
            Review {
                text: text.to_string(),
                created_at: height,
            },
        );
        debug!(dataset_id, reviewer = %caller.short(), "review stored");

        Ok(())
    }
}
