// Bundle Manager - multi-dataset bundles and bulk purchases, built on the
// registry and the subscription ledger

use crate::account::AccountId;
use crate::ledger::{Clock, Ledger};
use crate::market::engine::percent_of;
use crate::market::subscription::Subscription;
use crate::market::{MarketError, MarketEvent, Marketplace};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A provider's set of datasets sold together at one flat price
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    pub(crate) id: u64,
    pub(crate) provider: AccountId,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) dataset_ids: Vec<u64>,
    pub(crate) price: u64,
    pub(crate) active: bool,
}

impl Bundle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn provider(&self) -> &AccountId {
        &self.provider
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Member datasets in creation order; may repeat an id
    pub fn dataset_ids(&self) -> &[u64] {
        &self.dataset_ids
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Outcome of a bulk purchase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BulkReceipt {
    pub total_price: u64,
    pub discount_percent: u64,
    pub price_paid: u64,
    pub expiry: u64,
}

impl<L: Ledger, C: Clock> Marketplace<L, C> {
    /// Create a bundle over datasets the caller provides.
    ///
    /// Checks stop at the first missing (`NotFound`) or foreign
    /// (`Unauthorized`) dataset.
    pub fn create_dataset_bundle(
        &mut self,
        caller: &AccountId,
        name: &str,
        description: &str,
        dataset_ids: &[u64],
        price: u64,
    ) -> Result<u64, MarketError> {
        self.check_list_len(dataset_ids.len())?;
        self.check_len("name", name, self.config.max_name_len)?;
        self.check_len("description", description, self.config.max_description_len)?;

        for dataset_id in dataset_ids {
            let dataset = self
                .state
                .datasets
                .get(dataset_id)
                .ok_or(MarketError::NotFound)?;
            if dataset.provider != *caller {
                return Err(MarketError::Unauthorized);
            }
        }

        let bundle_id = self.state.next_bundle_id.advance();
        self.state.bundles.insert(
            bundle_id,
            Bundle {
                id: bundle_id,
                provider: *caller,
                name: name.to_string(),
                description: description.to_string(),
                dataset_ids: dataset_ids.to_vec(),
                price,
                active: true,
            },
        );

        self.state.stats.bundles_created += 1;
        self.events.push(MarketEvent::BundleCreated {
            bundle_id,
            provider: *caller,
            datasets: dataset_ids.len(),
        });
        info!(bundle_id, provider = %caller.short(), datasets = dataset_ids.len(), price, "bundle created");

        Ok(bundle_id)
    }

    pub fn get_bundle(&self, bundle_id: u64) -> Option<&Bundle> {
        self.state.bundles.get(&bundle_id)
    }

    /// Buy a bundle at its flat price.
    ///
    /// Grants the bundle window plus a window on every member dataset with
    /// the same expiry, and counts one use per member entry. Member prices
    /// are not charged.
    pub fn subscribe_to_bundle(&mut self, caller: &AccountId, bundle_id: u64) -> Result<u64, MarketError> {
        let bundle = match self.state.bundles.get(&bundle_id) {
            Some(bundle) if bundle.active => bundle,
            _ => return Err(MarketError::NotFound),
        };
        let (provider, price, members) = (bundle.provider, bundle.price, bundle.dataset_ids.clone());

        self.pay(price, caller, &provider)?;

        let expiry = self.window_end();
        self.state
            .bundle_subscriptions
            .insert((bundle_id, *caller), Subscription::new(expiry));
        for dataset_id in &members {
            self.grant_window(*dataset_id, caller, expiry);
            self.bump_usage(*dataset_id);
        }
        self.state.stats.provider_volume = self.state.stats.provider_volume.saturating_add(price);

        self.events.push(MarketEvent::BundleSubscribed {
            bundle_id,
            subscriber: *caller,
            expiry,
            paid: price,
        });
        info!(bundle_id, subscriber = %caller.short(), members = members.len(), expiry, price, "subscribed to bundle");

        Ok(expiry)
    }

    /// Same strict boundary as `has_subscription`
    pub fn has_bundle_subscription(&self, bundle_id: u64, account: &AccountId) -> bool {
        let height = self.clock.current_height();
        self.state
            .bundle_subscriptions
            .get(&(bundle_id, *account))
            .map(|s| s.grants_access_at(height))
            .unwrap_or(false)
    }

    pub fn get_bundle_subscription(&self, bundle_id: u64, account: &AccountId) -> Option<&Subscription> {
        self.state.bundle_subscriptions.get(&(bundle_id, *account))
    }

    /// Buy windows on several datasets in one payment.
    ///
    /// Sums the current prices, takes the bulk discount at or above the
    /// threshold, and pays the total into custody rather than to the
    /// providers. Every listed id must name an active dataset.
    pub fn bulk_subscribe(&mut self, caller: &AccountId, dataset_ids: &[u64]) -> Result<BulkReceipt, MarketError> {
        if dataset_ids.is_empty() {
            return Err(MarketError::InvalidInput("no datasets listed".to_string()));
        }
        self.check_list_len(dataset_ids.len())?;

        let mut total_price = 0u64;
        for dataset_id in dataset_ids {
            let price = self.active_dataset(*dataset_id)?.price;
            total_price = total_price
                .checked_add(price)
                .ok_or_else(|| MarketError::InvalidInput("bulk price overflows".to_string()))?;
        }

        let discount_percent = if dataset_ids.len() >= self.config.bulk_discount_threshold {
            self.config.bulk_discount_percent
        } else {
            0
        };
        let price_paid = percent_of(total_price, 100 - discount_percent);

        let custody = self.custody;
        self.pay(price_paid, caller, &custody)?;

        let expiry = self.window_end();
        for dataset_id in dataset_ids {
            self.grant_window(*dataset_id, caller, expiry);
        }
        self.state.stats.custody_volume = self.state.stats.custody_volume.saturating_add(price_paid);

        self.events.push(MarketEvent::BulkSubscribed {
            subscriber: *caller,
            datasets: dataset_ids.len(),
            paid: price_paid,
        });
        info!(
            subscriber = %caller.short(),
            datasets = dataset_ids.len(),
            total_price,
            discount_percent,
            price_paid,
            "bulk subscription"
        );

        Ok(BulkReceipt {
            total_price,
            discount_percent,
            price_paid,
            expiry,
        })
    }
}
