// Referral Ledger - rewards accrued by accounts that bring in subscribers

use crate::account::AccountId;
use crate::ledger::{Clock, Ledger, Transfer};
use crate::market::engine::percent_of;
use crate::market::{MarketError, MarketEvent, Marketplace};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Lifetime rewards paid to one referrer. Only ever grows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralAccrual {
    pub total_rewards: u64,
    pub referrals: u64,
}

/// Outcome of a referred subscription
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferralReceipt {
    pub expiry: u64,
    pub reward: u64,
}

impl<L: Ledger, C: Clock> Marketplace<L, C> {
    /// Subscribe to a dataset on a referrer's behalf.
    ///
    /// The subscriber pays the provider and custody pays the referrer a
    /// share of the price. Both legs go through the ledger as one batch, so
    /// either both land or neither does. A subscriber may name themselves as
    /// referrer and collects the reward like anyone else.
    pub fn subscribe_with_referral(
        &mut self,
        caller: &AccountId,
        dataset_id: u64,
        referrer: &AccountId,
    ) -> Result<ReferralReceipt, MarketError> {
        let dataset = self.active_dataset(dataset_id)?;
        let (provider, price) = (dataset.provider, dataset.price);

        let reward = percent_of(price, self.config.referral_reward_percent);
        let custody = self.custody;
        self.pay_all(vec![
            Transfer::new(price, *caller, provider),
            Transfer::new(reward, custody, *referrer),
        ])?;

        let expiry = self.commit_subscription(dataset_id, caller, price);
        let accrual = self.state.referrals.entry(*referrer).or_default();
        accrual.total_rewards = accrual.total_rewards.saturating_add(reward);
        accrual.referrals += 1;
        self.state.stats.referral_payouts = self.state.stats.referral_payouts.saturating_add(reward);

        self.events.push(MarketEvent::Subscribed {
            dataset_id,
            subscriber: *caller,
            expiry,
            paid: price,
        });
        self.events.push(MarketEvent::ReferralRewarded {
            dataset_id,
            referrer: *referrer,
            reward,
        });
        info!(
            dataset_id,
            subscriber = %caller.short(),
            referrer = %referrer.short(),
            reward,
            "referred subscription"
        );

        Ok(ReferralReceipt { expiry, reward })
    }

    /// Total rewards paid to `referrer` so far (0 if never referred)
    pub fn get_referral_rewards(&self, referrer: &AccountId) -> u64 {
        self.state
            .referrals
            .get(referrer)
            .map(|a| a.total_rewards)
            .unwrap_or(0)
    }

    pub fn get_referral_accrual(&self, referrer: &AccountId) -> Option<&ReferralAccrual> {
        self.state.referrals.get(referrer)
    }
}
