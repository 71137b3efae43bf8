// Dataset Registry - dataset records, stake custody, activation state

use crate::account::AccountId;
use crate::ledger::{Clock, Ledger};
use crate::market::{MarketError, MarketEvent, Marketplace};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A priced dataset listed behind a refundable stake.
///
/// Records are never removed; deactivation only flips `active`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub(crate) id: u64,
    pub(crate) provider: AccountId,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) price: u64,
    pub(crate) stake: u64,
    pub(crate) quality_score: u64,
    pub(crate) active: bool,
}

impl Dataset {
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

    /// Price of one access window, in minor units
    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn stake(&self) -> u64 {
        self.stake
    }

    /// Most recent rating, or the initial score if never rated
    pub fn quality_score(&self) -> u64 {
        self.quality_score
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl<L: Ledger, C: Clock> Marketplace<L, C> {
    /// Register a dataset, locking `stake` in custody.
    ///
    /// The stake moves before the record is written; a failed transfer
    /// leaves no record and consumes no id.
    pub fn register_dataset(
        &mut self,
        caller: &AccountId,
        name: &str,
        description: &str,
        price: u64,
        stake: u64,
    ) -> Result<u64, MarketError> {
        if stake < self.config.min_stake {
            return Err(MarketError::InsufficientStake {
                stake,
                minimum: self.config.min_stake,
            });
        }
        self.check_len("name", name, self.config.max_name_len)?;
        self.check_len("description", description, self.config.max_description_len)?;

        let custody = self.custody;
        self.pay(stake, caller, &custody)?;

        let dataset_id = self.state.next_dataset_id.advance();
        self.state.datasets.insert(
            dataset_id,
            Dataset {
                id: dataset_id,
                provider: *caller,
                name: name.to_string(),
                description: description.to_string(),
                price,
                stake,
                quality_score: self.config.initial_quality_score,
                active: true,
            },
        );

        self.state.stats.datasets_registered += 1;
        self.state.stats.stake_in_custody = self.state.stats.stake_in_custody.saturating_add(stake);
        self.events.push(MarketEvent::DatasetRegistered {
            dataset_id,
            provider: *caller,
            stake,
        });
        info!(dataset_id, provider = %caller.short(), price, stake, "dataset registered");

        Ok(dataset_id)
    }

    /// Deactivate a dataset and return its full stake to the provider.
    ///
    /// A second call fails with `NotFound`: the stake is refunded once.
    pub fn deactivate_dataset(&mut self, caller: &AccountId, dataset_id: u64) -> Result<(), MarketError> {
        let dataset = self
            .state
            .datasets
            .get(&dataset_id)
            .ok_or(MarketError::NotFound)?;
        if dataset.provider != *caller {
            return Err(MarketError::Unauthorized);
        }
        if !dataset.active {
            return Err(MarketError::NotFound);
        }

        let mut updated = dataset.clone();
        let custody = self.custody;
        self.pay(updated.stake, &custody, caller)?;

        updated.active = false;
        let refunded = updated.stake;
        self.state.datasets.insert(dataset_id, updated);

        self.state.stats.datasets_deactivated += 1;
        self.state.stats.stake_in_custody = self.state.stats.stake_in_custody.saturating_sub(refunded);
        self.events.push(MarketEvent::DatasetDeactivated { dataset_id, refunded });
        info!(dataset_id, refunded, "dataset deactivated");

        Ok(())
    }

    /// Look up a dataset, active or not
    pub fn get_dataset(&self, dataset_id: u64) -> Option<&Dataset> {
        self.state.datasets.get(&dataset_id)
    }

    /// All datasets listed by a provider, ordered by id
    pub fn datasets_by_provider(&self, provider: &AccountId) -> Vec<&Dataset> {
        let mut datasets: Vec<&Dataset> = self
            .state
            .datasets
            .values()
            .filter(|d| d.provider == *provider)
            .collect();
        datasets.sort_by_key(|d| d.id);
        datasets
    }

    /// Active datasets, ordered by id
    pub fn active_datasets(&self) -> Vec<&Dataset> {
        let mut datasets: Vec<&Dataset> = self.state.datasets.values().filter(|d| d.active).collect();
        datasets.sort_by_key(|d| d.id);
        datasets
    }
}
