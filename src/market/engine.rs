// Marketplace - owns the state maps and the ledger/clock seams
//
// Operations live next to the component they belong to (registry,
// subscription, tracker, bundle, referral). Each one validates every
// precondition, performs its value movement, and only then writes state.

use crate::account::AccountId;
use crate::ledger::{Clock, Ledger, Transfer};
use crate::market::registry::Dataset;
use crate::market::state::{MarketState, MarketStats};
use crate::market::{MarketConfig, MarketError, MarketEvent};
use tracing::{debug, warn};

/// The marketplace engine
pub struct Marketplace<L: Ledger, C: Clock> {
    pub(crate) config: MarketConfig,
    /// Holding account for stakes and bulk payments
    pub(crate) custody: AccountId,
    /// Platform owner; gates featuring
    pub(crate) owner: AccountId,
    pub(crate) ledger: L,
    pub(crate) clock: C,
    pub(crate) state: MarketState,
    pub(crate) events: Vec<MarketEvent>,
}

impl<L: Ledger, C: Clock> Marketplace<L, C> {
    /// Create a marketplace with an empty state
    pub fn new(
        config: MarketConfig,
        custody: AccountId,
        owner: AccountId,
        ledger: L,
        clock: C,
    ) -> Result<Self, MarketError> {
        config.validate()?;
        Ok(Self {
            config,
            custody,
            owner,
            ledger,
            clock,
            state: MarketState::new(),
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    pub fn custody_account(&self) -> &AccountId {
        &self.custody
    }

    pub fn owner_account(&self) -> &AccountId {
        &self.owner
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Mutable access for hosts that fund accounts through the same ledger
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn current_height(&self) -> u64 {
        self.clock.current_height()
    }

    /// Id the next registered dataset will get
    pub fn next_dataset_id(&self) -> u64 {
        self.state.next_dataset_id.peek()
    }

    /// Id the next created bundle will get
    pub fn next_bundle_id(&self) -> u64 {
        self.state.next_bundle_id.peek()
    }

    pub fn stats(&self) -> &MarketStats {
        &self.state.stats
    }

    /// Poll for events (clears the event queue)
    pub fn poll_events(&mut self) -> Vec<MarketEvent> {
        std::mem::take(&mut self.events)
    }

    // ========================================================================
    // STATE EXPORT/IMPORT
    // ========================================================================

    /// Export the full marketplace state for persistence
    pub fn export_state(&self) -> MarketState {
        self.state.clone()
    }

    /// Replace the marketplace state with a snapshot
    pub fn import_state(&mut self, state: MarketState) {
        debug!(
            datasets = state.dataset_count(),
            bundles = state.bundle_count(),
            "importing market state"
        );
        self.state = state;
        self.events.clear();
    }

    // ========================================================================
    // SHARED HELPERS
    // ========================================================================

    /// Dataset that exists and is still active
    pub(crate) fn active_dataset(&self, dataset_id: u64) -> Result<&Dataset, MarketError> {
        match self.state.datasets.get(&dataset_id) {
            Some(dataset) if dataset.is_active() => Ok(dataset),
            _ => Err(MarketError::NotFound),
        }
    }

    /// Expiry of a window granted now
    pub(crate) fn window_end(&self) -> u64 {
        self.clock
            .current_height()
            .saturating_add(self.config.subscription_period)
    }

    /// Move value through the ledger. Zero amounts move nothing.
    pub(crate) fn pay(&mut self, amount: u64, from: &AccountId, to: &AccountId) -> Result<(), MarketError> {
        if amount == 0 {
            return Ok(());
        }
        self.ledger.transfer(amount, from, to).map_err(|e| {
            warn!(amount, from = %from.short(), to = %to.short(), error = %e, "transfer failed");
            MarketError::TransferFailed(e)
        })
    }

    /// Move several legs as one unit. Zero-amount legs are dropped.
    pub(crate) fn pay_all(&mut self, legs: Vec<Transfer>) -> Result<(), MarketError> {
        let legs: Vec<Transfer> = legs.into_iter().filter(|leg| leg.amount > 0).collect();
        if legs.is_empty() {
            return Ok(());
        }
        self.ledger.transfer_batch(&legs).map_err(|e| {
            warn!(legs = legs.len(), error = %e, "batched transfer failed");
            MarketError::TransferFailed(e)
        })
    }

    pub(crate) fn check_len(&self, field: &str, value: &str, max: usize) -> Result<(), MarketError> {
        let len = value.chars().count();
        if len > max {
            return Err(MarketError::InvalidInput(format!(
                "{} is {} characters, limit is {}",
                field, len, max
            )));
        }
        Ok(())
    }

    pub(crate) fn check_list_len(&self, len: usize) -> Result<(), MarketError> {
        if len > self.config.max_bundle_datasets {
            return Err(MarketError::InvalidInput(format!(
                "{} datasets listed, limit is {}",
                len, self.config.max_bundle_datasets
            )));
        }
        Ok(())
    }
}

/// `amount * percent / 100`, truncating
pub(crate) fn percent_of(amount: u64, percent: u64) -> u64 {
    ((u128::from(amount) * u128::from(percent)) / 100) as u64
}
