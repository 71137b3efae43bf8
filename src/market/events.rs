// Market events - committed state changes, drained by the host

use crate::account::AccountId;
use serde::{Deserialize, Serialize};

/// Events emitted after an operation commits. Failed calls emit nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketEvent {
    DatasetRegistered {
        dataset_id: u64,
        provider: AccountId,
        stake: u64,
    },
    DatasetDeactivated {
        dataset_id: u64,
        refunded: u64,
    },
    DatasetUpdated {
        dataset_id: u64,
        version_id: u64,
    },
    Subscribed {
        dataset_id: u64,
        subscriber: AccountId,
        expiry: u64,
        paid: u64,
    },
    Renewed {
        dataset_id: u64,
        subscriber: AccountId,
        renewal_count: u64,
        discount_percent: u64,
        paid: u64,
    },
    Rated {
        dataset_id: u64,
        rater: AccountId,
        rating: u8,
    },
    BundleCreated {
        bundle_id: u64,
        provider: AccountId,
        datasets: usize,
    },
    BundleSubscribed {
        bundle_id: u64,
        subscriber: AccountId,
        expiry: u64,
        paid: u64,
    },
    BulkSubscribed {
        subscriber: AccountId,
        datasets: usize,
        paid: u64,
    },
    ReferralRewarded {
        dataset_id: u64,
        referrer: AccountId,
        reward: u64,
    },
}
