// Market module - THE CORE
// Dataset lifecycle, stake custody, subscriptions, bundles and referrals

mod bundle;
mod config;
mod engine;
mod error;
mod events;
mod referral;
mod registry;
mod state;
mod subscription;
mod tracker;

pub use bundle::{Bundle, BulkReceipt};
pub use config::MarketConfig;
pub use engine::Marketplace;
pub use error::MarketError;
pub use events::MarketEvent;
pub use referral::{ReferralAccrual, ReferralReceipt};
pub use registry::Dataset;
pub use state::{MarketState, MarketStats, Sequence};
pub use subscription::{loyalty_discount_percent, RenewalReceipt, RenewalState, Subscription};
pub use tracker::{Analytics, Category, DatasetUpdate, Featured, Rating, Review, Usage, Version};
