// Rating & Usage Tracker - quality feedback, usage counters, analytics and
// the metadata writers (category, featuring, versioned updates)

use crate::account::AccountId;
use crate::ledger::{Clock, Ledger};
use crate::market::{MarketError, MarketEvent, Marketplace};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One rater's latest rating of a dataset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub rating: u8,
    pub rated_at: u64,
}

/// One reviewer's latest review of a dataset
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub text: String,
    pub created_at: u64,
}

/// Paid accesses granted on a dataset
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub access_count: u64,
}

/// View counters and revenue estimate fed by `record_dataset_access`.
///
/// The daily and weekly counters never reset by themselves; rolling them
/// over is up to the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analytics {
    pub daily_views: u64,
    pub weekly_views: u64,
    pub monthly_revenue: u64,
    pub last_accessed: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category: String,
    pub tags: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Featured {
    pub featured: bool,
    pub set_at: u64,
}

/// Immutable change-log entry. Version ids come from one counter shared by
/// every dataset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub version_id: u64,
    pub dataset_id: u64,
    pub updated_by: AccountId,
    pub updated_at: u64,
    pub notes: String,
    pub price: u64,
}

/// Fields a provider may change on a listed dataset
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DatasetUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub notes: String,
}

impl DatasetUpdate {
    pub fn new(notes: &str) -> Self {
        Self {
            notes: notes.to_string(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_price(mut self, price: u64) -> Self {
        self.price = Some(price);
        self
    }
}

impl<L: Ledger, C: Clock> Marketplace<L, C> {
    // ========================================================================
    // USAGE & FEEDBACK QUERIES
    // ========================================================================

    pub(crate) fn bump_usage(&mut self, dataset_id: u64) {
        self.state.usage.entry(dataset_id).or_default().access_count += 1;
    }

    pub fn get_dataset_usage(&self, dataset_id: u64) -> Option<&Usage> {
        self.state.usage.get(&dataset_id)
    }

    pub fn get_rating(&self, dataset_id: u64, rater: &AccountId) -> Option<&Rating> {
        self.state.ratings.get(&(dataset_id, *rater))
    }

    pub fn get_review(&self, dataset_id: u64, reviewer: &AccountId) -> Option<&Review> {
        self.state.reviews.get(&(dataset_id, *reviewer))
    }

    // ========================================================================
    // ANALYTICS
    // ========================================================================

    /// Count a view and accrue the dataset price as revenue
    pub fn record_dataset_access(&mut self, dataset_id: u64) -> Result<(), MarketError> {
        let price = self
            .state
            .datasets
            .get(&dataset_id)
            .map(|d| d.price)
            .ok_or(MarketError::NotFound)?;
        let height = self.clock.current_height();

        let analytics = self.state.analytics.entry(dataset_id).or_default();
        analytics.daily_views += 1;
        analytics.weekly_views += 1;
        analytics.monthly_revenue = analytics.monthly_revenue.saturating_add(price);
        analytics.last_accessed = height;

        debug!(dataset_id, height, "dataset access recorded");
        Ok(())
    }

    pub fn get_analytics(&self, dataset_id: u64) -> Option<&Analytics> {
        self.state.analytics.get(&dataset_id)
    }

    // ========================================================================
    // METADATA WRITERS
    // ========================================================================

    /// Feature or unfeature a dataset. Only the platform owner may call this.
    pub fn set_featured_dataset(&mut self, caller: &AccountId, dataset_id: u64, featured: bool) -> Result<(), MarketError> {
        if *caller != self.owner {
            return Err(MarketError::Unauthorized);
        }
        if !self.state.datasets.contains_key(&dataset_id) {
            return Err(MarketError::NotFound);
        }

        let set_at = self.clock.current_height();
        self.state.featured.insert(dataset_id, Featured { featured, set_at });
        debug!(dataset_id, featured, "featured flag set");
        Ok(())
    }

    pub fn is_featured(&self, dataset_id: u64) -> bool {
        self.state
            .featured
            .get(&dataset_id)
            .map(|f| f.featured)
            .unwrap_or(false)
    }

    /// Featured datasets, ordered by id
    pub fn featured_datasets(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self
            .state
            .featured
            .iter()
            .filter(|(_, f)| f.featured)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Categorise a dataset. Provider only.
    pub fn set_dataset_category(
        &mut self,
        caller: &AccountId,
        dataset_id: u64,
        category: &str,
        tags: &[&str],
    ) -> Result<(), MarketError> {
        let dataset = self
            .state
            .datasets
            .get(&dataset_id)
            .ok_or(MarketError::NotFound)?;
        if dataset.provider != *caller {
            return Err(MarketError::Unauthorized);
        }
        self.check_len("category", category, self.config.max_category_len)?;
        if tags.len() > self.config.max_tags {
            return Err(MarketError::InvalidInput(format!(
                "{} tags given, limit is {}",
                tags.len(),
                self.config.max_tags
            )));
        }
        for tag in tags {
            self.check_len("tag", tag, self.config.max_category_len)?;
        }

        self.state.categories.insert(
            dataset_id,
            Category {
                category: category.to_string(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
            },
        );
        debug!(dataset_id, category, "category set");
        Ok(())
    }

    pub fn get_category(&self, dataset_id: u64) -> Option<&Category> {
        self.state.categories.get(&dataset_id)
    }

    /// Datasets filed under `category`, ordered by id
    pub fn datasets_in_category(&self, category: &str) -> Vec<u64> {
        let mut ids: Vec<u64> = self
            .state
            .categories
            .iter()
            .filter(|(_, c)| c.category == category)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Rewrite a dataset's listing fields and append a version record.
    /// Provider only. Returns the version id.
    pub fn update_dataset(
        &mut self,
        caller: &AccountId,
        dataset_id: u64,
        update: DatasetUpdate,
    ) -> Result<u64, MarketError> {
        let dataset = self
            .state
            .datasets
            .get(&dataset_id)
            .ok_or(MarketError::NotFound)?;
        if dataset.provider != *caller {
            return Err(MarketError::Unauthorized);
        }
        if let Some(name) = &update.name {
            self.check_len("name", name, self.config.max_name_len)?;
        }
        if let Some(description) = &update.description {
            self.check_len("description", description, self.config.max_description_len)?;
        }
        self.check_len("notes", &update.notes, self.config.max_description_len)?;

        let mut updated = dataset.clone();
        if let Some(name) = update.name {
            updated.name = name;
        }
        if let Some(description) = update.description {
            updated.description = description;
        }
        if let Some(price) = update.price {
            updated.price = price;
        }

        let height = self.clock.current_height();
        let version_id = self.state.version_counter.advance();
        self.state.versions.insert(
            version_id,
            Version {
                version_id,
                dataset_id,
                updated_by: *caller,
                updated_at: height,
                notes: update.notes,
                price: updated.price,
            },
        );
        self.state.datasets.insert(dataset_id, updated);

        self.events.push(MarketEvent::DatasetUpdated { dataset_id, version_id });
        info!(dataset_id, version_id, "dataset updated");

        Ok(version_id)
    }

    pub fn get_version(&self, version_id: u64) -> Option<&Version> {
        self.state.versions.get(&version_id)
    }

    /// Change log of one dataset, oldest first
    pub fn dataset_versions(&self, dataset_id: u64) -> Vec<&Version> {
        let mut versions: Vec<&Version> = self
            .state
            .versions
            .values()
            .filter(|v| v.dataset_id == dataset_id)
            .collect();
        versions.sort_by_key(|v| v.version_id);
        versions
    }
}
