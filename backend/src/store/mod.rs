//! Item storage.
//!
//! Handlers talk to an [`ItemStore`]; which adapter backs it is decided once
//! at boot. Every write carries an existence precondition, and a failed
//! precondition comes back as [`StoreError::ConditionFailed`] so callers can
//! tell it apart from infrastructure failures.

mod memory;
mod postgres;

pub use memory::MemoryItemStore;
pub use postgres::PgItemStore;

use axum::async_trait;
use chrono::{DateTime, Utc};
use shared::Item;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The existence precondition of a conditional write did not hold.
    #[error("condition check failed for item {id}")]
    ConditionFailed { id: String },

    #[error("storage error: {operation} failed: {source}")]
    Backend {
        operation: &'static str,
        #[source]
        source: BoxError,
    },
}

impl StoreError {
    pub fn condition_failed(id: impl Into<String>) -> Self {
        Self::ConditionFailed { id: id.into() }
    }

    pub fn backend(operation: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Backend {
            operation,
            source: source.into(),
        }
    }
}

/// Partial update of an item.
///
/// `updated_at` is a constructor argument, so every patch refreshes the
/// timestamp whether or not any other field changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ItemPatch {
    pub fn new(updated_at: DateTime<Utc>) -> Self {
        Self {
            name: None,
            description: None,
            updated_at,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// True when the patch changes something besides the timestamp.
    pub fn has_field_changes(&self) -> bool {
        self.name.is_some() || self.description.is_some()
    }

    /// Apply to an in-memory item. `updated_at` never drops below `created_at`.
    pub fn apply(&self, item: &mut Item) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(description) = &self.description {
            item.description = Some(description.clone());
        }
        item.updated_at = self.updated_at.max(item.created_at);
    }
}

#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Insert `item` unless an item with the same id already exists.
    async fn put_new(&self, item: &Item) -> Result<(), StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Item>, StoreError>;

    /// Every stored item, in the store's natural order.
    async fn scan(&self) -> Result<Vec<Item>, StoreError>;

    /// Apply `patch` if the item exists and return the full updated item.
    async fn update_existing(&self, id: &str, patch: &ItemPatch) -> Result<Item, StoreError>;

    /// Remove the item if it exists.
    async fn delete_existing(&self, id: &str) -> Result<(), StoreError>;
}
