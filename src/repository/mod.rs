//! Coffee persistence.
//!
//! Handlers talk to the store only through [`CoffeeRepository`]. Ids are
//! assigned by the store at insertion time and ascend in insertion order, so
//! every listing ordered by id is also ordered by insertion.

pub mod memory;
pub mod spanner;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::models::{Coffee, NewCoffee};

pub use memory::MemoryCoffeeRepository;
pub use spanner::SpannerCoffeeRepository;

#[async_trait]
pub trait CoffeeRepository: Send + Sync {
    /// Insert one coffee in its own transaction and return it with its id.
    async fn create(&self, coffee: NewCoffee) -> Result<Coffee>;

    /// Insert every coffee in a single transaction.
    ///
    /// Returned coffees keep the input order and carry ascending ids.
    async fn create_all(&self, coffees: Vec<NewCoffee>) -> Result<Vec<Coffee>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Coffee>>;

    /// All coffees with exactly this name, oldest first. Empty when none match.
    async fn find_by_name(&self, name: &str) -> Result<Vec<Coffee>>;

    /// All coffees in insertion order.
    async fn find_all(&self) -> Result<Vec<Coffee>>;

    /// Returns `true` if a row was removed.
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Remove every coffee in a single transaction, returning the row count.
    async fn delete_all(&self) -> Result<u64>;

    async fn health_check(&self) -> Result<()>;
}

/// Build the repository selected by the configuration
pub async fn from_config(config: &Config) -> Result<Arc<dyn CoffeeRepository>> {
    match (config.store_backend, &config.spanner) {
        (StoreBackend::Memory, _) => {
            tracing::info!("Using in-memory coffee store");
            Ok(Arc::new(MemoryCoffeeRepository::new()))
        }
        (StoreBackend::Spanner, Some(spanner)) => {
            Ok(Arc::new(SpannerCoffeeRepository::from_config(spanner).await?))
        }
        (StoreBackend::Spanner, None) => {
            anyhow::bail!("Spanner backend selected but no Spanner configuration was loaded")
        }
    }
}
