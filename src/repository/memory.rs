use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::CoffeeRepository;
use crate::models::{Coffee, NewCoffee};

#[derive(Default)]
struct Table {
    rows: Vec<Coffee>,
    last_id: i64,
}

impl Table {
    fn insert(&mut self, coffee: NewCoffee) -> Coffee {
        self.last_id += 1;
        let coffee = coffee.with_id(self.last_id);
        self.rows.push(coffee.clone());
        coffee
    }
}

/// In-process coffee store
///
/// Rows are kept in insertion order. Ids are never reused, even after a
/// bulk delete.
#[derive(Default)]
pub struct MemoryCoffeeRepository {
    table: RwLock<Table>,
}

impl MemoryCoffeeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CoffeeRepository for MemoryCoffeeRepository {
    async fn create(&self, coffee: NewCoffee) -> Result<Coffee> {
        let coffee = self.table.write().await.insert(coffee);
        tracing::debug!("Inserted coffee with id: {}", coffee.id);
        Ok(coffee)
    }

    async fn create_all(&self, coffees: Vec<NewCoffee>) -> Result<Vec<Coffee>> {
        let mut table = self.table.write().await;
        let created: Vec<Coffee> = coffees.into_iter().map(|c| table.insert(c)).collect();
        tracing::debug!("Inserted {} coffees", created.len());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Coffee>> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Coffee>> {
        let table = self.table.read().await;
        Ok(table.rows.iter().filter(|c| c.name == name).cloned().collect())
    }

    async fn find_all(&self) -> Result<Vec<Coffee>> {
        Ok(self.table.read().await.rows.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|c| c.id != id);
        Ok(table.rows.len() != before)
    }

    async fn delete_all(&self) -> Result<u64> {
        let mut table = self.table.write().await;
        let removed = table.rows.len() as u64;
        table.rows.clear();
        tracing::debug!("Deleted {} coffees", removed);
        Ok(removed)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
