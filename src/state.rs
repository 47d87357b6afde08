use crate::repository::CoffeeRepository;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn CoffeeRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn CoffeeRepository>) -> Self {
        Self { repository }
    }
}
