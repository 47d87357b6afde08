pub mod api_doc;
pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod state;

pub use app::build_router;
pub use config::Config;
pub use models::{Coffee, NewCoffee};
pub use repository::CoffeeRepository;
pub use state::AppState;
