pub mod health;
pub mod create;
pub mod get;
pub mod list;
pub mod delete;

pub use health::health_handler;
pub use create::create_handler;
pub use get::get_handler;
pub use list::list_handler;
pub use delete::delete_handler;

use crate::error::ApiError;

/// Parse the `{id}` path segment
fn parse_id(id_str: &str) -> Result<i64, ApiError> {
    id_str
        .parse::<i64>()
        .map_err(|_| ApiError::InvalidId(id_str.to_string()))
}
