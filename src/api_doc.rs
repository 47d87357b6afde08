use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{Coffee, NewCoffee};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "cafe-spanner API",
        version = "1.0.0",
        description = "CRUD REST resource for coffees backed by Google Cloud Spanner"
    ),
    paths(
        handlers::health::health_handler,
        handlers::create::create_handler,
        handlers::get::get_handler,
        handlers::list::list_handler,
        handlers::delete::delete_handler
    ),
    components(
        schemas(
            Coffee,
            NewCoffee,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "coffees", description = "Coffee resource operations")
    )
)]
pub struct ApiDoc;
