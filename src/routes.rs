// Route path constants - single source of truth for all API paths

pub const HEALTH: &str = "/health";
pub const COFFEES: &str = "/rest/coffees";
pub const COFFEE_ITEM: &str = "/rest/coffees/{id}";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";
