use crate::error::{ApiError, ErrorResponse};
use crate::models::Coffee;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// GET /rest/coffees handler - List every coffee in insertion order
#[utoipa::path(
    get,
    path = routes::COFFEES,
    responses(
        (status = 200, description = "All coffees, oldest first", body = Vec<Coffee>),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "coffees"
)]
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<Coffee>>), ApiError> {
    let coffees = state.repository.find_all().await?;

    tracing::info!("Listed {} coffees", coffees.len());
    Ok((StatusCode::OK, Json(coffees)))
}
