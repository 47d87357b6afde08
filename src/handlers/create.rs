use crate::error::{ApiError, ErrorResponse};
use crate::models::{Coffee, NewCoffee};
use crate::routes;
use crate::state::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

/// POST /rest/coffees handler - Create a coffee
#[utoipa::path(
    post,
    path = routes::COFFEES,
    request_body = NewCoffee,
    responses(
        (status = 201, description = "Coffee created", body = Coffee),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "coffees"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewCoffee>, JsonRejection>,
) -> Result<(StatusCode, Json<Coffee>), ApiError> {
    let Json(new_coffee) = payload?;

    let coffee = state.repository.create(new_coffee).await?;

    tracing::info!("Created coffee '{}' with id: {}", coffee.name, coffee.id);
    Ok((StatusCode::CREATED, Json(coffee)))
}
