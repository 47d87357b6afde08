use super::parse_id;
use crate::error::{ApiError, ErrorResponse};
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, extract::Path, http::StatusCode};

/// DELETE /rest/coffees/:id handler - Remove a coffee
///
/// Deleting an id that does not exist still answers 204.
#[utoipa::path(
    delete,
    path = routes::COFFEE_ITEM,
    params(
        ("id" = i64, Path, description = "Store-assigned coffee id")
    ),
    responses(
        (status = 204, description = "Coffee removed, or was already absent"),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "coffees"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id_str)?;

    if state.repository.delete(id).await? {
        tracing::info!("Deleted coffee with id: {}", id);
    } else {
        tracing::info!("Delete requested for absent coffee id: {}", id);
    }

    Ok(StatusCode::NO_CONTENT)
}
