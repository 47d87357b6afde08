use super::parse_id;
use crate::error::{ApiError, ErrorResponse};
use crate::models::Coffee;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, extract::Path, http::StatusCode, Json};

/// GET /rest/coffees/:id handler - Retrieve one coffee
#[utoipa::path(
    get,
    path = routes::COFFEE_ITEM,
    params(
        ("id" = i64, Path, description = "Store-assigned coffee id")
    ),
    responses(
        (status = 200, description = "Coffee found", body = Coffee),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Coffee not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "coffees"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<(StatusCode, Json<Coffee>), ApiError> {
    let id = parse_id(&id_str)?;

    match state.repository.find_by_id(id).await? {
        Some(coffee) => {
            tracing::info!("Successfully retrieved coffee with id: {}", id);
            Ok((StatusCode::OK, Json(coffee)))
        }
        None => {
            tracing::info!("Coffee not found with id: {}", id);
            Err(ApiError::CoffeeNotFound(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{read_json, send, setup_test_app};
    use crate::models::NewCoffee;
    use axum::{body::Body, http::Request};

    fn get_coffee(id: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(format!("{}/{}", routes::COFFEES, id))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_endpoint_success() {
        let (app, repository) = setup_test_app();
        let stored = repository.create(NewCoffee::new("Test-B", 5.99)).await.unwrap();

        let response = send(&app, get_coffee(&stored.id.to_string())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let coffee: Coffee = read_json(response).await;
        assert_eq!(coffee, stored);
        assert_eq!(coffee.name, "Test-B");
        assert_eq!(coffee.price, 5.99);
    }

    #[tokio::test]
    async fn test_get_endpoint_not_found() {
        let (app, _) = setup_test_app();

        let response = send(&app, get_coffee("12345")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ErrorResponse = read_json(response).await;
        assert!(error.error.contains("Coffee not found"));
        assert!(error.error.contains("12345"));
    }

    #[tokio::test]
    async fn test_get_endpoint_invalid_id() {
        let (app, _) = setup_test_app();

        let response = send(&app, get_coffee("not-a-number")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = read_json(response).await;
        assert!(error.error.contains("Invalid coffee id"));
    }
}
