use crate::error::{HealthResponse, UnhealthyResponse};
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// GET /health handler - Health check endpoint
///
/// Asks the coffee store for a trivial round trip. Returns 200 OK if the
/// store answers, 503 Service Unavailable otherwise.
#[utoipa::path(
    get,
    path = routes::HEALTH,
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = UnhealthyResponse)
    ),
    tag = "health"
)]
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<HealthResponse>), (StatusCode, Json<UnhealthyResponse>)> {
    match state.repository.health_check().await {
        Ok(_) => {
            tracing::debug!("Health check passed");
            Ok((
                StatusCode::OK,
                Json(HealthResponse {
                    status: "healthy".to_string(),
                }),
            ))
        }
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(UnhealthyResponse {
                    status: "unhealthy".to_string(),
                    error: format!("Cannot connect to database: {}", e),
                }),
            ))
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::handlers::test_support::{read_json, send, setup_test_app};
    use crate::models::{Coffee, NewCoffee};
    use crate::repository::CoffeeRepository;
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use axum::{body::Body, http::Request, routing::get, Router};
    use std::sync::Arc;

    /// Store whose every call fails, as if the database were unreachable
    pub(crate) struct UnreachableRepository;

    #[async_trait]
    impl CoffeeRepository for UnreachableRepository {
        async fn create(&self, _: NewCoffee) -> Result<Coffee> {
            bail!("connection refused")
        }
        async fn create_all(&self, _: Vec<NewCoffee>) -> Result<Vec<Coffee>> {
            bail!("connection refused")
        }
        async fn find_by_id(&self, _: i64) -> Result<Option<Coffee>> {
            bail!("connection refused")
        }
        async fn find_by_name(&self, _: &str) -> Result<Vec<Coffee>> {
            bail!("connection refused")
        }
        async fn find_all(&self) -> Result<Vec<Coffee>> {
            bail!("connection refused")
        }
        async fn delete(&self, _: i64) -> Result<bool> {
            bail!("connection refused")
        }
        async fn delete_all(&self) -> Result<u64> {
            bail!("connection refused")
        }
        async fn health_check(&self) -> Result<()> {
            bail!("connection refused")
        }
    }

    fn health_request() -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(routes::HEALTH)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint_healthy() {
        let (app, _) = setup_test_app();

        let response = send(&app, health_request()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let response_json: HealthResponse = read_json(response).await;
        assert_eq!(response_json.status, "healthy");
    }

    #[tokio::test]
    async fn test_health_endpoint_unhealthy() {
        let state = AppState::new(Arc::new(UnreachableRepository));
        let app = Router::new()
            .route(routes::HEALTH, get(health_handler))
            .with_state(state);

        let response = send(&app, health_request()).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let response_json: UnhealthyResponse = read_json(response).await;
        assert_eq!(response_json.status, "unhealthy");
        assert!(response_json.error.contains("connection refused"));
    }
}
