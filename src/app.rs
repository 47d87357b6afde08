use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers::{create_handler, delete_handler, get_handler, health_handler, list_handler};
use crate::routes;
use crate::state::AppState;

/// Build the full application router: coffee resource, health check and API docs
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(routes::HEALTH, get(health_handler))
        .route(routes::COFFEES, get(list_handler).post(create_handler))
        .route(routes::COFFEE_ITEM, get(get_handler).delete(delete_handler))
        .merge(SwaggerUi::new(routes::SWAGGER_UI).url(routes::OPENAPI_JSON, ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{read_json, send, setup_test_app};
    use crate::routes;
    use axum::{body::Body, http::Request, http::StatusCode};

    #[tokio::test]
    async fn test_openapi_document_lists_coffee_paths() {
        let (app, _) = setup_test_app();

        let request = Request::builder()
            .uri(routes::OPENAPI_JSON)
            .body(Body::empty())
            .unwrap();
        let response = send(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let doc: serde_json::Value = read_json(response).await;
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.contains_key(routes::COFFEES));
        assert!(paths.contains_key(routes::COFFEE_ITEM));
        assert!(paths.contains_key(routes::HEALTH));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (app, _) = setup_test_app();

        let request = Request::builder()
            .uri("/rest/teas")
            .body(Body::empty())
            .unwrap();

        assert_eq!(send(&app, request).await.status(), StatusCode::NOT_FOUND);
    }
}
