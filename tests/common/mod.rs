//! Test harness: runs the service on an ephemeral port and gives tests both
//! an HTTP client and direct access to the store behind it.

#![allow(dead_code)]

use cafe_spanner::config::SpannerConfig;
use cafe_spanner::repository::{MemoryCoffeeRepository, SpannerCoffeeRepository};
use cafe_spanner::{build_router, AppState, CoffeeRepository};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use uuid::Uuid;

pub struct TestHarness {
    addr: SocketAddr,
    client: reqwest::Client,
    server: JoinHandle<()>,
    /// The store the running service writes to
    pub repository: Arc<dyn CoffeeRepository>,
}

impl TestHarness {
    /// Serve the application over `repository` on 127.0.0.1 with an OS-assigned port.
    pub async fn deploy(repository: Arc<dyn CoffeeRepository>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no local address");

        let app = build_router(AppState::new(repository.clone()));
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self {
            addr,
            client: reqwest::Client::new(),
            server,
            repository,
        }
    }

    pub async fn memory() -> Self {
        Self::deploy(Arc::new(MemoryCoffeeRepository::new())).await
    }

    /// Deploy against a fresh emulator database, or `None` when
    /// `SPANNER_EMULATOR_HOST` is not set.
    pub async fn spanner() -> Option<Self> {
        let emulator_host = std::env::var("SPANNER_EMULATOR_HOST").ok()?;

        let config = SpannerConfig {
            emulator_host: Some(emulator_host),
            project: "test-project".to_string(),
            instance: "cafe-it-instance".to_string(),
            database: format!("cafe-it-{}", &Uuid::new_v4().simple().to_string()[..12]),
        };

        let repository = SpannerCoffeeRepository::from_config(&config)
            .await
            .expect("Failed to provision Spanner emulator database");

        Some(Self::deploy(Arc::new(repository)).await)
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Empty the store in one transaction and stop the server.
    pub async fn teardown(self) {
        self.repository
            .delete_all()
            .await
            .expect("Failed to delete coffees during teardown");
        self.server.abort();
    }
}
