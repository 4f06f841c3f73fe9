//! Shared helpers for integration tests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use async_trait::async_trait;
use fresh_server::{
    app_router, AppState, ConfigEntry, ConfigStore, Metadata, MemoryConfigStore, NewConfig, SqliteConfigStore,
    StoreError,
};
use std::sync::Arc;
use tokio::sync::Notify;
use tower::ServiceExt;

/// Both store implementations, labelled for assertion messages.
#[allow(dead_code)]
pub async fn stores() -> Vec<(&'static str, Arc<dyn ConfigStore>)> {
    let sqlite = SqliteConfigStore::in_memory()
        .await
        .expect("Failed to create in-memory sqlite store");
    vec![
        ("sqlite", Arc::new(sqlite) as Arc<dyn ConfigStore>),
        ("memory", Arc::new(MemoryConfigStore::new()) as Arc<dyn ConfigStore>),
    ]
}

#[allow(dead_code)]
pub fn router(store: Arc<dyn ConfigStore>) -> Router {
    app_router(AppState::new(store))
}

/// Send one request and return status plus body text.
#[allow(dead_code)]
pub async fn request(router: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, String) {
    let builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(text) => Body::from(text.to_string()),
        None => Body::empty(),
    };
    let request = builder.body(body).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Store whose calls never complete. `entered` fires each time a call starts.
#[allow(dead_code)]
#[derive(Default)]
pub struct StalledStore {
    pub entered: Arc<Notify>,
}

#[allow(dead_code)]
impl StalledStore {
    async fn stall<T>(&self) -> T {
        self.entered.notify_one();
        std::future::pending::<T>().await
    }
}

#[async_trait]
impl ConfigStore for StalledStore {
    async fn is_connected(&self) -> bool {
        self.stall().await
    }

    async fn insert(&self, _config: &NewConfig) -> Result<i64, StoreError> {
        self.stall().await
    }

    async fn get_by_id(&self, _id: i64) -> Result<ConfigEntry, StoreError> {
        self.stall().await
    }

    async fn get_by_name(&self, _name: &str) -> Result<ConfigEntry, StoreError> {
        self.stall().await
    }

    async fn list(&self) -> Result<Vec<ConfigEntry>, StoreError> {
        self.stall().await
    }

    async fn update_by_name(&self, _name: &str, _metadata: &Metadata) -> Result<u64, StoreError> {
        self.stall().await
    }

    async fn delete_by_name(&self, _name: &str) -> Result<u64, StoreError> {
        self.stall().await
    }
}
