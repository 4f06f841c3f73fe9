//! fresh-server: named configuration entries over HTTP, stored in SQLite.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metadata;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;
pub mod telemetry;

pub use config::{LogProfile, ServerConfig};
pub use error::{AppError, ConfigError, StoreError};
pub use metadata::{CodecError, Metadata, MetadataValue};
pub use routes::{app_router, app_router_with_timeout, common_routes, config_routes};
pub use state::AppState;
pub use store::{ConfigEntry, ConfigStore, MemoryConfigStore, NewConfig, SqliteConfigStore};
