//! Wine shop backend: a read-only product catalog and per-user orders over PostgreSQL,
//! served as a JSON REST API.

pub mod admin;
pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod media;
pub mod migration;
pub mod pagination;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use admin::{seed_catalog, CatalogWriter, ADMIN_REGISTRY};
pub use config::{CatalogFixture, Settings};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use routes::app;
pub use state::AppState;
pub use store::{connect, ensure_database_exists};
