//! Enrollment API: students, courses and the enrollments between them, over REST.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::{Settings, StoreKind};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use routes::{api_routes, build_app, common_routes, common_routes_with_ready};
pub use service::{CourseService, StudentService};
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryStore, PgStore, Store};
