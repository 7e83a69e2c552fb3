pub mod config;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod repository;
pub mod services;
pub mod state;

pub use config::Config;
pub use error_types::{ServiceError, ServiceResult};
pub use repository::{PostgresRepository, Repositories};
pub use state::AppState;

use sqlx::migrate::Migrator;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");
