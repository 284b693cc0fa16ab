//! Repository layer for database operations

pub mod equipment;
pub mod maintenance;
pub mod providers;
pub mod reports;
pub mod users;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;

use crate::config::DatabaseConfig;

/// Main repository struct holding the database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Connect to the database, waiting through a bounded fixed-interval
    /// retry loop (the store usually starts alongside the services).
    pub async fn connect(config: &DatabaseConfig) -> Result<Pool<Postgres>, sqlx::Error> {
        let mut attempt = 1u32;
        loop {
            let result = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .min_connections(config.min_connections)
                .connect(&config.url)
                .await;

            match result {
                Ok(pool) => {
                    tracing::info!("Database connection established on attempt {}", attempt);
                    return Ok(pool);
                }
                Err(e) if attempt < config.connect_attempts => {
                    tracing::warn!(
                        "Database connection attempt {} failed: {}; retrying in {}s",
                        attempt,
                        e,
                        config.connect_retry_secs
                    );
                    tokio::time::sleep(Duration::from_secs(config.connect_retry_secs)).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database after {} attempts",
                        config.connect_attempts
                    );
                    return Err(e);
                }
            }
        }
    }
}
