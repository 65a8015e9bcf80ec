pub mod app_config;
pub mod database;
pub mod flight_repo;
pub mod memory_repo;

use std::sync::Arc;
use flightinfo_core::FlightRepository;
use tracing::info;

pub use app_config::{StorageBackend, StorageConfig};
pub use database::DbClient;
pub use flight_repo::PostgresFlightRepository;
pub use memory_repo::InMemoryFlightRepository;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage.url is required for the postgres backend")]
    MissingUrl,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Build the repository selected by `config.backend`.
pub async fn connect_repository(config: &StorageConfig) -> Result<Arc<dyn FlightRepository>, StoreError> {
    match config.backend {
        StorageBackend::Memory => {
            info!("Using in-memory flight storage");
            Ok(Arc::new(InMemoryFlightRepository::new()))
        }
        StorageBackend::Postgres => {
            let db = DbClient::new(config).await?;
            if config.run_migrations {
                db.migrate().await?;
            }
            info!("Connected to Postgres flight storage");
            Ok(Arc::new(PostgresFlightRepository::new(db.pool)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend_needs_no_url() {
        let repo = connect_repository(&StorageConfig::memory()).await.unwrap();
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_postgres_backend_requires_url() {
        let config = StorageConfig {
            backend: StorageBackend::Postgres,
            ..StorageConfig::memory()
        };
        let result = connect_repository(&config).await;
        assert!(matches!(result, Err(StoreError::MissingUrl)));
    }
}
