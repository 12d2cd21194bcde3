//! Application State
//!
//! Global state for an embedding shell (UI or transport layer),
//! containing the storage services. Initialization is idempotent.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::storage::{ConfigService, Database};
use crate::utils::error::{AppError, AppResult};

/// Application state shared across the embedding shell
pub struct AppState {
    /// SQLite database with connection pool
    database: Arc<RwLock<Option<Database>>>,
    /// Configuration service for app settings
    config: Arc<RwLock<Option<ConfigService>>>,
    /// Whether the state has been initialized
    initialized: Arc<RwLock<bool>>,
}

impl AppState {
    /// Create a new uninitialized app state
    pub fn new() -> Self {
        Self {
            database: Arc::new(RwLock::new(None)),
            config: Arc::new(RwLock::new(None)),
            initialized: Arc::new(RwLock::new(false)),
        }
    }

    /// Initialize all services
    pub async fn initialize(&self) -> AppResult<()> {
        let mut initialized = self.initialized.write().await;
        if *initialized {
            return Ok(());
        }

        // Config first: it may override the database location
        let config_service = ConfigService::new()?;
        let database = match &config_service.get_config().database_path {
            Some(path) => Database::new_at(PathBuf::from(path))?,
            None => Database::new()?,
        };

        {
            let mut config_lock = self.config.write().await;
            *config_lock = Some(config_service);
        }
        {
            let mut db_lock = self.database.write().await;
            *db_lock = Some(database);
        }

        *initialized = true;
        Ok(())
    }

    /// Get a clone of the database handle
    pub async fn database(&self) -> AppResult<Database> {
        let guard = self.database.read().await;
        match &*guard {
            Some(db) => Ok(db.clone()),
            None => Err(AppError::database("Database not initialized")),
        }
    }

    /// Check if the database is healthy
    pub fn is_database_healthy(&self) -> bool {
        // Use try_read to avoid blocking
        if let Ok(guard) = self.database.try_read() {
            if let Some(ref db) = *guard {
                return db.is_healthy();
            }
        }
        false
    }

    /// Check if the config service is healthy
    pub fn is_config_healthy(&self) -> bool {
        if let Ok(guard) = self.config.try_read() {
            if let Some(ref config) = *guard {
                return config.is_healthy();
            }
        }
        false
    }

    /// Get the current configuration
    pub async fn get_config(&self) -> AppResult<AppConfig> {
        let guard = self.config.read().await;
        match &*guard {
            Some(config) => Ok(config.get_config_clone()),
            None => Err(AppError::config("Config service not initialized")),
        }
    }

    /// Apply a partial settings update
    pub async fn update_config(&self, update: SettingsUpdate) -> AppResult<AppConfig> {
        let mut guard = self.config.write().await;
        match &mut *guard {
            Some(config) => config.update_config(update),
            None => Err(AppError::config("Config service not initialized")),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialized_state_is_unhealthy() {
        let state = AppState::new();
        assert!(!state.is_database_healthy());
        assert!(!state.is_config_healthy());
    }

    #[tokio::test]
    async fn test_database_access_before_init_fails() {
        let state = AppState::new();
        assert!(state.database().await.is_err());
        assert!(state.get_config().await.is_err());
    }
}
