//! Application state shared by every request handler.
//!
//! Holds no mutable state: each request opens its own SQLite connection
//! and the token service is immutable after startup.

use std::path::{Path, PathBuf};

use crate::config::ServerConfig;
use crate::crypto::JwtService;
use crate::db;

pub struct CoreState {
    db_path: PathBuf,
    pub jwt: JwtService,
}

impl CoreState {
    /// Migrate the database at `config.db_path` and build the state.
    pub fn initialize(config: &ServerConfig) -> Result<Self, CoreError> {
        Self::with_database(
            &config.db_path,
            JwtService::new(&config.jwt_secret, config.jwt_expiration_secs),
        )
    }

    pub fn with_database(db_path: &Path, jwt: JwtService) -> Result<Self, CoreError> {
        // Migrations run once here; per-request connections skip them.
        db::open_database(db_path)?;
        tracing::info!(path = %db_path.display(), "Database ready");
        Ok(Self {
            db_path: db_path.to_path_buf(),
            jwt,
        })
    }

    /// Open a database connection for one request.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        db::open_connection(&self.db_path).map_err(CoreError::Database)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

/// Errors from CoreState operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
}
