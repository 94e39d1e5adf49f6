//! Shared context for the API layer.
//!
//! All services are constructed once in `main` and passed in by handle;
//! nothing here is a module-level singleton.

use std::path::PathBuf;
use std::sync::Arc;

use rusqlite::Connection;

use crate::ai::monitor::HealthMonitor;
use crate::ai::AiManager;
use crate::config::AppConfig;
use crate::db::{self, DatabaseError};

/// Shared state for all routes.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<AppConfig>,
    pub ai: Arc<AiManager>,
    pub monitor: Arc<HealthMonitor>,
    db_path: Arc<PathBuf>,
}

impl ApiContext {
    pub fn new(
        config: Arc<AppConfig>,
        ai: Arc<AiManager>,
        monitor: Arc<HealthMonitor>,
        db_path: PathBuf,
    ) -> Self {
        Self {
            config,
            ai,
            monitor,
            db_path: Arc::new(db_path),
        }
    }

    /// Open a connection for the current request. Migrations already ran
    /// at startup; re-running them here is a version-checked no-op.
    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        db::open_database(&self.db_path)
    }
}

/// Authenticated patient identity, injected into request extensions by
/// the identity middleware. Only present on `/api/patient/*` routes.
#[derive(Debug, Clone, Copy)]
pub struct PatientContext {
    pub patient_id: i64,
}
