//! Application state shared across handlers.

use database::Database;
use engine::Engine;

use crate::sessions::SessionStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database pool, for health checks.
    pub db: Database,
    /// Complaint engine.
    pub engine: Engine,
    /// Login sessions.
    pub sessions: SessionStore,
    /// Echo issued codes back to the caller. Insecure; demo only.
    pub otp_demo_mode: bool,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, engine: Engine, sessions: SessionStore, otp_demo_mode: bool) -> Self {
        Self {
            db,
            engine,
            sessions,
            otp_demo_mode,
        }
    }
}
