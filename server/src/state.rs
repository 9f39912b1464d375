//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! gateway is built once during startup and shared behind an `Arc`; no
//! handler reaches for a process-wide singleton.

use std::sync::Arc;

use crate::config::AuthConfig;
use crate::services::gateway::AuthGateway;

/// Clone is required by Axum; all fields are `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AuthConfig>,
    pub gateway: Arc<dyn AuthGateway>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Arc<AuthConfig>, gateway: Arc<dyn AuthGateway>) -> Self {
        Self { config, gateway }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
