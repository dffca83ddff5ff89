// src/state.rs
use std::sync::Arc;

use crate::config::RelayConfig;
use crate::services::relay::Relay;

pub type SharedState = Arc<AppState>;

/// Read-only after startup; handlers share it without locking.
pub struct AppState {
    pub relay: Relay,
}

impl AppState {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            relay: Relay::new(config),
        }
    }
}
