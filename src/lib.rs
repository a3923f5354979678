pub mod monitor;
pub mod transport;
pub mod dashboard;
pub mod config;

use std::sync::Arc;
use parking_lot::Mutex;
use crate::config::Config;
use crate::monitor::{ColumnVisibility, MonitorController};
use crate::transport::{HttpBackend, TransportError};

/// Single writer over the view model: every event and completion locks, applies, releases.
pub type SharedController = Arc<Mutex<MonitorController>>;

// ========================================
// ENGINE
// ========================================

/// Cheap to clone (all fields are Arcs).
#[derive(Clone)]
pub struct MonitorEngine {
    pub controller: SharedController,
    pub backend: Arc<HttpBackend>,
}

impl MonitorEngine {
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        let backend = HttpBackend::new(&config.backend.base_url, config.backend.request_timeout_secs)?;
        let columns = ColumnVisibility::from_hidden_list(&config.dashboard.hidden_columns);

        Ok(Self {
            controller: Arc::new(Mutex::new(MonitorController::new(columns))),
            backend: Arc::new(backend),
        })
    }
}
