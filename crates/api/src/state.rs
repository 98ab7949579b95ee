use std::sync::Arc;

use callpilot_core::history::CallHistory;
use callpilot_core::providers::{CallInitiator, ScriptGenerator};
use tokio::sync::Mutex;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// The single writer of the call history. Never held across provider I/O.
    pub history: Arc<Mutex<CallHistory>>,
    /// AI script generator; `None` means scripts are always synthesized locally.
    pub script_generator: Option<Arc<dyn ScriptGenerator>>,
    /// Voice provider; `None` means queueing calls reports missing configuration.
    pub call_initiator: Option<Arc<dyn CallInitiator>>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        history: CallHistory,
        script_generator: Option<Arc<dyn ScriptGenerator>>,
        call_initiator: Option<Arc<dyn CallInitiator>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            history: Arc::new(Mutex::new(history)),
            script_generator,
            call_initiator,
        }
    }
}
