use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use callpilot_api::config::ServerConfig;
use callpilot_api::router::build_app_router;
use callpilot_api::state::AppState;
use callpilot_core::history::CallHistory;
use callpilot_core::providers::{CallInitiator, ScriptGenerator};
use callpilot_providers::{
    HttpClient, OpenAiConfig, OpenAiScriptGenerator, TwilioCallInitiator, TwilioConfig,
};
use callpilot_store::FileStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "callpilot_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- History ---
    let store = FileStore::open(&config.history_dir).expect("Failed to open history directory");
    tracing::info!(dir = %store.dir().display(), "History store opened");
    let history = CallHistory::open(Arc::new(store));

    // --- Providers ---
    // Both share one connection pool.
    let http = HttpClient::new();

    let script_generator: Option<Arc<dyn ScriptGenerator>> = match OpenAiConfig::from_env() {
        Some(cfg) => {
            tracing::info!(model = %cfg.model, "AI script generator enabled");
            Some(Arc::new(OpenAiScriptGenerator::with_client(http.clone(), cfg)))
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not set, scripts will use the local fallback");
            None
        }
    };

    let call_initiator: Option<Arc<dyn CallInitiator>> = match TwilioConfig::from_env() {
        Some(cfg) => {
            tracing::info!(caller_id = %cfg.caller_id, "Twilio call initiator enabled");
            Some(Arc::new(TwilioCallInitiator::with_client(http, cfg)))
        }
        None => {
            tracing::warn!("Twilio credentials not set, queueing calls will be rejected");
            None
        }
    };

    // --- Router ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let state = AppState::new(config, history, script_generator, call_initiator);
    let app = build_app_router(state);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
