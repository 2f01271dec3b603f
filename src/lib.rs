pub mod api;
pub mod completion;
pub mod config;
pub mod dialogue;
pub mod knowledge;
pub mod models;
pub mod session;
pub mod templates;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::completion::{CompletionBackend, DisabledCompletion, OllamaCompletion};
use crate::config::{AppConfig, CompletionBackendConfig, SessionBackend};
use crate::dialogue::{Dispatcher, Router};
use crate::session::{MemorySessionStore, SessionStore, SqliteSessionStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Session store: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Server(#[from] api::ServerError),
    #[error("Signal handler: {0}")]
    Signal(std::io::Error),
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Wire the session store, completion backend and router from `config`.
pub fn build_dispatcher(config: &AppConfig) -> Result<Dispatcher, StoreError> {
    let store: Arc<dyn SessionStore> = match &config.sessions {
        SessionBackend::Memory => Arc::new(MemorySessionStore::new()),
        SessionBackend::Sqlite(path) => Arc::new(SqliteSessionStore::open(path)?),
    };

    let completion: Arc<dyn CompletionBackend> = match &config.completion {
        CompletionBackendConfig::Disabled => Arc::new(DisabledCompletion),
        CompletionBackendConfig::Ollama { base_url, model } => Arc::new(OllamaCompletion::new(
            base_url,
            model,
            config.completion_timeout.as_secs(),
        )),
    };

    tracing::info!(
        sessions = store.backend_name(),
        completion = completion.name(),
        timeout_secs = config.completion_timeout.as_secs(),
        knowledge = knowledge::KNOWLEDGE_VERSION,
        "Dispatcher configured"
    );

    Ok(Dispatcher::new(
        store,
        Router::new(config::WEB_APP_LINK, config.tip_seed),
        completion,
        config.completion_timeout,
    ))
}

/// Serve the HTTP API until Ctrl-C.
pub async fn run(config: AppConfig) -> Result<(), StartupError> {
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let dispatcher = Arc::new(build_dispatcher(&config)?);
    let server = api::start_server(config.bind_addr, dispatcher).await?;
    tracing::info!(addr = %server.addr, "Listening");

    let signal = tokio::signal::ctrl_c().await;
    server.shutdown().await;
    signal.map_err(StartupError::Signal)
}
