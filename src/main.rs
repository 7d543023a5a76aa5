use std::sync::Arc;

use anyhow::{Context, Result};
use todo_file_service::{AppConfig, AppState, JsonFileStore, LogSink, build_router};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_TRACE_FILTER: &str = "todo_file_service=debug,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let config = AppConfig::from_env().context("failed to load configuration")?;

    if !config.todos_path.exists() {
        warn!(
            path = %config.todos_path.display(),
            "todos file does not exist; requests will fail until it is created"
        );
    }

    let store = JsonFileStore::new(config.todos_path.clone()).with_write_mode(config.write_mode);
    let (log, log_writer) = LogSink::spawn(config.log_path.clone());

    let app = build_router(AppState::new(Arc::new(store), log.clone()));

    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(
        address = %addr,
        todos = %config.todos_path.display(),
        log = %config.log_path.display(),
        write_mode = ?config.write_mode,
        "Server running at http://localhost:{}",
        config.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(drain_on_stop(log.clone()))
        .await
        .context("server error")?;

    // In-flight requests may have queued lines after the drain above.
    log.flush().await;
    log_writer.abort();

    Ok(())
}

/// Stderr diagnostics; `RUST_LOG` overrides the default filter.
fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_TRACE_FILTER))
        .context("invalid trace filter")?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("failed to install tracing subscriber")
}

/// Resolves once a stop signal arrives and the request log has caught up.
async fn drain_on_stop(log: LogSink) {
    let signal = stop_signal().await;
    info!(signal, pending_log = %log.path().display(), "stopping; draining request log");
    log.flush().await;
}

async fn stop_signal() -> &'static str {
    let interrupt = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(err) => {
                error!(error = %err, "cannot listen for Ctrl+C");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                "SIGTERM"
            }
            Err(err) => {
                error!(error = %err, "cannot listen for SIGTERM");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    tokio::select! {
        name = interrupt => name,
        name = terminate => name,
    }
}
