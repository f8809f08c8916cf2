//! WaBridge HTTP server binary

use std::{sync::Arc, time::Duration};

use application::EventForwarder;
use infrastructure::{AppConfig, HttpWebhookAdapter, WhatsAppSessionAdapter, init_tracing};
use presentation_http::{routes, state::AppState, tasks::spawn_event_forwarding_task};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configuration decides the log format, so load it first and report
    // a load failure once tracing is up
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_tracing(config.server.log_format)?;

    if let Some(e) = load_error {
        warn!("Failed to load config, using defaults: {}", e);
    }

    info!("WaBridge v{} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        host = %config.server.host,
        port = %config.server.port,
        socket = %config.session.socket_path,
        webhook = %config.webhook.url,
        "Configuration loaded"
    );

    // One session handle shared by the REST surface and the forwarder
    let session = Arc::new(WhatsAppSessionAdapter::new(config.session.client_config()));
    if !session.client().is_available().await {
        warn!(
            socket = %config.session.socket_path,
            "Session daemon not reachable yet; sends will fail until it is"
        );
    }

    let forwarding_task = if config.webhook.enabled {
        let webhook = Arc::new(HttpWebhookAdapter::new(&config.webhook)?);
        let forwarder = Arc::new(EventForwarder::new(webhook));
        Some(spawn_event_forwarding_task(
            session.clone(),
            forwarder,
            config.session.resubscribe_delay(),
        ))
    } else {
        info!("Webhook forwarding disabled");
        None
    };

    let bind_address = config.server.bind_address();
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);

    let state = AppState::new(session.clone(), session.clone(), Arc::new(config));
    let app = routes::create_router(state).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&bind_address).await?;
    info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    if let Some(task) = forwarding_task {
        task.abort();
    }
    session.close().await;

    info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {:?} for connections to close...", timeout);
    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        warn!("Shutdown timeout elapsed, exiting");
        std::process::exit(0);
    });
}
