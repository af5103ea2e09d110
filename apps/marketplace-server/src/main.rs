// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use marketplace_server::{
    api::{cors_layer, router},
    auth::{SessionCookiePolicy, SessionTokenCodec},
    config::{LogFormat, ServerConfig, DEFAULT_LOG_FILTER},
    state::AppState,
    storage::{DocumentStore, DATABASE_FILE},
};

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

/// Cancel `shutdown` on Ctrl-C or SIGTERM.
async fn watch_signals(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C"),
        _ = terminate => info!("Received SIGTERM"),
    }
    shutdown.cancel();
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = ServerConfig::from_env();
    // An invalid configuration is still reported, with the default format.
    init_tracing(config.as_ref().map(|c| c.log_format).unwrap_or_default());

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    info!(?config, "Configuration loaded");

    let db_path = config.data_dir.join(DATABASE_FILE);
    let store = match DocumentStore::open(&db_path) {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, path = %db_path.display(), "Failed to open document store");
            return ExitCode::FAILURE;
        }
    };
    info!(path = %db_path.display(), "Document store opened");

    let state = AppState::new(
        store,
        SessionTokenCodec::new(config.access_token_secret.as_bytes()),
        SessionCookiePolicy::new(config.environment),
    );
    let app = router(state, cors_layer(&config.cors_origins));

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, %addr, "Failed to bind listener");
            return ExitCode::FAILURE;
        }
    };
    info!(%addr, "Marketplace server listening (docs at /docs)");

    let shutdown = CancellationToken::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await;

    match served {
        Ok(()) => {
            info!("Server stopped, document store closed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}
