//! SpendWise is a web app for tracking income and expenses.
//!
//! This library serves HTML pages rendered on the server and keeps no data of
//! its own: every record lives behind the SpendWise REST API, which is called
//! with the bearer token stored in the user's private cookie.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod api;
mod app_state;
mod auth;
mod category;
mod chart;
mod config;
mod dashboard;
mod endpoints;
mod error;
mod export;
mod filter;
mod html;
mod image_host;
mod internal_server_error;
mod logging;
mod model;
mod navigation;
mod not_found;
mod pipeline;
mod routing;
mod session;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use config::{
    Config, DEFAULT_API_BASE_URL, DEFAULT_IMAGE_UPLOAD_PRESET, DEFAULT_IMAGE_UPLOAD_URL,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TIMEZONE,
};
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
