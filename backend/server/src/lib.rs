//! Documentation feedback service.
//!
//! Readers rate a docs page thumbs up or down and may leave a comment. Each page
//! gets one GitHub discussion in the "Documentation feedback" category; its body
//! carries the vote tally and every submission is appended as a comment.
//!
//!
//!
//! # Flow
//! - Widget posts JSON to `/feedback` (also served at the Netlify function path)
//! - Repeat requests from one client within the debounce window get a 429
//! - Spurious submissions (honeypot field filled) get an empty 200
//! - Path is reduced to its last two segments, so `/docs/7.6/react/api/args`
//!   and `/docs/8.0/vue/api/args` land in the same discussion
//! - Discussion is found by exact title or created with a seeded tally
//! - Tally for the submitted rating is bumped by one
//! - Closed discussions are reopened when a comment is attached
//! - Comment is added, its URL is returned as `{"url": ...}`
//!
//!
//!
//! # Vote Tally
//!
//! Stored in the discussion body as a markdown table so maintainers can read it
//! on GitHub.
//! ```text
//! | 👍 | 👎 |
//! | :-: | :-: |
//! | <!--start-up-->3<!--end-up--> | <!--start-down-->1<!--end-down--> |
//! ```
//!
//! The update is a read-modify-write of the whole body. Requests within this
//! process are serialized per discussion, but GitHub has no conditional update,
//! so two processes voting on the same page at once can still lose a vote.
//!
//!
//!
//! # Failures
//! - Any failing GitHub call aborts the request with a 500 carrying the query,
//!   variables and raw response
//! - Nothing is retried or rolled back
//!
//!
//!
//! # Setup
//!
//! Run with a bot token.
//! ```sh
//! GITHUB_STORYBOOK_BOT_PAT=... RUST_LOG=info cargo run -p docs-feedback
//! ```
//!
//! Send a rating.
//! ```sh
//! cargo run -p tester -- /docs/7.6/react/api/args up --comment "Great page"
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod feedback;
pub mod limiter;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

#[cfg(test)]
mod testing;

use config::Config;
use routes::{feedback_handler, health_handler};
use state::State;

pub const NETLIFY_FUNCTION_PATH: &str = "/.netlify/functions/docs-feedback";

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = State::new(config)?;

    info!("Starting server...");
    let address = format!("0.0.0.0:{}", state.config.port);
    let app = app(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

pub fn app(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/feedback", post(feedback_handler))
        .route(NETLIFY_FUNCTION_PATH, post(feedback_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
