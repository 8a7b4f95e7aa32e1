//! # Park Security
//!
//! Web backend for the Park Security decision quiz.
//!
//! A user walks through a fixed catalog of park-entrance scenarios,
//! answers yes/no for each, and finally sees a summary of their calls.
//! Each answer is optionally forwarded to a hosted vote table so the user
//! can compare their decision against everyone else's.
//!
//!
//!
//! # Flow
//!
//! - `GET /` hands out a session cookie on first visit and returns the
//!   current scenario, or the summary once all scenarios are answered
//! - `POST /decision` records a yes/no answer; if the vote store is
//!   reachable it returns the aggregate tally and waits for an explicit
//!   advance, otherwise it moves straight to the next scenario
//! - `GET /next_scenario` advances after a tally display
//! - `GET /reset` wipes the session and starts over
//!
//!
//!
//! # Vote Store
//!
//! One hosted table `votes(scenario_id, decision, session_uuid,
//! created_at)` reached over its REST API. The store is strictly
//! best-effort: unconfigured, unreachable, or erroring stores all degrade
//! to local-only recording with zero tallies, invisible to the user.
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
pub mod quiz;
pub mod routes;
pub mod scenarios;
pub mod session;
pub mod state;
pub mod votes;

use routes::{decision_handler, index_handler, next_scenario_handler, reset_handler};
use state::State;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new();

    if state.votes.enabled() {
        info!("Vote store configured, tallies enabled");
    } else {
        info!("Vote store not configured, running local-only");
    }

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = router(state.clone()).layer(cors);

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

pub fn router(state: Arc<State>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/decision", post(decision_handler))
        .route("/next_scenario", get(next_scenario_handler))
        .route("/reset", get(reset_handler))
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
