//! HTTP surface of the service.
//!
//! | Route                   | Handler                    |
//! |-------------------------|----------------------------|
//! | `GET /`                 | [`pages::index`]           |
//! | `GET /static/*`         | files under `static_dir`   |
//! | `GET /health`           | [`pages::health`]          |
//! | `GET /api/instance-info`| [`info::instance_info`]    |
//! | `GET /api/services`     | [`info::services`]         |
//! | `GET /api/system-info`  | [`info::system_info`]      |
//! | `POST /api/check-service` | [`network::check_service`] |
//! | `POST /api/network-scan`  | [`network::network_scan`]  |

pub mod body;
pub mod info;
pub mod network;
pub mod pages;

use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/", get(pages::index))
        .route("/health", get(pages::health))
        .route("/api/instance-info", get(info::instance_info))
        .route("/api/services", get(info::services))
        .route("/api/system-info", get(info::system_info))
        .route("/api/check-service", post(network::check_service))
        .route("/api/network-scan", post(network::network_scan))
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn_with_state(state.clone(), in_service_span))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Runs the rest of the stack inside the service's root span.
async fn in_service_span(State(state): State<AppState>, req: Request, next: Next) -> Response {
    next.run(req).instrument(state.span.clone()).await
}
