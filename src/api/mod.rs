//! API layer - HTTP handlers and routing
//!
//! JSON endpoints over the record services, plus the index page that ranks
//! publications by likes.

pub mod comments;
pub mod index;
pub mod likes;
pub mod middleware;
pub mod pictures;
pub mod publications;
pub mod subscriptions;
pub mod tags;
pub mod users;

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use middleware::{ApiError, AppState};

/// Build the `/api/v1` router
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/subscriptions", subscriptions::router())
        .nest("/publications", publications::router())
        .nest("/comments", comments::router())
        .nest("/likes", likes::router())
        .nest("/pictures", pictures::router())
        .nest("/tags", tags::router())
}

/// Build the complete router with middleware
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(index::index))
        .nest("/api/v1", build_api_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
