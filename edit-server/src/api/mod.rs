//! HTTP API
//!
//! - [`health`] - health check
//! - [`orders`] - order edit view, preview and submission

pub mod health;
pub mod orders;

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;
use crate::utils::AppError;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// UUID v4 request id generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(orders::router())
        .fallback(route_not_found)
}

async fn route_not_found(uri: http::Uri) -> AppError {
    AppError::not_found(format!("Route {}", uri.path()))
}

/// Build the application with all middleware
///
/// Layers added last run first: the request id is set before tracing and
/// copied onto the response on the way out.
pub fn build_app() -> Router<ServerState> {
    build_router()
        // Propagate request ID to the response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        // Trace - request tracing
        .layer(TraceLayer::new_for_http())
        // Request ID - generate a unique id for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        // CORS - the edit screen is embedded in the shop admin
        .layer(CorsLayer::permissive())
}
