//! HTTP route handlers for the relay server.

pub mod privacy;
pub mod route;

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}
