//! HTTP presentation layer
//!
//! REST surface for outbound sends, health endpoints, and the background
//! task that forwards inbound session events to the backend webhook.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod tasks;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
