pub mod auth;
pub mod middleware;
pub mod rest;
pub mod routes;
pub mod session;
pub mod state;
pub mod views;

// Re-export the router builder so the binary and the tests share one route table.
pub use middleware::require_auth;
pub use routes::build_router;
pub use state::AppState;
