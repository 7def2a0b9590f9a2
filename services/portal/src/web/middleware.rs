//! services/portal/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{debug, error};

use crate::web::session::{session_token, CurrentUser};
use crate::web::state::AppState;
use attendance_core::ports::PortError;

/// Where unauthenticated visitors of protected pages are sent.
pub const LOGIN_ENTRY: &str = "/";

/// Middleware that validates the session cookie before the handler runs.
///
/// If valid, inserts `CurrentUser` into request extensions for handlers to use.
/// If invalid or missing, redirects to the login page without touching the handler.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = session_token(req.headers()) else {
        debug!("No session cookie on {}", req.uri().path());
        return Redirect::to(LOGIN_ENTRY).into_response();
    };

    match state.sessions.validate_session(&token).await {
        Ok(user_id) => {
            req.extensions_mut().insert(CurrentUser(user_id));
            next.run(req).await
        }
        Err(PortError::Unauthorized) => {
            debug!("Rejected stale session on {}", req.uri().path());
            Redirect::to(LOGIN_ENTRY).into_response()
        }
        Err(e) => {
            error!("Failed to validate session: {:?}", e);
            Redirect::to(LOGIN_ENTRY).into_response()
        }
    }
}
