//! services/portal/src/web/session.rs
//!
//! Session cookie helpers: reading the token from a request, minting a new
//! login session, and the `Set-Cookie` values for login and logout.

use axum::http::{header, HeaderMap};
use chrono::Utc;
use uuid::Uuid;

use crate::web::state::AppState;
use attendance_core::domain::Identity;
use attendance_core::ports::PortResult;

pub const SESSION_COOKIE: &str = "session";

/// The authenticated user, inserted into request extensions by `require_auth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub attendance_core::UserId);

/// Extracts the session token from the `Cookie` header, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|c| {
            let c = c.trim();
            c.strip_prefix("session=")
        })
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Mints a token bound to the user's identity and records it in the session store.
pub async fn open_session(state: &AppState, who: &impl Identity) -> PortResult<String> {
    let token = Uuid::new_v4().to_string();
    let expires_at = Utc::now() + state.config.session_ttl;
    state
        .sessions
        .create_session(&token, who.identity(), expires_at)
        .await?;
    Ok(token)
}

/// Browser-session cookie carrying the token; lifetime is enforced server side.
pub fn login_cookie(token: &str, secure: bool) -> String {
    format!(
        "{}={}; HttpOnly;{} SameSite=Lax; Path=/",
        SESSION_COOKIE,
        token,
        if secure { " Secure;" } else { "" }
    )
}

pub fn logout_cookie(secure: bool) -> String {
    format!(
        "{}=; HttpOnly;{} SameSite=Lax; Path=/; Max-Age=0",
        SESSION_COOKIE,
        if secure { " Secure;" } else { "" }
    )
}
