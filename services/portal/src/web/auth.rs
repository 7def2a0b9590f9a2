//! services/portal/src/web/auth.rs
//!
//! Login, registration, and logout endpoints.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use attendance_core::RegistrationOutcome;
use std::sync::Arc;
use tracing::{error, info};

use crate::web::session::{login_cookie, logout_cookie, open_session, session_token};
use crate::web::state::AppState;
use crate::web::views::{FormPage, LoginForm, RegistrationForm};

pub const HOME_PATH: &str = "/acceuil";

pub const INVALID_CREDENTIALS: &str = "Identifiants invalides. Veuillez réessayer.";
pub const PASSWORD_MISMATCH: &str = "Les mots de passe ne correspondent pas. Veuillez réessayer.";
pub const EMAIL_TAKEN: &str = "Cet email est déjà utilisé. Veuillez en choisir un autre.";
pub const REGISTERED: &str = "L'inscription de cet utilisateur c'est bien passée";
pub const MISSING_FIELDS: &str = "L'email et le mot de passe sont obligatoires.";

fn internal_error(context: &str) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
}

//=========================================================================================
// Login
//=========================================================================================

/// GET / and GET /connexion - Login page
#[utoipa::path(
    get,
    path = "/connexion",
    responses((status = 200, description = "Login page", body = FormPage))
)]
pub async fn login_page() -> Json<FormPage> {
    Json(FormPage::login(None))
}

/// POST /connexion - Submit credentials
#[utoipa::path(
    post,
    path = "/connexion",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Logged in, redirected to the home page"),
        (status = 200, description = "Invalid credentials, login page re-shown", body = FormPage),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Response, (StatusCode, String)> {
    // 1. Verify the submitted pair
    let user = state
        .auth
        .verify_credentials(&form.email, &form.password)
        .await
        .map_err(|e| {
            error!("Failed to verify credentials: {:?}", e);
            internal_error("Authentication error")
        })?;

    let Some(user) = user else {
        return Ok(Json(FormPage::login(Some(INVALID_CREDENTIALS))).into_response());
    };

    // 2. Open a session bound to the user
    let token = open_session(&state, &user).await.map_err(|e| {
        error!("Failed to create auth session: {:?}", e);
        internal_error("Failed to create session")
    })?;
    info!("User {} logged in", user.id);

    // 3. Set the cookie and go home
    let cookie = login_cookie(&token, state.config.cookie_secure);
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to(HOME_PATH)).into_response())
}

//=========================================================================================
// Registration
//=========================================================================================

/// GET /inscription - Registration page
#[utoipa::path(
    get,
    path = "/inscription",
    responses((status = 200, description = "Registration page", body = FormPage))
)]
pub async fn registration_page() -> Json<FormPage> {
    Json(FormPage::registration(None))
}

/// POST /inscription - Create a new account
///
/// Always answers with the registration page and one message; there is no
/// redirect on success.
#[utoipa::path(
    post,
    path = "/inscription",
    request_body(content = RegistrationForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Registration page with the outcome message", body = FormPage),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegistrationForm>,
) -> Result<Json<FormPage>, (StatusCode, String)> {
    let outcome = state
        .auth
        .register(&form.email, &form.password, &form.confirm_password)
        .await
        .map_err(|e| {
            error!("Failed to register user: {:?}", e);
            internal_error("Failed to create user")
        })?;

    let message = match outcome {
        RegistrationOutcome::Registered => {
            info!("New user registered");
            REGISTERED
        }
        RegistrationOutcome::PasswordMismatch => PASSWORD_MISMATCH,
        RegistrationOutcome::MissingFields => MISSING_FIELDS,
        RegistrationOutcome::EmailTaken => EMAIL_TAKEN,
    };
    Ok(Json(FormPage::registration(Some(message))))
}

//=========================================================================================
// Logout
//=========================================================================================

/// GET/POST /deconnexion - Invalidate the session
#[utoipa::path(
    post,
    path = "/deconnexion",
    responses(
        (status = 303, description = "Logged out, redirected to the login page"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, (StatusCode, String)> {
    if let Some(token) = session_token(&headers) {
        state.sessions.delete_session(&token).await.map_err(|e| {
            error!("Failed to delete auth session: {:?}", e);
            internal_error("Failed to logout")
        })?;
    }

    let cookie = logout_cookie(state.config.cookie_secure);
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}
