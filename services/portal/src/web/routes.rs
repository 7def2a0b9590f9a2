//! services/portal/src/web/routes.rs
//!
//! Assembles the HTTP router: public login/registration routes, protected
//! pages behind `require_auth`, and the Swagger UI.

use axum::{middleware as axum_middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::web::auth::{
    login_handler, login_page, logout_handler, register_handler, registration_page,
};
use crate::web::middleware::require_auth;
use crate::web::rest::{
    absences_recap_handler, attendance_history_handler, grades_handler, home_handler, ApiDoc,
};
use crate::web::state::AppState;

pub fn build_router(app_state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(login_page))
        .route("/connexion", get(login_page).post(login_handler))
        .route("/inscription", get(registration_page).post(register_handler))
        .route("/deconnexion", get(logout_handler).post(logout_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/acceuil", get(home_handler))
        .route("/notes", get(grades_handler))
        .route("/recap_absences.html", get(absences_recap_handler))
        .route("/historique_presences.html", get(attendance_history_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    let portal_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state);

    Router::new()
        .merge(portal_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}
