//! services/portal/src/web/rest.rs
//!
//! Contains the handlers for the protected pages and the master definition
//! for the OpenAPI specification.

use crate::web::session::CurrentUser;
use crate::web::state::AppState;
use crate::web::views::{
    AbsenceSummaryView, AttendanceRecordView, FormPage, GradeTableView, HomePage, LoginForm,
    RegistrationForm,
};
use axum::{extract::State, http::StatusCode, response::Json, Extension};
use std::sync::Arc;
use tracing::error;
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::login_page,
        crate::web::auth::login_handler,
        crate::web::auth::registration_page,
        crate::web::auth::register_handler,
        crate::web::auth::logout_handler,
        home_handler,
        grades_handler,
        absences_recap_handler,
        attendance_history_handler,
    ),
    components(
        schemas(
            LoginForm,
            RegistrationForm,
            FormPage,
            HomePage,
            GradeTableView,
            AttendanceRecordView,
            AbsenceSummaryView
        )
    ),
    tags(
        (name = "Attendance Portal", description = "Login, registration, grades and attendance pages.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Protected Page Handlers
//=========================================================================================

/// Home page of a logged-in user.
#[utoipa::path(
    get,
    path = "/acceuil",
    responses(
        (status = 200, description = "Home page", body = HomePage),
        (status = 303, description = "Not logged in, redirected to the login page")
    )
)]
pub async fn home_handler(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Json<HomePage> {
    Json(HomePage::for_user(user_id))
}

/// Every row of the grades relation.
#[utoipa::path(
    get,
    path = "/notes",
    responses(
        (status = 200, description = "Grades table", body = GradeTableView),
        (status = 303, description = "Not logged in, redirected to the login page"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn grades_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GradeTableView>, (StatusCode, String)> {
    let table = state.records.grades().await.map_err(|e| {
        error!("Failed to load grades: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load grades".to_string())
    })?;
    Ok(Json(table.into()))
}

/// Absence count per student and subject.
#[utoipa::path(
    get,
    path = "/recap_absences.html",
    responses(
        (status = 200, description = "Absence summary", body = [AbsenceSummaryView]),
        (status = 303, description = "Not logged in, redirected to the login page"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn absences_recap_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AbsenceSummaryView>>, (StatusCode, String)> {
    let summary = state.records.absence_summary().await.map_err(|e| {
        error!("Failed to load absence summary: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load absence summary".to_string(),
        )
    })?;
    Ok(Json(summary.into_iter().map(Into::into).collect()))
}

/// The full attendance log.
#[utoipa::path(
    get,
    path = "/historique_presences.html",
    responses(
        (status = 200, description = "Attendance history", body = [AttendanceRecordView]),
        (status = 303, description = "Not logged in, redirected to the login page"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn attendance_history_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AttendanceRecordView>>, (StatusCode, String)> {
    let records = state.records.attendance_log().await.map_err(|e| {
        error!("Failed to load attendance log: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load attendance history".to_string(),
        )
    })?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}
