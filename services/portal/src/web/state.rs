//! services/portal/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use attendance_core::ports::{RecordsQuery, SessionStore};
use attendance_core::AuthService;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub records: Arc<dyn RecordsQuery>,
    pub sessions: Arc<dyn SessionStore>,
    pub config: Arc<Config>,
}
