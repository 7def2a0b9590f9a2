//! Shared harness for the portal integration tests: an in-memory SQLite store
//! with the deployed schema, and helpers to drive the router in-process.

#![allow(dead_code)]

use argon2::Params;
use attendance_core::AuthService;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use chrono::Duration;
use http_body_util::BodyExt;
use portal_lib::adapters::{Argon2Hasher, DbAdapter, MemorySessionStore};
use portal_lib::config::Config;
use portal_lib::web::{build_router, AppState};
use serde::de::DeserializeOwned;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tower::ServiceExt;
use tracing::Level;

pub const SCHEMA: &str = r#"
CREATE TABLE utilisateurs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL,
    mot_de_passe TEXT NOT NULL
);
CREATE TABLE Presences (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nom_etudiant TEXT NOT NULL,
    nom_matiere TEXT NOT NULL,
    date_absence TEXT NOT NULL,
    statut_absence TEXT NOT NULL
);
CREATE TABLE Notes (
    nom_etudiant TEXT,
    nom_matiere TEXT,
    note REAL,
    coefficient INTEGER
);
"#;

pub const SEED: &str = r#"
INSERT INTO Presences (nom_etudiant, nom_matiere, date_absence, statut_absence) VALUES
    ('Awa Diop', 'Algorithmique', '2023-01-09', 'absent'),
    ('Awa Diop', 'Algorithmique', '2023-01-16', 'absent'),
    ('Awa Diop', 'Réseaux', '2023-01-10', 'présent'),
    ('Moussa Fall', 'Algorithmique', '2023-01-09', 'présent'),
    ('Moussa Fall', 'Réseaux', '2023-01-10', 'absent'),
    ('Moussa Fall', 'Réseaux', '2023-01-17', 'en retard');
INSERT INTO Notes (nom_etudiant, nom_matiere, note, coefficient) VALUES
    ('Awa Diop', 'Algorithmique', 15.5, 3),
    ('Moussa Fall', 'Réseaux', 12.0, 2),
    ('Moussa Fall', 'Algorithmique', NULL, 3);
"#;

pub struct TestApp {
    pub router: Router,
    pub db: DbAdapter,
    pub sessions: Arc<MemorySessionStore>,
}

/// One connection that never expires, so the in-memory database lives as long as the pool.
pub async fn memory_db() -> DbAdapter {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    sqlx::raw_sql(SCHEMA).execute(&pool).await.expect("schema");
    DbAdapter::new(pool)
}

pub async fn seeded_db() -> DbAdapter {
    let db = memory_db().await;
    sqlx::raw_sql(SEED).execute(db.pool()).await.expect("seed");
    db
}

pub fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: "sqlite::memory:".to_string(),
        database_max_connections: 1,
        log_level: Level::DEBUG,
        session_ttl: Duration::minutes(30),
        cookie_secure: false,
    }
}

/// Argon2id with minimal costs; verification still reads costs from the PHC string.
pub fn fast_hasher() -> Arc<Argon2Hasher> {
    Arc::new(Argon2Hasher::new(Params::new(256, 1, 1, None).unwrap()))
}

pub async fn spawn_app() -> TestApp {
    app_with(seeded_db().await, test_config())
}

pub fn app_with(db: DbAdapter, config: Config) -> TestApp {
    let shared = Arc::new(db.clone());
    let sessions = Arc::new(MemorySessionStore::new());
    let auth = Arc::new(AuthService::new(shared.clone(), fast_hasher()).unwrap());
    let state = Arc::new(AppState {
        auth,
        records: shared,
        sessions: sessions.clone(),
        config: Arc::new(config),
    });
    TestApp {
        router: build_router(state),
        db,
        sessions,
    }
}

pub async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// The `name=value` pair of the `Set-Cookie` header, ready to send back.
pub fn cookie_pair(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub async fn register(
    app: &TestApp,
    email: &str,
    password: &str,
    confirm: &str,
) -> Response<Body> {
    let body = format!(
        "email={}&password={}&confirm_password={}",
        encode(email),
        encode(password),
        encode(confirm)
    );
    send(app, post_form("/inscription", &body, None)).await
}

pub async fn login(app: &TestApp, email: &str, password: &str) -> Response<Body> {
    let body = format!("email={}&password={}", encode(email), encode(password));
    send(app, post_form("/connexion", &body, None)).await
}

/// Registers and logs in, returning the cookie to send on later requests.
pub async fn logged_in(app: &TestApp) -> String {
    register(app, "a@x.com", "pw123", "pw123").await;
    let response = login(app, "a@x.com", "pw123").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    cookie_pair(&response).expect("session cookie")
}

fn encode(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('@', "%40")
        .replace('&', "%26")
        .replace('+', "%2B")
        .replace(' ', "+")
}
