//! Registration, login, and logout through the HTTP surface.

mod common;

use axum::http::StatusCode;
use common::*;
use portal_lib::web::auth::{
    EMAIL_TAKEN, INVALID_CREDENTIALS, MISSING_FIELDS, PASSWORD_MISMATCH, REGISTERED,
};
use portal_lib::web::views::FormPage;
use rstest::rstest;

async fn user_rows(app: &TestApp) -> Vec<(String, String)> {
    sqlx::query_as("SELECT email, mot_de_passe FROM utilisateurs ORDER BY id")
        .fetch_all(app.db.pool())
        .await
        .unwrap()
}

#[tokio::test]
async fn register_then_login_scenario() {
    let app = spawn_app().await;

    let response = register(&app, "a@x.com", "pw123", "pw123").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json::<FormPage>(response).await,
        FormPage::registration(Some(REGISTERED))
    );

    let response = register(&app, "a@x.com", "pw123", "pw123").await;
    assert_eq!(
        body_json::<FormPage>(response).await,
        FormPage::registration(Some(EMAIL_TAKEN))
    );

    let response = login(&app, "a@x.com", "pw123").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/acceuil"));
    assert!(cookie_pair(&response).unwrap().starts_with("session="));

    let response = login(&app, "a@x.com", "wrong").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json::<FormPage>(response).await,
        FormPage::login(Some(INVALID_CREDENTIALS))
    );
}

#[tokio::test]
async fn duplicate_registration_leaves_store_untouched() {
    let app = spawn_app().await;
    register(&app, "a@x.com", "pw123", "pw123").await;
    let before = user_rows(&app).await;

    register(&app, "a@x.com", "another", "another").await;

    assert_eq!(user_rows(&app).await, before);
}

#[tokio::test]
async fn mismatched_confirmation_is_rejected() {
    let app = spawn_app().await;
    let response = register(&app, "a@x.com", "pw123", "pw321").await;
    assert_eq!(
        body_json::<FormPage>(response).await,
        FormPage::registration(Some(PASSWORD_MISMATCH))
    );
    assert!(user_rows(&app).await.is_empty());
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let app = spawn_app().await;
    let response = send(&app, post_form("/inscription", "email=a%40x.com", None)).await;
    assert_eq!(
        body_json::<FormPage>(response).await,
        FormPage::registration(Some(MISSING_FIELDS))
    );
    assert!(user_rows(&app).await.is_empty());
}

#[rstest]
#[case::unknown_email("b@x.com", "pw123")]
#[case::wrong_password("a@x.com", "pw1234")]
#[case::empty_password("a@x.com", "")]
#[case::other_case_email("A@X.COM", "pw123")]
#[tokio::test]
async fn bad_credentials_reshow_login_page(#[case] email: &str, #[case] password: &str) {
    let app = spawn_app().await;
    register(&app, "a@x.com", "pw123", "pw123").await;

    let response = login(&app, email, password).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(cookie_pair(&response).is_none());
    assert_eq!(
        body_json::<FormPage>(response).await,
        FormPage::login(Some(INVALID_CREDENTIALS))
    );
    assert!(app.sessions.is_empty().await);
}

#[tokio::test]
async fn stored_hashes_are_salted_and_not_plaintext() {
    let app = spawn_app().await;
    register(&app, "a@x.com", "pw123", "pw123").await;
    register(&app, "b@x.com", "pw123", "pw123").await;

    let rows = user_rows(&app).await;
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|(_, hash)| hash != "pw123"));
    assert!(rows.iter().all(|(_, hash)| hash.starts_with("$argon2id$")));
    assert_ne!(rows[0].1, rows[1].1);
}

#[tokio::test]
async fn login_pages_are_public() {
    let app = spawn_app().await;
    for path in ["/", "/connexion"] {
        let response = send(&app, get(path, None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json::<FormPage>(response).await, FormPage::login(None));
    }
    let response = send(&app, get("/inscription", None)).await;
    assert_eq!(
        body_json::<FormPage>(response).await,
        FormPage::registration(None)
    );
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let app = spawn_app().await;
    let cookie = logged_in(&app).await;

    let response = send(&app, get("/acceuil", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, post_form("/deconnexion", "", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));
    assert_eq!(cookie_pair(&response).as_deref(), Some("session="));
    assert!(app.sessions.is_empty().await);

    let response = send(&app, get("/acceuil", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));
}

#[tokio::test]
async fn logout_without_session_just_redirects() {
    let app = spawn_app().await;
    let response = send(&app, get("/deconnexion", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));
}

/// Seeds an account the way older deployments wrote it: a bcrypt hash stored as a BLOB.
async fn seed_legacy_user(app: &TestApp, email: &str, password: &str) {
    let hash = bcrypt::hash(password, 4).unwrap();
    sqlx::query("INSERT INTO utilisateurs (email, mot_de_passe) VALUES (?, CAST(? AS BLOB))")
        .bind(email)
        .bind(hash)
        .execute(app.db.pool())
        .await
        .unwrap();
}

#[tokio::test]
async fn legacy_bcrypt_account_can_log_in() {
    let app = spawn_app().await;
    seed_legacy_user(&app, "old@x.com", "legacy-pw").await;

    let response = login(&app, "old@x.com", "wrong").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json::<FormPage>(response).await,
        FormPage::login(Some(INVALID_CREDENTIALS))
    );

    let response = login(&app, "old@x.com", "legacy-pw").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/acceuil"));
}
