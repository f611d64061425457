//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the production router (same middleware stack as `main.rs`) over
//! an `#[sqlx::test]` pool, plus request/response convenience wrappers.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use formbase_airtable::AirtableClient;
use formbase_api::auth::jwt::{generate_token, JwtConfig};
use formbase_api::config::{AirtableConfig, ServerConfig};
use formbase_api::router::build_app_router;
use formbase_api::state::AppState;
use formbase_core::submission::SubmissionPolicy;
use formbase_core::types::DbId;
use formbase_db::models::user::{UpsertUser, User};
use formbase_db::repositories::UserRepo;

/// Secret used to sign test session tokens.
const TEST_JWT_SECRET: &str = "integration-test-secret-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
///
/// The Airtable endpoints point at an unroutable origin; tests only cover
/// paths that never reach the external API.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            token_expiry_mins: 60,
        },
        airtable: AirtableConfig {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            redirect_uri: "http://localhost:3000/api/v1/auth/callback".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
            meta_base: "http://127.0.0.1:9".to_string(),
        },
        submission_policy: SubmissionPolicy::default(),
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let airtable = Arc::new(AirtableClient::with_bases(
        config.airtable.api_base.clone(),
        config.airtable.meta_base.clone(),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        airtable,
    };

    build_app_router(state, &config)
}

/// Insert an owner row directly and return it.
pub async fn seed_owner(pool: &PgPool, airtable_user_id: &str) -> User {
    UserRepo::upsert_by_airtable_id(
        pool,
        &UpsertUser {
            airtable_user_id: airtable_user_id.to_string(),
            access_token: "seeded-access-token".to_string(),
            refresh_token: "seeded-refresh-token".to_string(),
            token_expires_at: None,
        },
    )
    .await
    .expect("seeding owner should succeed")
}

/// Issue a session token for the given owner, signed with the test secret.
pub fn auth_token(user_id: DbId) -> String {
    let config = JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        token_expiry_mins: 60,
    };
    generate_token(user_id, &config).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
