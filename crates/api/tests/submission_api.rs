//! Integration tests for the anonymous submission endpoint's validation
//! gate.
//!
//! Rejections happen strictly before any external write, so these run
//! without a reachable Airtable endpoint; accepted submissions (which fan
//! out external writes) are covered by the core unit tests plus the
//! Airtable client tests.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{auth_token, body_json, build_test_app, post_json, post_json_auth, seed_owner};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

/// Create a form with a required `age` number question plus a conditional
/// required `shade` and return its id.
async fn seed_form(app: axum::Router, token: &str) -> i64 {
    let body = json!({
        "name": "Gated survey",
        "base_id": "appBase1",
        "table_id": "tblTable1",
        "questions": [
            {
                "questionKey": "age",
                "airtableFieldId": "fldAge",
                "label": "Age",
                "type": "number",
                "required": true
            },
            {
                "questionKey": "color",
                "airtableFieldId": "fldColor",
                "label": "Color",
                "type": "singleSelect",
                "required": false,
                "options": ["red", "blue"]
            },
            {
                "questionKey": "shade",
                "airtableFieldId": "fldShade",
                "label": "Shade",
                "type": "singleLineText",
                "required": true,
                "conditionalRules": {
                    "logic": "AND",
                    "conditions": [
                        { "questionKey": "color", "operator": "equals", "value": "blue" }
                    ]
                }
            }
        ]
    });
    let response = post_json_auth(app, "/api/v1/forms", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Test: missing required answer is rejected with the offending keys
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_submit_missing_required_returns_422(pool: PgPool) {
    let owner = seed_owner(&pool, "owner-a").await;
    let token = auth_token(owner.id);
    let app = build_test_app(pool.clone());
    let form_id = seed_form(app.clone(), &token).await;

    let response = post_json(
        app,
        &format!("/api/v1/forms/{form_id}/submit"),
        json!({ "answers": {} }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["code"], "MISSING_REQUIRED_FIELDS");
    assert_eq!(json["missing_required_keys"], json!(["age"]));

    // A rejection persists nothing.
    let count: i64 = sqlx::query_scalar("SELECT count(*) FROM form_responses")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

// ---------------------------------------------------------------------------
// Test: a required number answered with 0 still counts as missing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_submit_zero_counts_as_missing(pool: PgPool) {
    let owner = seed_owner(&pool, "owner-a").await;
    let token = auth_token(owner.id);
    let app = build_test_app(pool);
    let form_id = seed_form(app.clone(), &token).await;

    let response = post_json(
        app,
        &format!("/api/v1/forms/{form_id}/submit"),
        json!({ "answers": { "age": 0 } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["missing_required_keys"], json!(["age"]));
}

// ---------------------------------------------------------------------------
// Test: a hidden required question does not block, a revealed one does
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_submit_conditional_required_gate(pool: PgPool) {
    let owner = seed_owner(&pool, "owner-a").await;
    let token = auth_token(owner.id);
    let app = build_test_app(pool);
    let form_id = seed_form(app.clone(), &token).await;
    let uri = format!("/api/v1/forms/{form_id}/submit");

    // color=blue reveals shade; unanswered shade blocks.
    let response = post_json(
        app.clone(),
        &uri,
        json!({ "answers": { "age": 30, "color": "blue" } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["missing_required_keys"], json!(["shade"]));

    // color=red hides shade entirely; only the upstream write failing (no
    // reachable Airtable in tests) stops this submission, proving the
    // validation gate itself passed.
    let response = post_json(app, &uri, json!({ "answers": { "age": 30, "color": "red" } })).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

// ---------------------------------------------------------------------------
// Test: multipart rejection path
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_submit_multipart_missing_required_returns_422(pool: PgPool) {
    let owner = seed_owner(&pool, "owner-a").await;
    let token = auth_token(owner.id);
    let app = build_test_app(pool);
    let form_id = seed_form(app.clone(), &token).await;

    let boundary = "----formbase-test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"answers\"\r\n\r\n\
         {{}}\r\n\
         --{boundary}--\r\n"
    );

    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/v1/forms/{form_id}/submit"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["code"], "MISSING_REQUIRED_FIELDS");
}

// ---------------------------------------------------------------------------
// Test: unknown form returns 404 before anything else
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_submit_unknown_form_returns_404(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(app, "/api/v1/forms/9999/submit", json!({ "answers": {} })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
