pub mod auth;
pub mod forms;
pub mod health;
pub mod meta;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login               start OAuth login (public)
/// /auth/callback            OAuth redirect target (public)
/// /auth/me                  current owner profile
///
/// /meta/bases                                    list bases
/// /meta/bases/{base}/tables                      list tables
/// /meta/bases/{base}/tables/{table}/fields       list bindable fields
///
/// /forms                    list, create
/// /forms/{id}               get, update, delete
/// /forms/{id}/public        anonymous form fetch
/// /forms/{id}/visibility    anonymous visibility evaluation (POST)
/// /forms/{id}/submit        anonymous submission (POST, multipart)
/// /forms/{id}/responses     owner response listing
/// /forms/{id}/analytics     owner aggregate stats
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Airtable OAuth login and session info.
        .nest("/auth", auth::router())
        // Schema browsing for the form builder.
        .nest("/meta", meta::router())
        // Form CRUD plus the anonymous respondent endpoints.
        .nest("/forms", forms::router())
}
