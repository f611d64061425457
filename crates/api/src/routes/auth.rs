//! Route definitions for the `/auth` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::oauth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// GET /login     -> login     (redirect to Airtable, public)
/// GET /callback  -> callback  (OAuth redirect target, public)
/// GET /me        -> me        (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(oauth::login))
        .route("/callback", get(oauth::callback))
        .route("/me", get(oauth::me))
}
