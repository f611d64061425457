//! Route definitions for the `/meta` schema-browsing resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::meta;
use crate::state::AppState;

/// Routes mounted at `/meta` (all require auth).
///
/// ```text
/// GET /bases                                    -> list_bases
/// GET /bases/{base_id}/tables                   -> list_tables
/// GET /bases/{base_id}/tables/{table_id}/fields -> list_fields
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bases", get(meta::list_bases))
        .route("/bases/{base_id}/tables", get(meta::list_tables))
        .route(
            "/bases/{base_id}/tables/{table_id}/fields",
            get(meta::list_fields),
        )
}
