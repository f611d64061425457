//! Route definitions for the `/forms` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{forms, responses, submissions};
use crate::state::AppState;

/// Uploads ride inside the submit body as multipart parts.
const MAX_SUBMISSION_BYTES: usize = 10 * 1024 * 1024;

/// Routes mounted at `/forms`.
///
/// ```text
/// GET    /                  -> list_forms        (owner)
/// POST   /                  -> create_form       (owner)
/// GET    /{id}              -> get_form          (owner)
/// PUT    /{id}              -> update_form       (owner)
/// DELETE /{id}              -> delete_form       (owner)
/// GET    /{id}/public       -> get_public_form   (anonymous)
/// POST   /{id}/visibility   -> check_visibility  (anonymous)
/// POST   /{id}/submit       -> submit            (anonymous, multipart)
/// GET    /{id}/responses    -> list_responses    (owner)
/// GET    /{id}/analytics    -> form_analytics    (owner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(forms::list_forms).post(forms::create_form))
        .route(
            "/{id}",
            get(forms::get_form)
                .put(forms::update_form)
                .delete(forms::delete_form),
        )
        .route("/{id}/public", get(forms::get_public_form))
        .route("/{id}/visibility", post(forms::check_visibility))
        .route(
            "/{id}/submit",
            post(submissions::submit).layer(DefaultBodyLimit::max(MAX_SUBMISSION_BYTES)),
        )
        .route("/{id}/responses", get(responses::list_responses))
        .route("/{id}/analytics", get(responses::form_analytics))
}
