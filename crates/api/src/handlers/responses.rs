//! Handlers for the owner's view of collected submissions.

use axum::extract::{Path, State};
use axum::Json;

use formbase_core::analytics::{summarize, FormAnalytics};
use formbase_core::form::AnswerSet;
use formbase_core::types::{DbId, Timestamp};
use formbase_db::models::response::FormResponse;
use formbase_db::repositories::ResponseRepo;

use crate::error::AppResult;
use crate::handlers::forms::{load_owned_form, parse_questions};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/forms/{id}/responses
///
/// List a form's collected responses, oldest first. Responses whose
/// Airtable record was deleted upstream are excluded.
pub async fn list_responses(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<FormResponse>>>> {
    load_owned_form(&state, id, user.user_id).await?;
    let responses = ResponseRepo::list_for_form(&state.pool, id).await?;
    Ok(Json(DataResponse { data: responses }))
}

/// GET /api/v1/forms/{id}/analytics
///
/// Aggregate statistics over a form's responses: totals, a seven-day
/// recent count, and per-question response/distinct-value counts.
pub async fn form_analytics(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<FormAnalytics>>> {
    let form = load_owned_form(&state, id, user.user_id).await?;
    let questions = parse_questions(&form)?;

    let rows = ResponseRepo::list_for_form(&state.pool, id).await?;
    let samples: Vec<(Timestamp, AnswerSet)> = rows
        .into_iter()
        .map(|r| {
            let answers = match r.answers {
                serde_json::Value::Object(map) => map,
                _ => AnswerSet::new(),
            };
            (r.created_at, answers)
        })
        .collect();

    let analytics = summarize(&questions, &samples, chrono::Utc::now());
    Ok(Json(DataResponse { data: analytics }))
}
