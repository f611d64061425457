//! Handlers for form CRUD, the anonymous public fetch, and incremental
//! visibility evaluation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use formbase_core::error::CoreError;
use formbase_core::form::AnswerSet;
use formbase_core::types::{DbId, Timestamp};
use formbase_core::visibility::visible_questions;
use formbase_db::models::form::{CreateForm, Form, UpdateForm};
use formbase_db::repositories::FormRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/forms
///
/// Create a form. The question list is validated structurally (unique keys,
/// rules referencing only earlier questions, select types carrying options)
/// before anything is stored; a malformed definition is a 400.
pub async fn create_form(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateForm>,
) -> AppResult<(StatusCode, Json<DataResponse<Form>>)> {
    check_definition(&input.questions)?;

    let form = FormRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(form_id = form.id, owner_id = user.user_id, "Form created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: form })))
}

/// GET /api/v1/forms
///
/// List the authenticated owner's forms, most recent first.
pub async fn list_forms(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Form>>>> {
    let forms = FormRepo::list_by_owner(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: forms }))
}

/// GET /api/v1/forms/{id}
pub async fn get_form(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Form>>> {
    let form = load_owned_form(&state, id, user.user_id).await?;
    Ok(Json(DataResponse { data: form }))
}

/// PUT /api/v1/forms/{id}
///
/// Update a form's name and/or question list. A replacement question list
/// goes through the same structural validation as create.
pub async fn update_form(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateForm>,
) -> AppResult<Json<DataResponse<Form>>> {
    // Ownership check before any write.
    load_owned_form(&state, id, user.user_id).await?;

    if let Some(questions) = &input.questions {
        check_definition(questions)?;
    }

    let form = FormRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Form",
            id,
        }))?;
    tracing::info!(form_id = id, "Form updated");
    Ok(Json(DataResponse { data: form }))
}

/// DELETE /api/v1/forms/{id}
///
/// Delete a form and (via FK cascade) its collected responses.
pub async fn delete_form(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_owned_form(&state, id, user.user_id).await?;

    let deleted = FormRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(form_id = id, "Form deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Form",
            id,
        }))
    }
}

/// The anonymous rendering view of a form: no owner or Airtable linkage.
#[derive(Debug, Serialize)]
pub struct PublicForm {
    pub id: DbId,
    pub name: String,
    pub questions: serde_json::Value,
    pub created_at: Timestamp,
}

/// GET /api/v1/forms/{id}/public
///
/// Anonymous fetch of a form for rendering. Exposes only what a respondent
/// needs; base/table ids and the owner stay private.
pub async fn get_public_form(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PublicForm>>> {
    let form = FormRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Form",
            id,
        }))?;

    Ok(Json(DataResponse {
        data: PublicForm {
            id: form.id,
            name: form.name,
            questions: form.questions,
            created_at: form.created_at,
        },
    }))
}

/// POST /api/v1/forms/{id}/visibility
///
/// Anonymous incremental evaluation: the body is the respondent's
/// in-progress answer set, the response is the keys of the questions that
/// should currently be shown. Runs the same evaluator as submit, so the
/// renderer and the server can never disagree.
pub async fn check_visibility(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(answers): Json<AnswerSet>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let form = FormRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Form",
            id,
        }))?;
    let questions = parse_questions(&form)?;

    let visible: Vec<String> = visible_questions(&questions, &answers)
        .into_iter()
        .map(|q| q.question_key.clone())
        .collect();

    Ok(Json(DataResponse { data: visible }))
}

/// Load a form and verify the caller owns it. 404 when absent, 403 when
/// owned by someone else.
pub(crate) async fn load_owned_form(
    state: &AppState,
    id: DbId,
    owner_id: DbId,
) -> AppResult<Form> {
    let form = FormRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Form",
            id,
        }))?;

    if form.owner_id != owner_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this form".into(),
        )));
    }
    Ok(form)
}

/// Deserialize a form's stored question list, treating corruption as a
/// server-side error.
pub(crate) fn parse_questions(
    form: &Form,
) -> AppResult<Vec<formbase_core::form::Question>> {
    form.parsed_questions().map_err(|e| {
        tracing::error!(form_id = form.id, error = %e, "Stored question list failed to parse");
        AppError::InternalError("Stored form definition is invalid".into())
    })
}

/// Run structural validation over a question list, collapsing the collected
/// errors into one 400 message.
fn check_definition(questions: &[formbase_core::form::Question]) -> AppResult<()> {
    formbase_core::definition::validate_definition(questions).map_err(|errors| {
        let message = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        AppError::Core(CoreError::Validation(message))
    })
}
