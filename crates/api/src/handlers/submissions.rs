//! The anonymous submission endpoint.
//!
//! Validation happens strictly before any side effect: a rejected
//! submission performs no external writes and persists nothing. Accepted
//! submissions fan out one scalar record write plus one attachment write
//! per uploaded file, all concurrent, then join before anything is stored
//! locally.

use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::{header, StatusCode};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::json;

use formbase_airtable::AirtableError;
use formbase_core::form::AnswerSet;
use formbase_core::submission::{
    check_submission, SubmissionCheck, SubmissionPlan, ATTACHMENT_ONLY_RECORD_ID,
};
use formbase_core::types::DbId;
use formbase_db::models::response::CreateResponse;
use formbase_db::repositories::{FormRepo, ResponseRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::forms::parse_questions;
use crate::handlers::meta::owner_access_token;
use crate::response::DataResponse;
use crate::state::AppState;

/// One uploaded file, pulled out of the multipart body.
struct UploadedFile {
    question_key: String,
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// JSON body shape for file-less submissions.
#[derive(Debug, Deserialize)]
struct JsonSubmission {
    answers: AnswerSet,
}

/// What the respondent gets back on acceptance.
#[derive(Debug, Serialize)]
pub struct SubmitOutcome {
    pub response_id: DbId,
    /// Airtable record id, or `file-upload-only` when no scalar record was
    /// written.
    pub record_id: String,
    /// Attachment question keys whose external write failed. Non-empty
    /// means degraded success.
    pub failed_attachments: Vec<String>,
}

/// POST /api/v1/forms/{id}/submit
///
/// Accepts either `multipart/form-data` (an `answers` JSON part plus file
/// parts named by question key) or a plain JSON `{ "answers": ... }` body
/// when no files are involved.
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    request: Request,
) -> AppResult<(StatusCode, Json<DataResponse<SubmitOutcome>>)> {
    let form = FormRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(formbase_core::error::CoreError::NotFound {
            entity: "Form",
            id,
        }))?;
    let questions = parse_questions(&form)?;

    let (mut answers, files) = read_submission_body(request).await?;

    // Uploaded files double as the answers to their attachment questions so
    // the required check sees them; the stored answer is the filename.
    for file in &files {
        answers.insert(file.question_key.clone(), json!(file.filename));
    }

    let plan = match check_submission(&questions, &answers, state.config.submission_policy) {
        SubmissionCheck::Accepted(plan) => plan,
        SubmissionCheck::Rejected {
            missing_required_keys,
        } => return Err(AppError::MissingRequired(missing_required_keys)),
    };

    let token = owner_access_token(&state, form.owner_id).await?;
    let (record_id, failed_attachments) = dispatch_writes(
        &state,
        &token,
        &form.airtable_base_id,
        &form.airtable_table_id,
        &plan,
        &files,
    )
    .await?;

    // Local persistence only after the external writes settled.
    let response = ResponseRepo::create(
        &state.pool,
        &CreateResponse {
            form_id: form.id,
            airtable_record_id: record_id.clone(),
            answers: serde_json::Value::Object(answers),
        },
    )
    .await?;

    tracing::info!(
        form_id = form.id,
        response_id = response.id,
        failed = failed_attachments.len(),
        "Submission accepted"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SubmitOutcome {
                response_id: response.id,
                record_id,
                failed_attachments,
            },
        }),
    ))
}

/// Fan out the external writes and join.
///
/// The scalar record (if any fields mapped) and every attachment write run
/// concurrently. Partial attachment failure is degraded success; total
/// failure of every attempted write surfaces the first error as a 502.
async fn dispatch_writes(
    state: &AppState,
    token: &str,
    base_id: &str,
    table_id: &str,
    plan: &SubmissionPlan,
    files: &[UploadedFile],
) -> AppResult<(String, Vec<String>)> {
    let scalar = async {
        if plan.fields.is_empty() {
            return None;
        }
        Some(
            state
                .airtable
                .create_record(token, base_id, table_id, &plan.fields)
                .await,
        )
    };

    let attachment_writes = plan.attachments.iter().filter_map(|slot| {
        let file = files.iter().find(|f| f.question_key == slot.question_key)?;
        let data_url = format!(
            "data:{};base64,{}",
            file.content_type,
            BASE64.encode(&file.bytes)
        );
        Some(async move {
            let result = state
                .airtable
                .create_attachment_record(
                    token,
                    base_id,
                    table_id,
                    &slot.airtable_field_id,
                    &data_url,
                    &file.filename,
                )
                .await;
            (slot.question_key.clone(), result)
        })
    });

    let (scalar_result, attachment_results) = tokio::join!(scalar, join_all(attachment_writes));

    let mut first_error: Option<AirtableError> = None;
    let mut successes = 0usize;
    let mut attempted = 0usize;

    let record_id = match scalar_result {
        Some(Ok(id)) => {
            successes += 1;
            attempted += 1;
            id
        }
        Some(Err(err)) => {
            attempted += 1;
            tracing::error!(error = %err, "Scalar record write failed");
            first_error = Some(err);
            ATTACHMENT_ONLY_RECORD_ID.to_string()
        }
        None => ATTACHMENT_ONLY_RECORD_ID.to_string(),
    };

    let mut failed_attachments = Vec::new();
    for (question_key, result) in attachment_results {
        attempted += 1;
        match result {
            Ok(_) => successes += 1,
            Err(err) => {
                tracing::error!(%question_key, error = %err, "Attachment write failed");
                first_error.get_or_insert(err);
                failed_attachments.push(question_key);
            }
        }
    }

    // Every attempted write failed: nothing reached the record store.
    if attempted > 0 && successes == 0 {
        if let Some(err) = first_error {
            return Err(AppError::Airtable(err));
        }
    }

    Ok((record_id, failed_attachments))
}

/// Read the request body as either multipart (answers part + files) or a
/// JSON submission.
async fn read_submission_body(request: Request) -> AppResult<(AnswerSet, Vec<UploadedFile>)> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false);

    if !is_multipart {
        let Json(body): Json<JsonSubmission> = Json::from_request(request, &())
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid submission body: {e}")))?;
        return Ok((body.answers, Vec::new()));
    }

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?;

    let mut answers = AnswerSet::new();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart field: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if field.file_name().is_some() {
            let filename = field
                .file_name()
                .map(str::to_string)
                .unwrap_or_else(|| "upload".to_string());
            let content_type = field
                .content_type()
                .map(str::to_string)
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
            files.push(UploadedFile {
                question_key: name,
                filename,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else if name == "answers" {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read answers: {e}")))?;
            answers = serde_json::from_str(&text)
                .map_err(|e| AppError::BadRequest(format!("Invalid answers JSON: {e}")))?;
        }
        // Unknown non-file parts are ignored.
    }

    Ok((answers, files))
}
