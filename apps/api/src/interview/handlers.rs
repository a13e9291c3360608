//! Axum handler for the interview turn endpoint.

use axum::{extract::State, Json};
use tracing::debug;

use crate::errors::AppError;
use crate::interview::conversation::{clamp_text, normalize};
use crate::interview::prompt::{compose, PromptParams};
use crate::interview::retrieval::retrieve;
use crate::interview::session::{InterviewRequest, InterviewResponse};
use crate::llm_client::invoker::invoke;
use crate::state::AppState;

/// Bound on the job description and resume fed into the prompt.
const MAX_DOCUMENT_CHARS: usize = 3000;
/// Minimum trimmed job-description length for a usable session.
const MIN_JOB_DESCRIPTION_CHARS: usize = 40;

/// POST /api/interview
///
/// Validation order is fixed: content checks run before the credential check.
/// Content validation is free and a misconfigured server should not be
/// reported to a caller who sent an unusable payload anyway.
pub async fn handle_interview(
    State(state): State<AppState>,
    Json(req): Json<InterviewRequest>,
) -> Result<Json<InterviewResponse>, AppError> {
    let job_description = req.job_description.trim();
    if job_description.chars().count() < MIN_JOB_DESCRIPTION_CHARS {
        return Err(AppError::Validation(
            "Please provide a fuller job description.".to_string(),
        ));
    }
    if !state.credentials.has_key() {
        return Err(AppError::Validation(
            "Gemini API key is not set.".to_string(),
        ));
    }

    let job_description = clamp_text(job_description, MAX_DOCUMENT_CHARS);
    let resume = clamp_text(&req.resume, MAX_DOCUMENT_CHARS);
    let target_role = req.target_role.trim();
    let experience_level = req.experience_level.trim();

    let retrieved = retrieve(
        &state.knowledge,
        &job_description,
        &req.focus_areas,
        req.mode,
        target_role,
    );
    debug!(
        "turn: mode={}, snippets={}, history_len={}",
        req.mode,
        retrieved.len(),
        req.history.len()
    );

    let system_prompt = compose(
        &PromptParams {
            job_description: &job_description,
            resume: &resume,
            mode: req.mode,
            experience_level,
            focus_areas: &req.focus_areas,
            target_role,
            questions_remaining: req.questions_remaining,
        },
        &retrieved,
    );
    let messages = normalize(&req.history, &req.directive);

    let text = invoke(
        state.backend.as_ref(),
        &state.credentials,
        &system_prompt,
        &messages,
    )
    .await?;

    Ok(Json(InterviewResponse { text }))
}
