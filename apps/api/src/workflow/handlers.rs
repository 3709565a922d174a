//! Axum route handlers for the Interview API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::archive::{archive_evaluation, ArchiveReceipt};
use crate::errors::AppError;
use crate::evaluation::Evaluation;
use crate::guardrails::GuardrailAction;
use crate::interview::{InterviewSession, Stage};
use crate::state::AppState;
use crate::workflow::messages::HELP_MESSAGE;
use crate::workflow::{Command, SessionSummary, TurnOutcome, TurnStatus};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct StartInterviewRequest {
    #[serde(default)]
    pub candidate_name: String,
    #[serde(default)]
    pub target_role: String,
}

#[derive(Debug, Serialize)]
pub struct StartInterviewResponse {
    pub session_id: Uuid,
    pub candidate_name: String,
    pub target_role: String,
    pub stage: Stage,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub outcome: TurnOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<ArchiveReceipt>,
}

#[derive(Debug, Serialize)]
pub struct HintResponse {
    pub session_id: Uuid,
    pub hint: String,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub action: GuardrailAction,
}

#[derive(Debug, Serialize)]
pub struct EndInterviewResponse {
    pub session_id: Uuid,
    pub message: String,
    pub evaluation: Option<Evaluation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<ArchiveReceipt>,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn load_session(state: &AppState, session_id: Uuid) -> Result<InterviewSession, AppError> {
    state
        .sessions
        .get(session_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview session {session_id} not found")))
}

async fn archive(state: &AppState, session_id: Uuid, evaluation: &Evaluation) -> ArchiveReceipt {
    archive_evaluation(
        &state.db,
        &state.s3,
        &state.config.s3_bucket,
        session_id,
        evaluation,
    )
    .await
}

fn command_outcome(session: &InterviewSession, message: String) -> TurnOutcome {
    TurnOutcome {
        status: TurnStatus::Success,
        message,
        stage: session.stage,
        interview_complete: session.complete,
        evaluation: None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interviews
///
/// Opens a new interview session and returns the interviewer's greeting.
pub async fn handle_start_interview(
    State(state): State<AppState>,
    Json(request): Json<StartInterviewRequest>,
) -> Result<(StatusCode, Json<StartInterviewResponse>), AppError> {
    let (session, message) = state
        .workflow
        .start(&request.candidate_name, &request.target_role);
    state.sessions.put(&session).await?;

    Ok((
        StatusCode::CREATED,
        Json(StartInterviewResponse {
            session_id: session.id,
            candidate_name: session.candidate_name,
            target_role: session.target_role,
            stage: session.stage,
            message,
        }),
    ))
}

/// POST /api/v1/interviews/:id/messages
///
/// Runs one candidate message through the workflow. `hint` and `help` are answered
/// directly. When the turn finishes the interview the evaluation is archived.
pub async fn handle_message(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let mut session = load_session(&state, session_id).await?;

    let outcome = match Command::parse(&request.message) {
        Some(Command::Help) => command_outcome(&session, HELP_MESSAGE.to_string()),
        Some(Command::Hint) => {
            let hint = state.workflow.hint(&mut session).await?;
            command_outcome(&session, hint)
        }
        None => {
            state
                .workflow
                .process_message(&mut session, &request.message)
                .await?
        }
    };
    state.sessions.put(&session).await?;

    let archive = match &outcome.evaluation {
        Some(evaluation) => Some(archive(&state, session_id, evaluation).await),
        None => None,
    };

    Ok(Json(MessageResponse {
        session_id,
        outcome,
        archive,
    }))
}

/// POST /api/v1/interviews/:id/hint
pub async fn handle_hint(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<HintResponse>, AppError> {
    let mut session = load_session(&state, session_id).await?;
    let hint = state.workflow.hint(&mut session).await?;
    state.sessions.put(&session).await?;

    Ok(Json(HintResponse { session_id, hint }))
}

/// POST /api/v1/interviews/:id/reset
///
/// Restarts the conversation tone. Counts against the redirect budget.
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ResetResponse>, AppError> {
    let mut session = load_session(&state, session_id).await?;
    let action = state.workflow.reset(&mut session)?;
    state.sessions.put(&session).await?;

    Ok(Json(ResetResponse { session_id, action }))
}

/// POST /api/v1/interviews/:id/end
///
/// Ends the interview early and evaluates it. Idempotent: an ended session
/// returns its stored evaluation without archiving again.
pub async fn handle_end_interview(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<EndInterviewResponse>, AppError> {
    let mut session = load_session(&state, session_id).await?;
    let already_complete = session.complete;

    let outcome = state.workflow.end(&mut session).await;
    state.sessions.put(&session).await?;

    let archive = match (&outcome.evaluation, already_complete) {
        (Some(evaluation), false) => Some(archive(&state, session_id, evaluation).await),
        _ => None,
    };

    info!(%session_id, evaluated = outcome.evaluation.is_some(), "Interview end requested");

    Ok(Json(EndInterviewResponse {
        session_id,
        message: outcome.message,
        evaluation: outcome.evaluation,
        archive,
    }))
}

/// GET /api/v1/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSummary>, AppError> {
    let session = load_session(&state, session_id).await?;
    Ok(Json(state.workflow.summary(&session)))
}

/// GET /api/v1/interviews/:id/evaluation
pub async fn handle_get_session_evaluation(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Evaluation>, AppError> {
    let session = load_session(&state, session_id).await?;
    session
        .evaluation
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Interview {session_id} has no evaluation yet")))
}
