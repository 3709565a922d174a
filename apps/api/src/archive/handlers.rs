use axum::{
    extract::{Path, State},
    Json,
};

use crate::archive::find_evaluation;
use crate::errors::AppError;
use crate::models::evaluation::EvaluationRow;
use crate::state::AppState;

/// GET /api/v1/evaluations/:evaluation_id
///
/// Returns the archived evaluation row, including the S3 keys of its report artifacts.
pub async fn handle_get_evaluation(
    State(state): State<AppState>,
    Path(evaluation_id): Path<String>,
) -> Result<Json<EvaluationRow>, AppError> {
    let row = find_evaluation(&state.db, &evaluation_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Evaluation {evaluation_id} not found")))?;

    Ok(Json(row))
}
