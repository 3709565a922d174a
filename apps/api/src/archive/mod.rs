//! Archival of finished evaluations: one Postgres row plus four report artifacts in S3.
//!
//! Archiving is best effort. Failures are logged and reported back to the caller,
//! the evaluation itself is already stored on the session.

pub mod handlers;

use anyhow::{Context, Result};
use aws_sdk_s3::primitives::ByteStream;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::evaluation::{report, Evaluation};
use crate::models::evaluation::EvaluationRow;

const KEY_PREFIX: &str = "evaluations";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Detailed,
    Summary,
    Metrics,
    Transcript,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Detailed,
        ArtifactKind::Summary,
        ArtifactKind::Metrics,
        ArtifactKind::Transcript,
    ];

    fn suffix(&self) -> &'static str {
        match self {
            ArtifactKind::Detailed => "detailed.json",
            ArtifactKind::Summary => "summary.txt",
            ArtifactKind::Metrics => "metrics.csv",
            ArtifactKind::Transcript => "transcript.txt",
        }
    }

    fn content_type(&self) -> &'static str {
        match self {
            ArtifactKind::Detailed => "application/json",
            ArtifactKind::Summary | ArtifactKind::Transcript => "text/plain; charset=utf-8",
            ArtifactKind::Metrics => "text/csv",
        }
    }

    fn render(&self, evaluation: &Evaluation) -> Result<String> {
        Ok(match self {
            ArtifactKind::Detailed => report::detailed_json(evaluation)
                .context("Failed to serialize evaluation to JSON")?,
            ArtifactKind::Summary => report::comprehensive_summary(evaluation),
            ArtifactKind::Metrics => report::csv_metrics(evaluation),
            ArtifactKind::Transcript => report::transcript(evaluation),
        })
    }
}

/// `evaluations/<candidate>_<timestamp>_<evaluation_id>_<kind>.<ext>`
pub fn artifact_key(evaluation: &Evaluation, kind: ArtifactKind) -> String {
    let candidate = match evaluation.candidate_name.trim() {
        "" => "Unknown".to_string(),
        name => name.replace(' ', "_"),
    };
    format!(
        "{KEY_PREFIX}/{candidate}_{}_{}_{}",
        evaluation.timestamp.format("%Y%m%d_%H%M%S"),
        evaluation.evaluation_id,
        kind.suffix()
    )
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ArchiveReceipt {
    pub row_id: Option<Uuid>,
    pub artifact_keys: Vec<String>,
    pub errors: Vec<String>,
}

/// Uploads the artifacts, then records the evaluation row. Never fails.
pub async fn archive_evaluation(
    pool: &PgPool,
    s3: &aws_sdk_s3::Client,
    s3_bucket: &str,
    session_id: Uuid,
    evaluation: &Evaluation,
) -> ArchiveReceipt {
    let mut receipt = ArchiveReceipt::default();

    for kind in ArtifactKind::ALL {
        match upload_artifact(s3, s3_bucket, evaluation, kind).await {
            Ok(key) => receipt.artifact_keys.push(key),
            Err(e) => {
                warn!(evaluation_id = %evaluation.evaluation_id, "Artifact upload failed: {e:#}");
                receipt.errors.push(format!("{e:#}"));
            }
        }
    }

    match insert_evaluation(pool, session_id, evaluation, &receipt.artifact_keys).await {
        Ok(id) => receipt.row_id = Some(id),
        Err(e) => {
            warn!(evaluation_id = %evaluation.evaluation_id, "Evaluation insert failed: {e:#}");
            receipt.errors.push(format!("{e:#}"));
        }
    }

    receipt
}

async fn upload_artifact(
    s3: &aws_sdk_s3::Client,
    s3_bucket: &str,
    evaluation: &Evaluation,
    kind: ArtifactKind,
) -> Result<String> {
    let key = artifact_key(evaluation, kind);
    let body = kind.render(evaluation)?;

    s3.put_object()
        .bucket(s3_bucket)
        .key(&key)
        .body(ByteStream::from(body.into_bytes()))
        .content_type(kind.content_type())
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("S3 upload of {key} failed: {e}"))?;

    info!("Uploaded evaluation artifact to s3://{s3_bucket}/{key}");
    Ok(key)
}

pub async fn insert_evaluation(
    pool: &PgPool,
    session_id: Uuid,
    evaluation: &Evaluation,
    artifact_keys: &[String],
) -> Result<Uuid> {
    let id = Uuid::new_v4();
    let body = serde_json::to_value(evaluation).context("Failed to encode evaluation body")?;

    sqlx::query(
        r#"
        INSERT INTO interview_evaluations
            (id, evaluation_id, session_id, candidate_name, target_role,
             overall_score, overall_rating, hiring_decision, body, artifact_keys)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(id)
    .bind(&evaluation.evaluation_id)
    .bind(session_id)
    .bind(&evaluation.candidate_name)
    .bind(&evaluation.target_role)
    .bind(evaluation.overall_score)
    .bind(evaluation.overall_rating.as_str())
    .bind(&evaluation.recommendations.hiring_decision)
    .bind(body)
    .bind(artifact_keys)
    .execute(pool)
    .await?;

    info!(
        evaluation_id = %evaluation.evaluation_id,
        %session_id,
        "Archived evaluation"
    );
    Ok(id)
}

/// Latest archived row for an evaluation id.
pub async fn find_evaluation(
    pool: &PgPool,
    evaluation_id: &str,
) -> Result<Option<EvaluationRow>, sqlx::Error> {
    sqlx::query_as::<_, EvaluationRow>(
        "SELECT * FROM interview_evaluations WHERE evaluation_id = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(evaluation_id)
    .fetch_optional(pool)
    .await
}
