use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One archived interview evaluation. `body` holds the full evaluation document.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EvaluationRow {
    pub id: Uuid,
    pub evaluation_id: String,
    pub session_id: Uuid,
    pub candidate_name: String,
    pub target_role: String,
    pub overall_score: f64,
    pub overall_rating: String,
    pub hiring_decision: String,
    pub body: Value,
    pub artifact_keys: Vec<String>,
    pub created_at: DateTime<Utc>,
}
