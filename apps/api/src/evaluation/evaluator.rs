//! Evaluator agent: one LLM analysis of the transcript, then deterministic scoring.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use super::models::{
    CriterionAnalysis, Evaluation, EvaluationMetadata, PerformanceAnalysis, Rating,
};
use super::prompts::{EVALUATION_PROMPT_TEMPLATE, EVALUATION_SYSTEM};
use super::scoring;
use crate::interview::models::InterviewSession;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{strip_json_fences, ChatModel, ChatRequest, ChatRole};

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 2048;
const CONTEXT_ENTRIES: usize = 20;
const ENTRY_CHARS: usize = 500;
const RESPONSE_CHARS: usize = 300;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("The candidate has not said anything yet, there is nothing to evaluate")]
    InsufficientData,
}

pub struct Evaluator {
    llm: Arc<dyn ChatModel>,
}

impl Evaluator {
    pub fn new(llm: Arc<dyn ChatModel>) -> Self {
        Self { llm }
    }

    pub async fn evaluate(
        &self,
        session: &InterviewSession,
        now: DateTime<Utc>,
    ) -> Result<Evaluation, EvaluationError> {
        if !session.history.iter().any(|e| e.role == ChatRole::User) {
            return Err(EvaluationError::InsufficientData);
        }

        let analysis = self.analyze(session).await;
        let detailed_scores = scoring::score_analysis(&analysis);
        let overall_score = scoring::overall_score(&detailed_scores);

        let evaluation = Evaluation {
            evaluation_id: format!("eval_{}", now.format("%Y%m%d_%H%M%S")),
            candidate_name: session.candidate_name.clone(),
            target_role: session.target_role.clone(),
            timestamp: now,
            overall_score,
            overall_rating: Rating::from_score(overall_score),
            assessment: scoring::assessment(overall_score, &analysis),
            recommendations: scoring::recommendations(overall_score, &analysis),
            detailed_scores,
            analysis,
            interview_metadata: EvaluationMetadata {
                duration_minutes: session.duration_minutes(now),
                questions_completed: session.candidate_responses.len(),
                interview_stage_reached: session.stage,
                total_conversation_exchanges: session.history.len(),
                candidate_responses: session.candidate_responses.clone(),
            },
        };

        info!(
            evaluation_id = %evaluation.evaluation_id,
            session_id = %session.id,
            overall_score,
            "Interview evaluated"
        );
        Ok(evaluation)
    }

    async fn analyze(&self, session: &InterviewSession) -> PerformanceAnalysis {
        let system = format!("{EVALUATION_SYSTEM}\n\n{JSON_ONLY_INSTRUCTION}");
        let prompt =
            EVALUATION_PROMPT_TEMPLATE.replace("{context}", &conversation_context(session));
        let mut request = ChatRequest::single(system, prompt, TEMPERATURE);
        request.max_tokens = MAX_TOKENS;

        match self.llm.complete(request).await {
            Ok(text) => match serde_json::from_str(strip_json_fences(&text)) {
                Ok(analysis) => analysis,
                Err(e) => {
                    warn!("Evaluation analysis was not valid JSON, keeping raw text: {e}");
                    text_analysis(text)
                }
            },
            Err(e) => {
                warn!("Evaluation LLM call failed: {e}");
                failure_analysis(e.to_string())
            }
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// The transcript excerpt handed to the evaluator LLM.
pub fn conversation_context(session: &InterviewSession) -> String {
    let mut parts = vec!["=== INTERVIEW CONVERSATION ===\n".to_string()];

    let start = session.history.len().saturating_sub(CONTEXT_ENTRIES);
    for entry in &session.history[start..] {
        let role = match entry.role {
            ChatRole::User => "USER",
            ChatRole::Assistant => "ASSISTANT",
        };
        parts.push(format!(
            "[{role} - {}]: {}\n",
            entry.stage,
            truncate(&entry.content, ENTRY_CHARS)
        ));
    }

    if !session.candidate_responses.is_empty() {
        parts.push("\n=== KEY CANDIDATE RESPONSES ===\n".to_string());
        for (i, response) in session.candidate_responses.iter().enumerate() {
            let n = i + 1;
            parts.push(format!(
                "Q{n}: {}\nA{n}: {}\n",
                response.question,
                truncate(&response.response, RESPONSE_CHARS)
            ));
        }
    }

    parts.join("\n")
}

fn text_analysis(raw: String) -> PerformanceAnalysis {
    PerformanceAnalysis {
        technical_skills: CriterionAnalysis {
            strengths: vec!["Analysis available in text format".to_string()],
            ..Default::default()
        },
        raw_analysis: Some(raw),
        ..Default::default()
    }
}

fn failure_analysis(error: String) -> PerformanceAnalysis {
    PerformanceAnalysis {
        technical_skills: CriterionAnalysis {
            areas_for_improvement: vec!["Unable to analyze due to technical issue".to_string()],
            ..Default::default()
        },
        error: Some(error),
        ..Default::default()
    }
}
