use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::evaluation::models::Evaluation;
use crate::llm_client::{ChatMessage, ChatRole};
use crate::problems::Problem;

/// Interview progression. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Introduction,
    Technical,
    Closing,
    Complete,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Introduction => "introduction",
            Stage::Technical => "technical",
            Stage::Closing => "closing",
            Stage::Complete => "complete",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationEntry {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub stage: Stage,
}

impl ConversationEntry {
    pub fn new(role: ChatRole, content: impl Into<String>, stage: Stage) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            stage,
        }
    }
}

/// A candidate answer recorded against the question that was active at the time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateResponse {
    pub question: String,
    pub response: String,
    pub stage: Stage,
    pub timestamp: DateTime<Utc>,
}

/// All state for one interview. Serialized as a whole into the session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSession {
    pub id: Uuid,
    pub candidate_name: String,
    pub target_role: String,
    pub started_at: DateTime<Utc>,
    pub stage: Stage,
    pub history: Vec<ConversationEntry>,
    pub current_question: Option<Problem>,
    /// Titles of every question asked so far, in order.
    pub asked_questions: Vec<String>,
    pub candidate_responses: Vec<CandidateResponse>,
    /// Candidate answers given on the current question.
    pub exchanges_on_question: u32,
    pub questions_asked: u32,
    /// Hints given on the current question.
    pub hints_given: u32,
    /// Redirects and manual resets share one budget.
    pub redirect_count: u32,
    pub turn_count: u32,
    pub complete: bool,
    pub evaluation: Option<Evaluation>,
    pub last_error: Option<String>,
}

impl InterviewSession {
    pub fn new(candidate_name: impl Into<String>, target_role: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            candidate_name: candidate_name.into(),
            target_role: target_role.into(),
            started_at: Utc::now(),
            stage: Stage::Introduction,
            history: Vec::new(),
            current_question: None,
            asked_questions: Vec::new(),
            candidate_responses: Vec::new(),
            exchanges_on_question: 0,
            questions_asked: 0,
            hints_given: 0,
            redirect_count: 0,
            turn_count: 0,
            complete: false,
            evaluation: None,
            last_error: None,
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>, stage: Stage) {
        self.history
            .push(ConversationEntry::new(ChatRole::User, content, stage));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>, stage: Stage) {
        self.history
            .push(ConversationEntry::new(ChatRole::Assistant, content, stage));
    }

    /// Makes `problem` the active question and resets per-question counters.
    pub fn set_question(&mut self, problem: Problem) {
        self.asked_questions.push(problem.title.clone());
        self.questions_asked += 1;
        self.exchanges_on_question = 0;
        self.hints_given = 0;
        self.current_question = Some(problem);
    }

    /// Whole minutes since the interview started.
    pub fn duration_minutes(&self, now: DateTime<Utc>) -> i64 {
        (now - self.started_at).num_minutes().max(0)
    }

    /// The most recent `limit` history entries as chat messages.
    ///
    /// The Messages API requires the first message to come from the user, so a
    /// leading assistant entry is dropped.
    pub fn recent_messages(&self, limit: usize) -> Vec<ChatMessage> {
        let start = self.history.len().saturating_sub(limit);
        let mut messages: Vec<ChatMessage> = self.history[start..]
            .iter()
            .map(|e| ChatMessage {
                role: e.role,
                content: e.content.clone(),
            })
            .collect();
        while messages
            .first()
            .is_some_and(|m| m.role == ChatRole::Assistant)
        {
            messages.remove(0);
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::fallback::challenging_problems;

    #[test]
    fn test_new_session_starts_in_introduction() {
        let session = InterviewSession::new("Ada", "Backend Engineer");
        assert_eq!(session.stage, Stage::Introduction);
        assert!(session.history.is_empty());
        assert!(!session.complete);
        assert_eq!(session.questions_asked, 0);
    }

    #[test]
    fn test_set_question_resets_per_question_counters() {
        let mut session = InterviewSession::new("Ada", "Backend Engineer");
        session.exchanges_on_question = 3;
        session.hints_given = 2;

        let problem = challenging_problems().remove(0);
        let title = problem.title.clone();
        session.set_question(problem);

        assert_eq!(session.exchanges_on_question, 0);
        assert_eq!(session.hints_given, 0);
        assert_eq!(session.questions_asked, 1);
        assert_eq!(session.asked_questions, vec![title]);
    }

    #[test]
    fn test_recent_messages_start_with_user() {
        let mut session = InterviewSession::new("Ada", "Backend Engineer");
        session.push_assistant("Hello", Stage::Introduction);
        session.push_user("Hi, I'm Ada", Stage::Introduction);
        session.push_assistant("Great", Stage::Technical);

        let messages = session.recent_messages(10);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::User);

        let last_two = session.recent_messages(2);
        assert_eq!(last_two[0].content, "Hi, I'm Ada");
    }

    #[test]
    fn test_duration_is_whole_minutes() {
        let session = InterviewSession::new("Ada", "Backend Engineer");
        let later = session.started_at + chrono::Duration::seconds(185);
        assert_eq!(session.duration_minutes(later), 3);
        assert_eq!(session.duration_minutes(session.started_at), 0);
    }

    #[test]
    fn test_stage_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(Stage::Technical).unwrap(),
            serde_json::json!("technical")
        );
        assert_eq!(Stage::Closing.to_string(), "closing");
    }
}
