//! Conversation-level flow heuristics, independent of any single message.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::interview::models::ConversationEntry;
use crate::llm_client::ChatRole;

const LOOP_WINDOW: usize = 4;
const LOOP_PREFIX_CHARS: usize = 100;
const MAX_DISTINCT_IN_LOOP: usize = 2;
const MAX_HISTORY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStatus {
    Normal,
    Stuck,
    TooLong,
    NoResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowCheck {
    pub status: FlowStatus,
    pub suggestion: Option<String>,
}

impl FlowCheck {
    fn normal() -> Self {
        Self {
            status: FlowStatus::Normal,
            suggestion: None,
        }
    }

    fn flagged(status: FlowStatus, suggestion: &str) -> Self {
        Self {
            status,
            suggestion: Some(suggestion.to_string()),
        }
    }
}

pub fn check_interview_flow(history: &[ConversationEntry]) -> FlowCheck {
    if history.len() < 2 {
        return FlowCheck::normal();
    }

    // Up to the last four entries.
    let recent: HashSet<String> = history[history.len().saturating_sub(LOOP_WINDOW)..]
        .iter()
        .map(|e| e.content.chars().take(LOOP_PREFIX_CHARS).collect())
        .collect();
    if recent.len() <= MAX_DISTINCT_IN_LOOP {
        return FlowCheck::flagged(
            FlowStatus::Stuck,
            "The conversation seems to be repeating. Let's try a new approach or question.",
        );
    }

    if history.len() > MAX_HISTORY {
        return FlowCheck::flagged(
            FlowStatus::TooLong,
            "This interview has been quite lengthy. Should we start wrapping up?",
        );
    }

    if !history.iter().any(|e| e.role == ChatRole::User) {
        return FlowCheck::flagged(
            FlowStatus::NoResponse,
            "I notice you haven't responded yet. Take your time, and let me know if you need any clarification!",
        );
    }

    FlowCheck::normal()
}
