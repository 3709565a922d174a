//! Guardrails moderator: appropriateness verdicts and the redirect / end-interview policy.

use std::sync::Arc;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::guardrails::patterns::{check_coherence, check_inappropriate_patterns, CheckResult};
use crate::guardrails::prompts::{
    END_INTERVIEW_MESSAGE, MODERATION_PROMPT_TEMPLATE, MODERATION_SYSTEM, REDIRECT_MESSAGES,
    RESET_MESSAGE,
};
use crate::llm_client::prompts::VERDICT_FORMAT_INSTRUCTION;
use crate::llm_client::{parse_verdict, ChatModel, ChatRequest};

const TEMPERATURE: f32 = 0.2;
/// When the LLM approves, only a pattern score above this blocks the message.
const SEVERE_PATTERN_SCORE: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailsCheck {
    pub appropriate: bool,
    pub needs_redirect: bool,
    pub reason: String,
    pub suggested_redirect: String,
    pub confidence: f64,
}

impl GuardrailsCheck {
    /// Empty input is passed through untouched.
    pub fn skipped() -> Self {
        Self {
            appropriate: true,
            needs_redirect: false,
            reason: "Content appears appropriate".to_string(),
            suggested_redirect: String::new(),
            confidence: 1.0,
        }
    }
}

/// What the conversation does after an inappropriate message or a manual reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum GuardrailAction {
    Redirect {
        message: String,
        reason: String,
        attempts_remaining: u32,
    },
    EndInterview {
        message: String,
        reason: String,
    },
    Reset {
        message: String,
        reset_count: u32,
    },
}

impl GuardrailAction {
    pub fn message(&self) -> &str {
        match self {
            GuardrailAction::Redirect { message, .. }
            | GuardrailAction::EndInterview { message, .. }
            | GuardrailAction::Reset { message, .. } => message,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuardrailsSummary {
    pub conversation_resets: u32,
    pub max_resets: u32,
    pub resets_remaining: u32,
    pub status: String,
}

pub struct Guardrails {
    llm: Arc<dyn ChatModel>,
    max_redirects: u32,
}

impl Guardrails {
    pub fn new(llm: Arc<dyn ChatModel>, max_redirects: u32) -> Self {
        Self { llm, max_redirects }
    }

    /// Checks whether a candidate message is appropriate for the interview context.
    pub async fn check(&self, message: &str, context: &str) -> GuardrailsCheck {
        let pattern = check_inappropriate_patterns(message);
        let coherence = check_coherence(message);
        let llm_check = self.llm_appropriateness_check(message, context).await;

        let appropriate = if llm_check.appropriate {
            pattern.score <= SEVERE_PATTERN_SCORE && coherence.appropriate
        } else {
            false
        };

        debug!(
            llm_appropriate = llm_check.appropriate,
            pattern_score = pattern.score,
            coherent = coherence.appropriate,
            appropriate,
            "Guardrails verdict"
        );

        // First failing check names the reason, even when the message is let through.
        let pattern_check = pattern.as_check();
        let reason = [&pattern_check, &coherence, &llm_check]
            .into_iter()
            .find(|c| !c.appropriate)
            .map(|c| c.reason.clone())
            .unwrap_or_else(|| "Content appears appropriate".to_string());

        GuardrailsCheck {
            appropriate,
            needs_redirect: !appropriate,
            reason,
            suggested_redirect: self.redirect_message(),
            confidence: pattern_check
                .confidence
                .min(coherence.confidence)
                .min(llm_check.confidence),
        }
    }

    /// Picks one of the fixed redirect lines.
    pub fn redirect_message(&self) -> String {
        REDIRECT_MESSAGES
            .choose(&mut rand::thread_rng())
            .unwrap_or(&REDIRECT_MESSAGES[0])
            .to_string()
    }

    /// Counts an inappropriate message against the session and decides whether to continue.
    pub fn handle_inappropriate(&self, redirect_count: &mut u32, reason: &str) -> GuardrailAction {
        *redirect_count += 1;

        if *redirect_count >= self.max_redirects {
            warn!(
                redirect_count = *redirect_count,
                "Redirect limit reached, ending interview"
            );
            return GuardrailAction::EndInterview {
                message: END_INTERVIEW_MESSAGE.to_string(),
                reason: "Too many inappropriate responses".to_string(),
            };
        }

        GuardrailAction::Redirect {
            message: self.redirect_message(),
            reason: reason.to_string(),
            attempts_remaining: self.max_redirects - *redirect_count,
        }
    }

    /// Manual conversation reset. Counts against the same budget as redirects.
    pub fn emergency_reset(&self, redirect_count: &mut u32) -> GuardrailAction {
        *redirect_count += 1;
        GuardrailAction::Reset {
            message: RESET_MESSAGE.to_string(),
            reset_count: *redirect_count,
        }
    }

    pub fn summary(&self, redirect_count: u32) -> GuardrailsSummary {
        GuardrailsSummary {
            conversation_resets: redirect_count,
            max_resets: self.max_redirects,
            resets_remaining: self.max_redirects.saturating_sub(redirect_count),
            status: if redirect_count < self.max_redirects {
                "active".to_string()
            } else {
                "limit_reached".to_string()
            },
        }
    }

    async fn llm_appropriateness_check(&self, message: &str, context: &str) -> CheckResult {
        let system = format!("{MODERATION_SYSTEM}\n\n{VERDICT_FORMAT_INSTRUCTION}");
        let prompt = MODERATION_PROMPT_TEMPLATE
            .replace("{context}", context)
            .replace("{message}", message);

        match self
            .llm
            .complete(ChatRequest::single(system, prompt, TEMPERATURE))
            .await
        {
            Ok(text) => {
                let verdict = parse_verdict(&text);
                CheckResult {
                    appropriate: verdict.label == "APPROPRIATE",
                    confidence: 0.8,
                    reason: verdict.reason,
                }
            }
            Err(e) => {
                warn!("Guardrails LLM check failed: {e}");
                CheckResult {
                    appropriate: true,
                    confidence: 0.3,
                    reason: format!("LLM check failed, assuming appropriate: {e}"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedModel;

    fn guardrails(reply: &str) -> Guardrails {
        Guardrails::new(Arc::new(ScriptedModel::always(reply)), 3)
    }

    #[tokio::test]
    async fn test_llm_approval_tolerates_mild_language() {
        let g = guardrails("APPROPRIATE|technical discussion");
        let check = g
            .check("My first attempt had terrible complexity", "Interview stage: technical")
            .await;
        assert!(check.appropriate);
        assert!(!check.needs_redirect);
        assert_eq!(check.reason, "Inappropriate language detected");
        // min(pattern 0.7, coherence 0.9, llm 0.8)
        assert!((check.confidence - 0.7).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_clean_message_reports_appropriate_reason() {
        let g = guardrails("APPROPRIATE|technical discussion");
        let check = g
            .check("I would sort the array and use two pointers", "Interview stage: technical")
            .await;
        assert!(check.appropriate);
        assert_eq!(check.reason, "Content appears appropriate");
    }

    #[tokio::test]
    async fn test_severe_patterns_block_despite_llm_approval() {
        let g = guardrails("APPROPRIATE|fine");
        let check = g
            .check("You are stupid and this is dumb", "Interview stage: technical")
            .await;
        assert!(!check.appropriate);
        assert!(check.needs_redirect);
        assert!(check.reason.starts_with("Inappropriate language detected"));
        assert!(REDIRECT_MESSAGES.contains(&check.suggested_redirect.as_str()));
    }

    #[tokio::test]
    async fn test_llm_rejection_blocks() {
        let g = guardrails("INAPPROPRIATE|off-topic personal discussion");
        let check = g
            .check("What is your favourite holiday destination", "Interview stage: technical")
            .await;
        assert!(!check.appropriate);
        assert_eq!(check.reason, "off-topic personal discussion");
    }

    #[tokio::test]
    async fn test_spam_blocks_even_with_llm_approval() {
        let g = guardrails("APPROPRIATE|ok");
        let check = g.check("????????????????", "Interview stage: technical").await;
        assert!(!check.appropriate);
        assert_eq!(check.reason, "Appears to be spam");
    }

    #[tokio::test]
    async fn test_llm_failure_assumes_appropriate_with_low_confidence() {
        let g = Guardrails::new(Arc::new(ScriptedModel::failing()), 3);
        let check = g
            .check("I mostly practice on Codeforces", "Interview stage: introduction")
            .await;
        assert!(check.appropriate);
        assert!((check.confidence - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_redirects_then_ends_at_limit() {
        let g = guardrails("APPROPRIATE|unused");
        let mut count = 0;

        let first = g.handle_inappropriate(&mut count, "profanity");
        assert!(matches!(
            first,
            GuardrailAction::Redirect {
                attempts_remaining: 2,
                ..
            }
        ));

        let second = g.handle_inappropriate(&mut count, "profanity");
        assert!(matches!(
            second,
            GuardrailAction::Redirect {
                attempts_remaining: 1,
                ..
            }
        ));

        let third = g.handle_inappropriate(&mut count, "profanity");
        assert_eq!(count, 3);
        assert_eq!(third.message(), END_INTERVIEW_MESSAGE);
        assert!(matches!(third, GuardrailAction::EndInterview { .. }));
    }

    #[test]
    fn test_reset_counts_against_budget() {
        let g = guardrails("APPROPRIATE|unused");
        let mut count = 0;
        let action = g.emergency_reset(&mut count);
        assert_eq!(count, 1);
        assert_eq!(
            action,
            GuardrailAction::Reset {
                message: RESET_MESSAGE.to_string(),
                reset_count: 1
            }
        );

        let summary = g.summary(count);
        assert_eq!(summary.resets_remaining, 2);
        assert_eq!(summary.status, "active");
        assert_eq!(g.summary(3).status, "limit_reached");
        assert_eq!(g.summary(5).resets_remaining, 0);
    }

    #[test]
    fn test_action_serializes_with_tag() {
        let action = GuardrailAction::EndInterview {
            message: "bye".into(),
            reason: "limit".into(),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["action"], "end_interview");
    }
}
