//! Intent Guard: combines pattern screening with an LLM verdict.
//!
//! Rule: a pattern score of 3 or more blocks the message regardless of the LLM.
//! Below that, the LLM decides. If the LLM is unreachable the message is
//! treated as safe so ordinary interview answers keep flowing.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::llm_client::prompts::VERDICT_FORMAT_INSTRUCTION;
use crate::llm_client::{parse_verdict, ChatModel, ChatRequest};
use crate::security::patterns::{detected_patterns, pattern_score};
use crate::security::prompts::{SECURITY_PROMPT_TEMPLATE, SECURITY_SYSTEM};

const TEMPERATURE: f32 = 0.1;
/// Pattern score at which input is blocked without consulting the LLM verdict.
pub const BLOCK_THRESHOLD: u32 = 3;
const SAFE_RISK: u32 = 1;
const UNSAFE_RISK: u32 = 5;
pub const BLOCKED_WARNING: &str = "Input blocked due to security concerns";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityAnalysis {
    pub is_safe: bool,
    pub risk_score: u32,
    pub detected_patterns: Vec<String>,
    pub reason: String,
    /// The original input when safe, empty when blocked.
    pub cleaned_input: String,
}

/// Outcome of the security node for one candidate message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityCheck {
    pub approved: bool,
    pub message: String,
    pub analysis: Option<SecurityAnalysis>,
    pub warning: Option<String>,
}

impl SecurityCheck {
    /// Empty input carries nothing to analyze.
    pub fn skipped(message: &str) -> Self {
        Self {
            approved: true,
            message: message.to_string(),
            analysis: None,
            warning: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct LlmSecurityVerdict {
    is_safe: bool,
    risk_score: u32,
    reason: String,
}

pub struct IntentGuard {
    llm: Arc<dyn ChatModel>,
}

impl IntentGuard {
    pub fn new(llm: Arc<dyn ChatModel>) -> Self {
        Self { llm }
    }

    /// Analyzes a message for security threats.
    pub async fn analyze(&self, input: &str) -> SecurityAnalysis {
        let pattern_score = pattern_score(input);
        let llm_verdict = self.llm_security_check(input).await;

        let is_safe = if pattern_score >= BLOCK_THRESHOLD {
            false
        } else {
            llm_verdict.is_safe
        };

        debug!(
            pattern_score,
            llm_safe = llm_verdict.is_safe,
            is_safe,
            "Intent guard verdict"
        );

        SecurityAnalysis {
            is_safe,
            risk_score: pattern_score.max(llm_verdict.risk_score),
            detected_patterns: detected_patterns(input),
            reason: if is_safe {
                "Input appears safe".to_string()
            } else {
                llm_verdict.reason
            },
            cleaned_input: if is_safe {
                input.to_string()
            } else {
                String::new()
            },
        }
    }

    /// Entry point used by the workflow's security node.
    pub async fn process_message(&self, message: &str) -> SecurityCheck {
        if message.trim().is_empty() {
            return SecurityCheck::skipped(message);
        }

        let analysis = self.analyze(message).await;

        if analysis.is_safe {
            SecurityCheck {
                approved: true,
                message: message.to_string(),
                analysis: Some(analysis),
                warning: None,
            }
        } else {
            warn!(
                risk_score = analysis.risk_score,
                patterns = ?analysis.detected_patterns,
                "Blocked candidate message: {}",
                analysis.reason
            );
            SecurityCheck {
                approved: false,
                message: String::new(),
                analysis: Some(analysis),
                warning: Some(BLOCKED_WARNING.to_string()),
            }
        }
    }

    async fn llm_security_check(&self, input: &str) -> LlmSecurityVerdict {
        let system = format!("{SECURITY_SYSTEM}\n\n{VERDICT_FORMAT_INSTRUCTION}");
        let prompt = SECURITY_PROMPT_TEMPLATE.replace("{input}", input);

        match self
            .llm
            .complete(ChatRequest::single(system, prompt, TEMPERATURE))
            .await
        {
            Ok(text) => {
                let verdict = parse_verdict(&text);
                let is_safe = verdict.label == "SAFE";
                LlmSecurityVerdict {
                    is_safe,
                    risk_score: if is_safe { SAFE_RISK } else { UNSAFE_RISK },
                    reason: verdict.reason,
                }
            }
            Err(e) => {
                warn!("Security LLM check failed: {e}");
                LlmSecurityVerdict {
                    is_safe: true,
                    risk_score: SAFE_RISK,
                    reason: format!("LLM analysis failed, assuming safe: {e}"),
                }
            }
        }
    }
}
