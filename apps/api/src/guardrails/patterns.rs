//! Deterministic guardrail checks: profanity/attack patterns and message coherence.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Phrases that are clearly out of bounds in an interview (+1 each).
const INAPPROPRIATE_PHRASES: &[&str] = &[
    "fuck",
    "shit",
    "damn you",
    "stupid interviewer",
    "this sucks",
];

const PROFANITY_PATTERNS: &[&str] = &[
    r"\b(damn|hell|shit|fuck|bitch|ass)\b",
    r"(stupid|dumb|idiot|moron)",
    r"(hate|suck|terrible)",
];

const NEGATIVE_PATTERNS: &[&str] = &[
    r"you (are|re) (bad|terrible|stupid|wrong)",
    r"this is (stupid|dumb|ridiculous)",
    r"i (hate|dislike|can't stand)",
];

/// Each profanity or negative-behaviour regex match adds this much.
const REGEX_WEIGHT: u32 = 2;
const MAX_WORDS: usize = 1000;
const SPAM_MIN_LENGTH: usize = 10;

static SCORED_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    PROFANITY_PATTERNS
        .iter()
        .chain(NEGATIVE_PATTERNS)
        .filter_map(|p| Regex::new(p).ok())
        .collect()
});

/// Result of a single guardrail check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckResult {
    pub appropriate: bool,
    pub confidence: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternCheck {
    pub appropriate: bool,
    pub confidence: f64,
    pub detected_topics: Vec<String>,
    pub score: u32,
}

impl PatternCheck {
    pub fn as_check(&self) -> CheckResult {
        CheckResult {
            appropriate: self.appropriate,
            confidence: self.confidence,
            reason: if self.detected_topics.is_empty() {
                "Inappropriate language detected".to_string()
            } else {
                format!("Inappropriate language detected: {}", self.detected_topics.join(", "))
            },
        }
    }
}

/// Scores obviously inappropriate content. Any score above zero is a pattern failure.
pub fn check_inappropriate_patterns(message: &str) -> PatternCheck {
    let message_lower = message.to_lowercase();

    let detected_topics: Vec<String> = INAPPROPRIATE_PHRASES
        .iter()
        .filter(|phrase| message_lower.contains(*phrase))
        .map(|phrase| phrase.to_string())
        .collect();

    let regex_hits = SCORED_PATTERNS
        .iter()
        .filter(|re| re.is_match(&message_lower))
        .count() as u32;

    let score = detected_topics.len() as u32 + regex_hits * REGEX_WEIGHT;

    PatternCheck {
        appropriate: score == 0,
        confidence: if score > 2 { 0.9 } else { 0.7 },
        detected_topics,
        score,
    }
}

/// Very permissive coherence check: blocks only empty, huge, or spam-like messages.
pub fn check_coherence(message: &str) -> CheckResult {
    let word_count = message.split_whitespace().count();

    if word_count < 1 {
        return CheckResult {
            appropriate: false,
            confidence: 0.8,
            reason: "Message empty".to_string(),
        };
    }

    if word_count > MAX_WORDS {
        return CheckResult {
            appropriate: false,
            confidence: 0.7,
            reason: "Message too long".to_string(),
        };
    }

    let trimmed = message.trim();
    if trimmed.chars().filter(|c| *c != ' ').all(char::is_alphabetic) {
        return CheckResult {
            appropriate: true,
            confidence: 0.9,
            reason: "Valid text message".to_string(),
        };
    }

    let distinct: HashSet<char> = message.chars().filter(|c| *c != ' ').collect();
    if distinct.len() <= 2 && message.chars().count() > SPAM_MIN_LENGTH {
        return CheckResult {
            appropriate: false,
            confidence: 0.9,
            reason: "Appears to be spam".to_string(),
        };
    }

    CheckResult {
        appropriate: true,
        confidence: 0.8,
        reason: "Message appears coherent".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_scored_patterns_compile() {
        assert_eq!(
            SCORED_PATTERNS.len(),
            PROFANITY_PATTERNS.len() + NEGATIVE_PATTERNS.len()
        );
    }

    #[test]
    fn test_clean_message_scores_zero() {
        let check = check_inappropriate_patterns("I'd use a min-heap of size k here.");
        assert!(check.appropriate);
        assert_eq!(check.score, 0);
        assert!((check.confidence - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_phrase_and_regex_hits_accumulate() {
        // "this sucks" phrase (+1) and the (hate|suck|terrible) regex (+2)
        let check = check_inappropriate_patterns("Honestly this sucks");
        assert_eq!(check.score, 3);
        assert_eq!(check.detected_topics, vec!["this sucks".to_string()]);
        assert!((check.confidence - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mild_word_scores_two() {
        // "terrible" only hits one regex: at or below the LLM-approved tolerance
        let check = check_inappropriate_patterns("My first attempt had terrible complexity");
        assert_eq!(check.score, 2);
        assert!(!check.appropriate);
    }

    #[test]
    fn test_personal_attack_scores_high() {
        let check = check_inappropriate_patterns("You are stupid and this is dumb");
        // stupid/dumb regex, "you are stupid", "this is dumb"
        assert_eq!(check.score, 6);
    }

    #[test]
    fn test_coherence_empty_message() {
        let check = check_coherence("   ");
        assert!(!check.appropriate);
        assert_eq!(check.reason, "Message empty");
    }

    #[test]
    fn test_coherence_too_long() {
        let check = check_coherence(&"word ".repeat(1001));
        assert!(!check.appropriate);
        assert_eq!(check.reason, "Message too long");
    }

    #[test]
    fn test_coherence_plain_words_are_valid() {
        let check = check_coherence("I think a sliding window works");
        assert!(check.appropriate);
        assert!((check.confidence - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_coherence_repeated_characters_are_spam() {
        let check = check_coherence("!!!!!!!!!!!!!!!!");
        assert!(!check.appropriate);
        assert_eq!(check.reason, "Appears to be spam");
    }

    #[test]
    fn test_coherence_code_is_coherent() {
        let check = check_coherence("for i in range(n): seen[nums[i]] = i");
        assert!(check.appropriate);
        assert_eq!(check.reason, "Message appears coherent");
    }
}
