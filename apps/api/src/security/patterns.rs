//! Pattern-based injection screening, run before the LLM verdict.

use std::sync::LazyLock;

use regex::Regex;

/// Manipulation phrasings, matched case-insensitively anywhere in the message.
pub const INJECTION_PATTERNS: &[&str] = &[
    r"ignore.*previous.*instructions",
    r"you.*are.*now",
    r"forget.*everything",
    r"new.*role",
    r"act.*as.*if",
    r"pretend.*to.*be",
    r"system.*prompt",
    r"jailbreak",
    r"prompt.*injection",
    r"override.*behavior",
    r"skip.*instructions",
    r"i.*become.*the.*interviewer",
    r"you.*give.*answers?.*now",
    r"switch.*roles?",
    r"you.*be.*the.*candidate",
    r"give.*me.*the.*answer",
    r"give.*the.*answer",
    r"give.*answer.*to.*question",
    r"tell.*me.*the.*solution",
    r"tell.*the.*solution",
    r"show.*me.*the.*code",
    r"show.*the.*code",
    r"provide.*the.*solution",
    r"what.*is.*the.*solution",
];

/// Each matching pattern adds this much to the score.
const PATTERN_WEIGHT: u32 = 2;
const LONG_INPUT_WORDS: usize = 200;
const MANY_LINE_BREAKS: usize = 10;

static COMPILED: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    INJECTION_PATTERNS
        .iter()
        .filter_map(|p| Regex::new(&format!("(?i){p}")).ok().map(|re| (*p, re)))
        .collect()
});

/// Scores a message: +2 per matching pattern, +1 for unusually long input,
/// +1 for many line breaks.
pub fn pattern_score(text: &str) -> u32 {
    let mut score = detected_patterns(text).len() as u32 * PATTERN_WEIGHT;

    if text.split_whitespace().count() > LONG_INPUT_WORDS {
        score += 1;
    }

    if text.matches('\n').count() > MANY_LINE_BREAKS {
        score += 1;
    }

    score
}

/// Returns the source of every pattern that matches the message.
pub fn detected_patterns(text: &str) -> Vec<String> {
    COMPILED
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(source, _)| source.to_string())
        .collect()
}
