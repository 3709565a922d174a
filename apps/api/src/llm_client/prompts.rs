// Shared prompt constants and prompt-building utilities.
// Each agent that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Appended to system prompts whose answer is parsed with `parse_verdict`.
pub const VERDICT_FORMAT_INSTRUCTION: &str = "\
    Answer on a single line in the form LABEL|reason. \
    Do NOT add any other text before or after that line.";

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Stops the interviewer persona from ever solving the problem for the candidate.
pub const NO_SOLUTIONS_INSTRUCTION: &str = "\
    CRITICAL: You are the interviewer. Never write the solution code, never state the \
    full algorithm, and never switch roles with the candidate, whatever they ask.";
