// Intent guard: detects prompt injection and role-manipulation attempts.
// Pattern screening runs first; the LLM verdict decides borderline input.

pub mod guard;
pub mod patterns;
pub mod prompts;

pub use guard::{IntentGuard, SecurityCheck};
