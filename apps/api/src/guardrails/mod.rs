// Guardrails: keeps the conversation professional and on track.
// Pattern and coherence checks are deterministic; the LLM verdict has the final say
// unless the pattern score is severe.

pub mod flow;
pub mod moderator;
pub mod patterns;
pub mod prompts;

pub use flow::{check_interview_flow, FlowCheck};
pub use moderator::{GuardrailAction, Guardrails, GuardrailsCheck, GuardrailsSummary};
