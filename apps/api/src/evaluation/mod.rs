// Evaluation: LLM analysis of the transcript, threshold scoring and report rendering.

pub mod evaluator;
pub mod models;
pub mod prompts;
pub mod report;
pub mod scoring;

pub use evaluator::Evaluator;
pub use models::Evaluation;
