// Interview: session model and the interviewer agent that advances it.

pub mod interviewer;
pub mod models;
pub mod prompts;

pub use interviewer::Interviewer;
pub use models::{InterviewSession, Stage};
