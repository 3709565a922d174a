//! Interviewer agent. Drives the stage machine and writes the interviewer's side of the chat.
//!
//! Stage transitions are decided here from counts and phrases; the LLM only words the replies.
//! Every LLM failure degrades to a canned line so the interview never stalls.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use super::models::{CandidateResponse, InterviewSession, Stage};
use super::prompts::{
    CLOSING_INSTRUCTION, CLOSING_MESSAGE, CURRENT_PROBLEM_CONTEXT, FALLBACK_FOLLOW_UP,
    FALLBACK_HINT, FAREWELL_MESSAGE, FOLLOW_UP_INSTRUCTION, HINT_PROMPT_TEMPLATE,
    INTERVIEWER_SYSTEM, INTRODUCTION_INSTRUCTION, NEXT_QUESTION_MESSAGE,
    NO_ACTIVE_QUESTION_MESSAGE,
};
use crate::llm_client::prompts::NO_SOLUTIONS_INSTRUCTION;
use crate::llm_client::{ChatMessage, ChatModel, ChatRequest};
use crate::problems::Problem;

const TEMPERATURE: f32 = 0.7;
const HISTORY_WINDOW: usize = 10;

const MOVE_ON_PHRASES: &[&str] = &[
    "next question",
    "move on",
    "skip",
    "i'm done",
    "done with this",
];

const INTRODUCTION_QUESTION: &str = "Tell me about yourself";
const CLOSING_QUESTION: &str = "Questions for the interviewer";

/// What the interviewer wants to happen after a candidate message.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewStep {
    pub message: String,
    pub stage: Stage,
    pub complete: bool,
    /// A new problem should be fetched and presented after `message`.
    pub needs_question: bool,
}

impl InterviewStep {
    fn reply(message: impl Into<String>, stage: Stage) -> Self {
        Self {
            message: message.into(),
            stage,
            complete: stage == Stage::Complete,
            needs_question: false,
        }
    }

    fn with_question(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stage: Stage::Technical,
            complete: false,
            needs_question: true,
        }
    }
}

pub fn wants_to_move_on(input: &str) -> bool {
    let lower = input.to_lowercase();
    MOVE_ON_PHRASES.iter().any(|p| lower.contains(p))
}

pub struct Interviewer {
    llm: Arc<dyn ChatModel>,
    questions_per_interview: u32,
    exchanges_per_question: u32,
}

impl Interviewer {
    pub fn new(
        llm: Arc<dyn ChatModel>,
        questions_per_interview: u32,
        exchanges_per_question: u32,
    ) -> Self {
        Self {
            llm,
            questions_per_interview,
            exchanges_per_question,
        }
    }

    pub fn opening_message(&self, candidate_name: &str, target_role: &str) -> String {
        format!(
            "Hello {candidate_name}! Welcome to your technical interview for the {target_role} position. \
I'm your AI interviewer today.\n\n\
We'll start with a quick introduction, then work through {} coding problem(s) together. \
Think out loud, ask clarifying questions, and type 'hint' whenever you'd like a nudge.\n\n\
To begin, could you tell me a little about yourself and your programming background?",
            self.questions_per_interview
        )
    }

    /// Advances the interview by one candidate message. Records the answer on the session;
    /// the caller owns stage changes and history.
    pub async fn process_response(
        &self,
        session: &mut InterviewSession,
        input: &str,
    ) -> InterviewStep {
        match session.stage {
            Stage::Introduction => {
                record_answer(session, INTRODUCTION_QUESTION, input);
                let ack = self
                    .reply(session, input, INTRODUCTION_INSTRUCTION)
                    .await
                    .unwrap_or_else(|| {
                        format!("Thanks for the introduction, {}!", session.candidate_name)
                    });
                InterviewStep::with_question(ack)
            }
            Stage::Technical => self.technical_step(session, input).await,
            Stage::Closing => {
                record_answer(session, CLOSING_QUESTION, input);
                let farewell = self
                    .reply(session, input, CLOSING_INSTRUCTION)
                    .await
                    .unwrap_or_else(|| FAREWELL_MESSAGE.to_string());
                InterviewStep::reply(farewell, Stage::Complete)
            }
            Stage::Complete => InterviewStep::reply(FAREWELL_MESSAGE, Stage::Complete),
        }
    }

    async fn technical_step(&self, session: &mut InterviewSession, input: &str) -> InterviewStep {
        let Some(title) = session.current_question.as_ref().map(|q| q.title.clone()) else {
            return InterviewStep::with_question("Let's get started with a coding problem.");
        };

        record_answer(session, &title, input);
        session.exchanges_on_question += 1;

        let question_finished =
            wants_to_move_on(input) || session.exchanges_on_question >= self.exchanges_per_question;

        if question_finished {
            debug!(
                session_id = %session.id,
                exchanges = session.exchanges_on_question,
                questions_asked = session.questions_asked,
                "Question finished"
            );
            return if session.questions_asked < self.questions_per_interview {
                InterviewStep::with_question(NEXT_QUESTION_MESSAGE)
            } else {
                InterviewStep::reply(CLOSING_MESSAGE, Stage::Closing)
            };
        }

        let follow_up = self
            .reply(session, input, FOLLOW_UP_INSTRUCTION)
            .await
            .unwrap_or_else(|| FALLBACK_FOLLOW_UP.to_string());
        InterviewStep::reply(follow_up, Stage::Technical)
    }

    /// Presentation text for a freshly selected problem.
    pub fn ask_question(&self, problem: &Problem, candidate_name: &str) -> String {
        let mut text = format!(
            "Here's your problem, {candidate_name}:\n\n**{}**\nSource: {} | Difficulty: {}",
            problem.title,
            problem.source.display_name(),
            problem.difficulty
        );
        if let Some(url) = &problem.url {
            text.push_str(&format!("\nLink: {url}"));
        }
        text.push_str(&format!(
            "\n\n{}\n\nTake your time. Start by telling me how you understand the problem \
and any clarifying questions you have.",
            problem.description
        ));
        text
    }

    /// Next stored hint for the active problem, then LLM-written hints once those run out.
    pub async fn provide_hint(&self, session: &mut InterviewSession) -> String {
        let Some(problem) = session.current_question.as_ref() else {
            return NO_ACTIVE_QUESTION_MESSAGE.to_string();
        };

        let hint = match problem.hints.get(session.hints_given as usize) {
            Some(stored) => stored.clone(),
            None => {
                let system = self.system_prompt(session, "");
                let prompt = HINT_PROMPT_TEMPLATE
                    .replace("{title}", &problem.title)
                    .replace("{description}", &problem.description);
                match self
                    .llm
                    .complete(ChatRequest::single(system, prompt, TEMPERATURE))
                    .await
                {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("Hint generation failed: {e}");
                        FALLBACK_HINT.to_string()
                    }
                }
            }
        };

        session.hints_given += 1;
        format!("Hint: {hint}")
    }

    fn system_prompt(&self, session: &InterviewSession, instruction: &str) -> String {
        let mut system = INTERVIEWER_SYSTEM
            .replace("{candidate_name}", &session.candidate_name)
            .replace("{target_role}", &session.target_role);
        system.push_str("\n\n");
        system.push_str(NO_SOLUTIONS_INSTRUCTION);
        if let Some(problem) = &session.current_question {
            system.push_str("\n\n");
            system.push_str(
                &CURRENT_PROBLEM_CONTEXT
                    .replace("{title}", &problem.title)
                    .replace("{description}", &problem.description),
            );
        }
        if !instruction.is_empty() {
            system.push_str("\n\n");
            system.push_str(instruction);
        }
        system
    }

    async fn reply(
        &self,
        session: &InterviewSession,
        input: &str,
        instruction: &str,
    ) -> Option<String> {
        let mut messages = session.recent_messages(HISTORY_WINDOW);
        messages.push(ChatMessage::user(input));

        let request = ChatRequest {
            messages,
            ..ChatRequest::single(self.system_prompt(session, instruction), "", TEMPERATURE)
        };

        match self.llm.complete(request).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(session_id = %session.id, "Interviewer LLM call failed: {e}");
                None
            }
        }
    }
}

fn record_answer(session: &mut InterviewSession, question: &str, input: &str) {
    session.candidate_responses.push(CandidateResponse {
        question: question.to_string(),
        response: input.to_string(),
        stage: session.stage,
        timestamp: Utc::now(),
    });
}
