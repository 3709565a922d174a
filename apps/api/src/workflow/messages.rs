// Fixed lines the workflow answers with when no agent produced a reply.

pub const DEFAULT_CANDIDATE_NAME: &str = "Demo Candidate";
pub const DEFAULT_TARGET_ROLE: &str = "Software Engineer";

pub const DEFAULT_RESPONSE: &str =
    "I'm here to help with your technical interview. Could you please provide more details?";

pub const SECURITY_BLOCK_MESSAGE: &str = "I noticed your message might contain inappropriate \
content. Let's keep our conversation focused on the interview. Could you please rephrase your response?";

pub const TECHNICAL_ISSUE_MESSAGE: &str = "I apologize for the technical issue. Let's continue \
with the interview. Could you please repeat your last response?";

pub const GENERIC_RETRY_MESSAGE: &str =
    "I'm having trouble processing your request. Could you please try again?";

pub const EVALUATION_FALLBACK_MESSAGE: &str =
    "Thank you for completing the interview! We'll review your responses and get back to you soon.";

pub const TURN_LIMIT_MESSAGE: &str =
    "We've reached the end of our time together, so let's wrap up the interview here.";

pub const ALREADY_COMPLETE_MESSAGE: &str = "This interview has already ended.";

pub const HELP_MESSAGE: &str = "Available commands:\n\
  • hint: get a nudge on the current problem\n\
  • help: show this message\n\
Anything else you type is sent to the interviewer as your answer.";

pub fn evaluation_message(summary: &str) -> String {
    format!(
        "Thank you for completing the interview! Here's your evaluation summary:\n\n{summary}\n\n\
The detailed evaluation has been generated and will be reviewed by our team."
    )
}
