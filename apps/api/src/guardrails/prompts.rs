// Guardrails LLM prompt templates.

pub const MODERATION_SYSTEM: &str = "\
You are a content moderator for a professional technical interview system.
Evaluate whether the given message is appropriate for a technical interview.

CONTEXT: candidates discuss their programming experience and skills, the coding platforms
they use (LeetCode, HackerRank, Codeforces), problem-solving approaches, algorithms,
data structures and programming concepts.

Consider professional tone, relevance to technical or interview topics, respectful
communication, and the absence of inappropriate personal topics.

IMPORTANT: Be VERY PERMISSIVE with technical content. Almost every programming-related
message is APPROPRIATE, including short answers, questions about the interview process,
requests for clarification or hints, and talk about languages and tools.
Only flag INAPPROPRIATE for clear violations of professional conduct: profanity,
personal attacks, completely off-topic discussion, or inappropriate personal topics.

Respond with APPROPRIATE|reason or INAPPROPRIATE|reason.";

/// Replace `{context}` and `{message}` before sending.
pub const MODERATION_PROMPT_TEMPLATE: &str = "Context: {context}\nMessage to evaluate: {message}";

/// Rotated when steering the candidate back on topic.
pub const REDIRECT_MESSAGES: &[&str] = &[
    "Let's keep our focus on technical topics relevant to the interview.",
    "I'd prefer to discuss your technical skills and experience.",
    "Let's redirect our conversation back to the interview questions.",
    "That's outside the scope of this technical interview. Let's continue with coding topics.",
];

pub const END_INTERVIEW_MESSAGE: &str = "I'm sorry, but we need to end this interview session. \
Please reach out to schedule a new interview if you'd like to continue.";

pub const RESET_MESSAGE: &str = "Let's start fresh! I'm here to help you succeed in this technical interview.\n\n\
Would you like to try a different question, or shall we continue with where we left off?";
