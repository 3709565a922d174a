// Problem banks: curated LeetCode and Codeforces tables backed by their public APIs,
// plus a fixed pool of challenging problems used when nothing fresh can be drawn.

pub mod codeforces;
pub mod fallback;
pub mod handlers;
pub mod leetcode;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use self::codeforces::CodeforcesClient;
use self::leetcode::LeetCodeClient;

/// Draws made before giving up on finding a question the session hasn't seen.
const MAX_DRAWS: usize = 3;

#[derive(Debug, Error)]
pub enum ProblemApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Problem API returned status {0}")]
    Status(u16),

    #[error("Problem API error: {0}")]
    Api(String),

    #[error("Problem not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Case-insensitive parse; anything unrecognised is treated as easy.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Easy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a problem's data actually came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemOrigin {
    Leetcode,
    LeetcodeFallback,
    Codeforces,
    CodeforcesFallback,
    FallbackRandom,
}

impl ProblemOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemOrigin::Leetcode => "leetcode",
            ProblemOrigin::LeetcodeFallback => "leetcode_fallback",
            ProblemOrigin::Codeforces => "codeforces",
            ProblemOrigin::CodeforcesFallback => "codeforces_fallback",
            ProblemOrigin::FallbackRandom => "fallback_random",
        }
    }

    /// Name shown to the candidate.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProblemOrigin::Leetcode | ProblemOrigin::LeetcodeFallback => "LeetCode",
            ProblemOrigin::Codeforces | ProblemOrigin::CodeforcesFallback => "Codeforces",
            ProblemOrigin::FallbackRandom => "Curated",
        }
    }
}

/// Problem bank selector used by the HTTP surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemSource {
    Leetcode,
    Codeforces,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: String,
    pub title: String,
    pub slug: Option<String>,
    pub difficulty: Difficulty,
    pub description: String,
    #[serde(default)]
    pub hints: Vec<String>,
    /// LeetCode topic tags or Codeforces problem tags.
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub examples: Vec<Example>,
    pub source: ProblemOrigin,
    pub url: Option<String>,
    pub rating: Option<u32>,
    pub time_limit: Option<String>,
    pub memory_limit: Option<String>,
}

/// Supplies interview questions to the workflow.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Returns a question, avoiding titles already asked where possible. Never fails.
    async fn next_question(&self, difficulty: Difficulty, asked_titles: &[String]) -> Problem;
}

pub struct ProblemBank {
    pub leetcode: LeetCodeClient,
    pub codeforces: CodeforcesClient,
}

impl ProblemBank {
    pub fn new(leetcode: LeetCodeClient, codeforces: CodeforcesClient) -> Self {
        Self {
            leetcode,
            codeforces,
        }
    }

    pub async fn problem_from(&self, source: ProblemSource, difficulty: Difficulty) -> Problem {
        match source {
            ProblemSource::Leetcode => self.leetcode.problem_by_difficulty(difficulty).await,
            ProblemSource::Codeforces => self.codeforces.problem_by_difficulty(difficulty).await,
        }
    }

    /// Title search across both banks.
    pub async fn search(&self, query: &str, difficulty: Option<Difficulty>) -> Vec<Problem> {
        let mut results = self.leetcode.search(query, difficulty).await;
        results.extend(self.codeforces.search(query).await);
        results
    }

    /// A three-problem set for the given level. LeetCode levels are junior/mid/senior/staff,
    /// Codeforces levels are beginner/intermediate/advanced/expert.
    pub async fn problem_set(&self, source: ProblemSource, level: &str) -> Vec<Problem> {
        match source {
            ProblemSource::Leetcode => self.leetcode.interview_problem_set(level).await,
            ProblemSource::Codeforces => self.codeforces.competitive_set(level).await,
        }
    }
}

#[async_trait]
impl QuestionProvider for ProblemBank {
    async fn next_question(&self, difficulty: Difficulty, asked_titles: &[String]) -> Problem {
        for attempt in 1..=MAX_DRAWS {
            let source = if rand::random::<bool>() {
                ProblemSource::Leetcode
            } else {
                ProblemSource::Codeforces
            };
            let problem = self.problem_from(source, difficulty).await;
            if !asked_titles.contains(&problem.title) {
                info!(
                    title = %problem.title,
                    source = problem.source.as_str(),
                    "Selected interview question"
                );
                return problem;
            }
            debug!(attempt, title = %problem.title, "Drew an already-asked question");
        }

        fallback::random_unasked(asked_titles)
    }
}
