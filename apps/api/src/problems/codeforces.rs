//! Codeforces problem bank. The public API exposes metadata only, so descriptions are synthesized.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use rand::seq::SliceRandom;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Difficulty, Problem, ProblemApiError, ProblemOrigin};

pub const CODEFORCES_API_URL: &str = "https://codeforces.com/api";
const STANDINGS_TIMEOUT: Duration = Duration::from_secs(10);
const PROBLEMSET_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_RATING: u32 = 800;
const DEFAULT_TIME_LIMIT_MS: u32 = 1000;
const DEFAULT_MEMORY_LIMIT_MB: u32 = 256;
const SEARCH_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct CuratedProblem {
    pub contest_id: u32,
    pub index: &'static str,
    pub name: &'static str,
    pub rating: u32,
}

const fn p(
    contest_id: u32,
    index: &'static str,
    name: &'static str,
    rating: u32,
) -> CuratedProblem {
    CuratedProblem {
        contest_id,
        index,
        name,
        rating,
    }
}

const EASY: &[CuratedProblem] = &[
    p(4, "A", "Watermelon", 800),
    p(71, "A", "Way Too Long Words", 800),
    p(231, "A", "Team", 800),
    p(282, "A", "Bit++", 800),
    p(339, "A", "Helpful Maths", 800),
    p(266, "A", "Stones on the Table", 800),
    p(112, "A", "Petya and Strings", 800),
    p(158, "A", "Next Round", 800),
    p(236, "A", "Boy or Girl", 800),
    p(263, "A", "Beautiful Matrix", 800),
];

const MEDIUM: &[CuratedProblem] = &[
    p(1, "A", "Theatre Square", 1000),
    p(50, "A", "Domino piling", 800),
    p(118, "A", "String Task", 1000),
    p(122, "A", "Lucky Division", 1000),
    p(160, "A", "Twins", 900),
    p(148, "A", "Insomnia cure", 900),
    p(116, "A", "Tram", 800),
    p(69, "A", "Young Physicist", 1000),
    p(144, "A", "Arrival of the General", 800),
    p(467, "A", "George and Accommodation", 800),
];

const HARD: &[CuratedProblem] = &[
    p(580, "C", "Kefa and Park", 1500),
    p(492, "B", "Vanya and Lanterns", 1200),
    p(279, "B", "Books", 1400),
    p(276, "C", "Little Girl and Maximum Sum", 1400),
    p(368, "B", "Sereja and Suffixes", 1100),
    p(433, "B", "Kuriyama Mirai's Stones", 1200),
    p(472, "A", "Design Tutorial: Learn from Math", 1000),
    p(451, "B", "Sort the Array", 1300),
];

pub fn curated(difficulty: Difficulty) -> &'static [CuratedProblem] {
    match difficulty {
        Difficulty::Easy => EASY,
        Difficulty::Medium => MEDIUM,
        Difficulty::Hard => HARD,
    }
}

fn all_curated() -> impl Iterator<Item = &'static CuratedProblem> {
    EASY.iter().chain(MEDIUM).chain(HARD)
}

pub fn rating_to_difficulty(rating: u32) -> Difficulty {
    match rating {
        0..=900 => Difficulty::Easy,
        901..=1400 => Difficulty::Medium,
        _ => Difficulty::Hard,
    }
}

/// Difficulty triples by competitive level. Unknown levels use `beginner`.
fn level_difficulties(level: &str) -> [Difficulty; 3] {
    use Difficulty::*;
    match level.to_lowercase().as_str() {
        "intermediate" => [Easy, Medium, Medium],
        "advanced" => [Medium, Medium, Hard],
        "expert" => [Medium, Hard, Hard],
        _ => [Easy, Easy, Medium],
    }
}

fn problem_url(contest_id: u32, index: &str) -> String {
    format!("https://codeforces.com/contest/{contest_id}/problem/{index}")
}

// ─── API wire types ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    status: String,
    comment: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ProblemList {
    #[serde(default)]
    problems: Vec<CfProblem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfProblem {
    contest_id: Option<u32>,
    index: String,
    name: String,
    rating: Option<u32>,
    #[serde(default)]
    tags: Vec<String>,
}

// ─── Client ─────────────────────────────────────────────────────────────────

pub struct CodeforcesClient {
    client: Client,
    api_url: String,
    cache: RwLock<HashMap<String, Problem>>,
}

impl CodeforcesClient {
    pub fn with_base_url(api_url: String) -> Result<Self, ProblemApiError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Looks a problem up in its contest's standings, then in the full problemset.
    pub async fn fetch_problem_details(
        &self,
        contest_id: u32,
        index: &str,
    ) -> Result<Problem, ProblemApiError> {
        let cache_key = format!("{contest_id}_{index}");
        if let Some(cached) = self.cache.read().ok().and_then(|c| c.get(&cache_key).cloned()) {
            debug!(%cache_key, "Codeforces cache hit");
            return Ok(cached);
        }

        let from_standings = match self.standings_problems(contest_id).await {
            Ok(problems) => problems
                .into_iter()
                .find(|p| p.index == index && p.contest_id.map_or(true, |c| c == contest_id)),
            Err(e) => {
                debug!(contest_id, "contest.standings lookup failed: {e}");
                None
            }
        };

        let found = match from_standings {
            Some(problem) => problem,
            None => self.problemset_lookup(contest_id, index).await?,
        };

        let problem = format_problem(&found, contest_id);
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(cache_key, problem.clone());
        }
        Ok(problem)
    }

    pub async fn problem_by_difficulty(&self, difficulty: Difficulty) -> Problem {
        let table = curated(difficulty);
        let Some(selected) = table.choose(&mut rand::thread_rng()).copied() else {
            return fallback_problem(&EASY[0], Difficulty::Easy);
        };
        self.details_or_fallback(&selected, difficulty).await
    }

    /// Curated problems rated within `[min_rating, max_rating]`; the easy table when none are.
    pub async fn problems_by_rating_range(
        &self,
        min_rating: u32,
        max_rating: u32,
        count: usize,
    ) -> Vec<Problem> {
        let mut candidates: Vec<CuratedProblem> = all_curated()
            .filter(|p| (min_rating..=max_rating).contains(&p.rating))
            .copied()
            .collect();
        if candidates.is_empty() {
            candidates = EASY.to_vec();
        }

        let selected: Vec<CuratedProblem> = candidates
            .choose_multiple(&mut rand::thread_rng(), count.min(candidates.len()))
            .copied()
            .collect();

        let mut problems = Vec::with_capacity(selected.len());
        for entry in &selected {
            let difficulty = rating_to_difficulty(entry.rating);
            problems.push(self.details_or_fallback(entry, difficulty).await);
        }
        problems
    }

    /// Fetchable problems at `difficulty`, preferring those carrying one of `tags`.
    pub async fn problems_by_tags(
        &self,
        tags: &[String],
        difficulty: Difficulty,
        count: usize,
    ) -> Vec<Problem> {
        let table = curated(difficulty);
        let selected: Vec<CuratedProblem> = table
            .choose_multiple(&mut rand::thread_rng(), count.min(table.len()))
            .copied()
            .collect();

        let mut fetched = Vec::new();
        for entry in &selected {
            match self.fetch_problem_details(entry.contest_id, entry.index).await {
                Ok(problem) => fetched.push(problem),
                Err(e) => debug!(name = entry.name, "Skipping tag candidate: {e}"),
            }
        }

        let wanted: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();
        let matching: Vec<Problem> = fetched
            .iter()
            .filter(|p| p.topics.iter().any(|t| wanted.contains(&t.to_lowercase())))
            .cloned()
            .collect();

        if matching.is_empty() {
            fetched
        } else {
            matching
        }
    }

    pub async fn search(&self, query: &str) -> Vec<Problem> {
        let query = query.to_lowercase();
        let mut results = Vec::new();
        for entry in all_curated().filter(|p| p.name.to_lowercase().contains(&query)) {
            if results.len() >= SEARCH_LIMIT {
                break;
            }
            match self.fetch_problem_details(entry.contest_id, entry.index).await {
                Ok(problem) => results.push(problem),
                Err(e) => debug!(name = entry.name, "Skipping search hit: {e}"),
            }
        }
        results
    }

    pub async fn random_problem(&self) -> Problem {
        let difficulty = if rand::random::<bool>() {
            Difficulty::Easy
        } else {
            Difficulty::Medium
        };
        self.problem_by_difficulty(difficulty).await
    }

    /// Every problem of a contest, as listed in its standings.
    pub async fn contest_problems(&self, contest_id: u32) -> Result<Vec<Problem>, ProblemApiError> {
        let problems = self.standings_problems(contest_id).await?;
        Ok(problems
            .iter()
            .map(|p| format_problem(p, contest_id))
            .collect())
    }

    pub async fn competitive_set(&self, level: &str) -> Vec<Problem> {
        let mut problems = Vec::with_capacity(3);
        for difficulty in level_difficulties(level) {
            problems.push(self.problem_by_difficulty(difficulty).await);
        }
        problems
    }

    async fn standings_problems(&self, contest_id: u32) -> Result<Vec<CfProblem>, ProblemApiError> {
        let response = self
            .client
            .get(format!("{}/contest.standings", self.api_url))
            .query(&[
                ("contestId", contest_id.to_string()),
                ("from", "1".to_string()),
                ("count", "1".to_string()),
            ])
            .timeout(STANDINGS_TIMEOUT)
            .send()
            .await?;
        parse_problem_list(response).await
    }

    async fn problemset_lookup(
        &self,
        contest_id: u32,
        index: &str,
    ) -> Result<CfProblem, ProblemApiError> {
        let response = self
            .client
            .get(format!("{}/problemset.problems", self.api_url))
            .timeout(PROBLEMSET_TIMEOUT)
            .send()
            .await?;
        parse_problem_list(response)
            .await?
            .into_iter()
            .find(|p| p.contest_id == Some(contest_id) && p.index == index)
            .ok_or_else(|| ProblemApiError::NotFound(format!("{contest_id}{index}")))
    }

    async fn details_or_fallback(&self, entry: &CuratedProblem, difficulty: Difficulty) -> Problem {
        match self.fetch_problem_details(entry.contest_id, entry.index).await {
            Ok(problem) => problem,
            Err(e) => {
                warn!(name = entry.name, "Codeforces fetch failed, using static details: {e}");
                fallback_problem(entry, difficulty)
            }
        }
    }
}

async fn parse_problem_list(
    response: reqwest::Response,
) -> Result<Vec<CfProblem>, ProblemApiError> {
    if !response.status().is_success() {
        return Err(ProblemApiError::Status(response.status().as_u16()));
    }
    let envelope: ApiEnvelope<ProblemList> = response.json().await?;
    if envelope.status != "OK" {
        return Err(ProblemApiError::Api(
            envelope.comment.unwrap_or(envelope.status),
        ));
    }
    Ok(envelope.result.map(|r| r.problems).unwrap_or_default())
}

fn format_problem(problem: &CfProblem, contest_id: u32) -> Problem {
    let rating = problem.rating.unwrap_or(DEFAULT_RATING);
    Problem {
        id: format!("{contest_id}{}", problem.index),
        title: problem.name.clone(),
        slug: None,
        difficulty: rating_to_difficulty(rating),
        description: synthesized_description(&problem.name, rating, &problem.tags),
        hints: Vec::new(),
        topics: problem.tags.clone(),
        examples: Vec::new(),
        source: ProblemOrigin::Codeforces,
        url: Some(problem_url(contest_id, &problem.index)),
        rating: Some(rating),
        time_limit: Some(format!("{DEFAULT_TIME_LIMIT_MS}ms")),
        memory_limit: Some(format!("{DEFAULT_MEMORY_LIMIT_MB}MB")),
    }
}

fn synthesized_description(name: &str, rating: u32, tags: &[String]) -> String {
    let tags = if tags.is_empty() {
        "General problem solving".to_string()
    } else {
        tags.join(", ")
    };
    format!(
        "Problem: {name}

This is a competitive programming problem from Codeforces with a difficulty rating of {rating}.

Problem tags: {tags}

Since this is a competitive programming problem, focus on:
1. Understanding the problem constraints
2. Designing an efficient algorithm
3. Implementing a clean solution
4. Considering edge cases

Think about the time and space complexity of your solution."
    )
}

fn fallback_problem(entry: &CuratedProblem, difficulty: Difficulty) -> Problem {
    let description = match entry.name {
        "Watermelon" => "Given an integer representing the weight of a watermelon in kilograms, \
determine if it's possible to divide it into two parts such that each part weighs an even number \
of kilograms.

Example:
Input: 8
Output: YES (can be divided into 2 and 6, both even)

Input: 3
Output: NO (impossible to divide odd number into two even parts)"
            .to_string(),
        "Way Too Long Words" => "Sometimes words can be very long. If a word has strictly more \
than 10 characters, replace it with a special abbreviation: write the first character, then the \
number of characters between first and last, then the last character.

Example:
Input: \"localization\"
Output: \"l10n\" (l + 10 characters in between + n)"
            .to_string(),
        "Theatre Square" => "A theatre square in the capital city has a rectangular shape with \
dimensions n x m meters. It needs to be paved with square stones, each stone is a x a meters. \
Find the minimum number of stones needed to cover the entire square.

You can use partial stones (cut them if needed)."
            .to_string(),
        name => format!(
            "This is a {difficulty} competitive programming problem: {name}

Since we cannot fetch the full problem statement, please work with this general guidance:
- Focus on algorithmic thinking
- Consider time and space complexity
- Think about edge cases
- Implement a clean, efficient solution"
        ),
    };

    Problem {
        id: format!("{}{}", entry.contest_id, entry.index),
        title: entry.name.to_string(),
        slug: None,
        difficulty,
        description,
        hints: Vec::new(),
        topics: Vec::new(),
        examples: Vec::new(),
        source: ProblemOrigin::CodeforcesFallback,
        url: Some(problem_url(entry.contest_id, entry.index)),
        rating: Some(entry.rating),
        time_limit: None,
        memory_limit: None,
    }
}
