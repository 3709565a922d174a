//! LeetCode problem bank. Curated interview problems, enriched through the public GraphQL API.

use std::collections::HashMap;
use std::sync::{LazyLock, RwLock};
use std::time::Duration;

use rand::seq::SliceRandom;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{Difficulty, Example, Problem, ProblemApiError, ProblemOrigin};

pub const LEETCODE_GRAPHQL_URL: &str = "https://leetcode.com/graphql";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const SEARCH_LIMIT: usize = 5;

const QUESTION_DETAIL_QUERY: &str = r#"
query getQuestionDetail($titleSlug: String!) {
    question(titleSlug: $titleSlug) {
        questionId
        questionFrontendId
        title
        titleSlug
        content
        difficulty
        exampleTestcases
        topicTags {
            name
            slug
        }
        hints
    }
}
"#;

#[derive(Debug, Clone, Copy)]
pub struct CuratedProblem {
    pub id: u32,
    pub title: &'static str,
    pub slug: &'static str,
}

const fn p(id: u32, title: &'static str, slug: &'static str) -> CuratedProblem {
    CuratedProblem { id, title, slug }
}

const EASY: &[CuratedProblem] = &[
    p(1, "Two Sum", "two-sum"),
    p(26, "Remove Duplicates from Sorted Array", "remove-duplicates-from-sorted-array"),
    p(121, "Best Time to Buy and Sell Stock", "best-time-to-buy-and-sell-stock"),
    p(125, "Valid Palindrome", "valid-palindrome"),
    p(136, "Single Number", "single-number"),
    p(169, "Majority Element", "majority-element"),
    p(217, "Contains Duplicate", "contains-duplicate"),
    p(242, "Valid Anagram", "valid-anagram"),
    p(268, "Missing Number", "missing-number"),
    p(283, "Move Zeroes", "move-zeroes"),
];

const MEDIUM: &[CuratedProblem] = &[
    p(
        3,
        "Longest Substring Without Repeating Characters",
        "longest-substring-without-repeating-characters",
    ),
    p(15, "3Sum", "3sum"),
    p(33, "Search in Rotated Sorted Array", "search-in-rotated-sorted-array"),
    p(49, "Group Anagrams", "group-anagrams"),
    p(56, "Merge Intervals", "merge-intervals"),
    p(75, "Sort Colors", "sort-colors"),
    p(102, "Binary Tree Level Order Traversal", "binary-tree-level-order-traversal"),
    p(139, "Word Break", "word-break"),
    p(200, "Number of Islands", "number-of-islands"),
    p(238, "Product of Array Except Self", "product-of-array-except-self"),
];

const HARD: &[CuratedProblem] = &[
    p(4, "Median of Two Sorted Arrays", "median-of-two-sorted-arrays"),
    p(23, "Merge k Sorted Lists", "merge-k-sorted-lists"),
    p(25, "Reverse Nodes in k-Group", "reverse-nodes-in-k-group"),
    p(42, "Trapping Rain Water", "trapping-rain-water"),
    p(76, "Minimum Window Substring", "minimum-window-substring"),
    p(84, "Largest Rectangle in Histogram", "largest-rectangle-in-histogram"),
    p(124, "Binary Tree Maximum Path Sum", "binary-tree-maximum-path-sum"),
    p(295, "Find Median from Data Stream", "find-median-from-data-stream"),
];

/// Slug prefixes per topic, matched against the curated table.
const TOPIC_SLUGS: &[(&str, &[&str])] = &[
    ("array", &["two-sum", "remove-duplicates", "merge-intervals"]),
    ("string", &["valid-palindrome", "valid-anagram", "group-anagrams"]),
    ("tree", &["binary-tree-level-order-traversal", "binary-tree-maximum-path-sum"]),
    ("dynamic-programming", &["word-break", "best-time-to-buy-and-sell-stock"]),
];

pub fn curated(difficulty: Difficulty) -> &'static [CuratedProblem] {
    match difficulty {
        Difficulty::Easy => EASY,
        Difficulty::Medium => MEDIUM,
        Difficulty::Hard => HARD,
    }
}

/// Difficulty triples for a full interview by candidate level. Unknown levels use `mid`.
fn level_difficulties(level: &str) -> [Difficulty; 3] {
    use Difficulty::*;
    match level.to_lowercase().as_str() {
        "junior" => [Easy, Easy, Medium],
        "senior" => [Medium, Medium, Hard],
        "staff" => [Medium, Hard, Hard],
        _ => [Easy, Medium, Medium],
    }
}

// ─── GraphQL wire types ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<QuestionData>,
}

#[derive(Debug, Deserialize)]
struct QuestionData {
    question: Option<QuestionDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionDetail {
    question_frontend_id: String,
    title: String,
    title_slug: String,
    content: Option<String>,
    difficulty: Option<String>,
    example_testcases: Option<String>,
    #[serde(default)]
    topic_tags: Vec<TopicTag>,
    #[serde(default)]
    hints: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TopicTag {
    name: String,
}

// ─── Client ─────────────────────────────────────────────────────────────────

pub struct LeetCodeClient {
    client: Client,
    graphql_url: String,
    cache: RwLock<HashMap<String, Problem>>,
}

impl LeetCodeClient {
    pub fn with_base_url(graphql_url: String) -> Result<Self, ProblemApiError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            graphql_url,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Fetches full problem details by slug. Successful lookups are cached for the client's
    /// lifetime.
    pub async fn fetch_problem_details(&self, slug: &str) -> Result<Problem, ProblemApiError> {
        if let Some(cached) = self.cache.read().ok().and_then(|c| c.get(slug).cloned()) {
            debug!(slug, "LeetCode cache hit");
            return Ok(cached);
        }

        let response = self
            .client
            .post(&self.graphql_url)
            .json(&json!({
                "query": QUESTION_DETAIL_QUERY,
                "variables": { "titleSlug": slug },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProblemApiError::Status(response.status().as_u16()));
        }

        let body: GraphQlResponse = response.json().await?;
        let detail = body
            .data
            .and_then(|d| d.question)
            .ok_or_else(|| ProblemApiError::NotFound(slug.to_string()))?;

        let problem = format_problem(detail);
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(slug.to_string(), problem.clone());
        }
        Ok(problem)
    }

    /// A random curated problem at `difficulty`, with static details when the API is unavailable.
    pub async fn problem_by_difficulty(&self, difficulty: Difficulty) -> Problem {
        let table = curated(difficulty);
        let Some(selected) = table.choose(&mut rand::thread_rng()).copied() else {
            return fallback_problem(&EASY[0], Difficulty::Easy);
        };
        self.details_or_fallback(&selected, difficulty).await
    }

    /// Problems matching a topic keyword. Unknown topics draw from the whole difficulty.
    pub async fn problems_by_topic(
        &self,
        topic: &str,
        difficulty: Difficulty,
        count: usize,
    ) -> Vec<Problem> {
        let table = curated(difficulty);
        let topic = topic.to_lowercase();
        let prefixes = TOPIC_SLUGS
            .iter()
            .find(|(name, _)| *name == topic)
            .map(|(_, slugs)| *slugs)
            .unwrap_or(&[]);

        let mut candidates: Vec<CuratedProblem> = table
            .iter()
            .filter(|p| prefixes.iter().any(|prefix| p.slug.starts_with(prefix)))
            .copied()
            .collect();
        if candidates.is_empty() {
            candidates = table.to_vec();
        }

        let selected: Vec<CuratedProblem> = candidates
            .choose_multiple(&mut rand::thread_rng(), count.min(candidates.len()))
            .copied()
            .collect();

        let mut problems = Vec::with_capacity(selected.len());
        for entry in &selected {
            problems.push(self.details_or_fallback(entry, difficulty).await);
        }
        problems
    }

    /// Case-insensitive title search over the curated tables. Only fetchable problems are returned.
    pub async fn search(&self, query: &str, difficulty: Option<Difficulty>) -> Vec<Problem> {
        let query = query.to_lowercase();
        let difficulties = match difficulty {
            Some(d) => vec![d],
            None => vec![Difficulty::Easy, Difficulty::Medium, Difficulty::Hard],
        };

        let mut results = Vec::new();
        for entry in difficulties
            .into_iter()
            .flat_map(curated)
            .filter(|p| p.title.to_lowercase().contains(&query))
        {
            if results.len() >= SEARCH_LIMIT {
                break;
            }
            match self.fetch_problem_details(entry.slug).await {
                Ok(problem) => results.push(problem),
                Err(e) => debug!(slug = entry.slug, "Skipping search hit: {e}"),
            }
        }
        results
    }

    /// Easy or medium, chosen at random.
    pub async fn random_problem(&self) -> Problem {
        let difficulty = if rand::random::<bool>() {
            Difficulty::Easy
        } else {
            Difficulty::Medium
        };
        self.problem_by_difficulty(difficulty).await
    }

    pub async fn interview_problem_set(&self, level: &str) -> Vec<Problem> {
        let mut problems = Vec::with_capacity(3);
        for difficulty in level_difficulties(level) {
            problems.push(self.problem_by_difficulty(difficulty).await);
        }
        problems
    }

    async fn details_or_fallback(&self, entry: &CuratedProblem, difficulty: Difficulty) -> Problem {
        match self.fetch_problem_details(entry.slug).await {
            Ok(problem) => problem,
            Err(e) => {
                warn!(slug = entry.slug, "LeetCode fetch failed, using static details: {e}");
                fallback_problem(entry, difficulty)
            }
        }
    }
}

fn format_problem(detail: QuestionDetail) -> Problem {
    let url = format!("https://leetcode.com/problems/{}/", detail.title_slug);
    Problem {
        id: detail.question_frontend_id,
        title: detail.title,
        slug: Some(detail.title_slug),
        difficulty: Difficulty::from_label(detail.difficulty.as_deref().unwrap_or("")),
        description: clean_html(detail.content.as_deref().unwrap_or("")),
        hints: detail.hints,
        topics: detail.topic_tags.into_iter().map(|t| t.name).collect(),
        examples: parse_examples(detail.example_testcases.as_deref().unwrap_or("")),
        source: ProblemOrigin::Leetcode,
        url: Some(url),
        rating: None,
        time_limit: None,
        memory_limit: None,
    }
}

static HTML_TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]+>").ok());
static WHITESPACE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\s+").ok());

/// Strips tags, collapses whitespace and decodes the handful of entities LeetCode uses.
pub fn clean_html(html: &str) -> String {
    let mut text = html.to_string();
    if let Some(re) = HTML_TAG.as_ref() {
        text = re.replace_all(&text, "").into_owned();
    }
    if let Some(re) = WHITESPACE.as_ref() {
        text = re.replace_all(&text, " ").into_owned();
    }
    text.trim()
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Pairs consecutive lines as input/output. A trailing unpaired line is dropped.
pub fn parse_examples(testcases: &str) -> Vec<Example> {
    let lines: Vec<&str> = testcases.trim().lines().collect();
    lines
        .chunks_exact(2)
        .map(|pair| Example {
            input: pair[0].to_string(),
            output: pair[1].to_string(),
        })
        .collect()
}

fn fallback_problem(entry: &CuratedProblem, difficulty: Difficulty) -> Problem {
    let (description, hints): (String, Vec<&str>) = match entry.slug {
        "two-sum" => (
            "Given an array of integers nums and an integer target, return indices of the two \
numbers such that they add up to target.

You may assume that each input would have exactly one solution, and you may not use the same \
element twice.

Example:
Input: nums = [2,7,11,15], target = 9
Output: [0,1]
Explanation: Because nums[0] + nums[1] == 9, we return [0, 1]."
                .to_string(),
            vec![
                "Try using a hash map to store numbers you've seen",
                "For each number, check if target - number exists in your hash map",
            ],
        ),
        "valid-palindrome" => (
            "A phrase is a palindrome if, after converting all uppercase letters into lowercase \
letters and removing all non-alphanumeric characters, it reads the same forward and backward.

Given a string s, return true if it is a palindrome, or false otherwise.

Example:
Input: s = \"A man, a plan, a canal: Panama\"
Output: true
Explanation: \"amanaplanacanalpanama\" is a palindrome."
                .to_string(),
            vec![
                "Use two pointers, one from start and one from end",
                "Skip non-alphanumeric characters and compare lowercase versions",
            ],
        ),
        _ => (
            format!("This is a {difficulty} level coding problem. Please solve it step by step."),
            vec!["Think about the problem systematically", "Consider edge cases"],
        ),
    };

    Problem {
        id: entry.id.to_string(),
        title: entry.title.to_string(),
        slug: Some(entry.slug.to_string()),
        difficulty,
        description,
        hints: hints.into_iter().map(str::to_string).collect(),
        topics: Vec::new(),
        examples: Vec::new(),
        source: ProblemOrigin::LeetcodeFallback,
        url: Some(format!("https://leetcode.com/problems/{}/", entry.slug)),
        rating: None,
        time_limit: None,
        memory_limit: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn question_body(slug: &str, title: &str) -> serde_json::Value {
        json!({
            "data": {
                "question": {
                    "questionId": "1",
                    "questionFrontendId": "1",
                    "title": title,
                    "titleSlug": slug,
                    "content": "<p>Given an array&nbsp;<code>nums</code>,\n\n return &lt;indices&gt;.</p>",
                    "difficulty": "Easy",
                    "exampleTestcases": "[2,7,11,15]\n9\n[3,2,4]\n6",
                    "topicTags": [{"name": "Array", "slug": "array"}, {"name": "Hash Table", "slug": "hash-table"}],
                    "hints": ["Use a hash map"]
                }
            }
        })
    }

    async fn client_for(server: &MockServer) -> LeetCodeClient {
        LeetCodeClient::with_base_url(format!("{}/graphql", server.uri())).unwrap()
    }

    #[test]
    fn test_curated_table_sizes() {
        assert_eq!(curated(Difficulty::Easy).len(), 10);
        assert_eq!(curated(Difficulty::Medium).len(), 10);
        assert_eq!(curated(Difficulty::Hard).len(), 8);
    }

    #[test]
    fn test_clean_html() {
        let cleaned =
            clean_html("<p>Find&nbsp;the <b>max</b>\n\n  if a &lt; b &amp;&amp; b &gt; c</p>");
        assert_eq!(cleaned, "Find the max if a < b && b > c");
    }

    #[test]
    fn test_parse_examples_pairs_lines() {
        let examples = parse_examples("[1,2]\n3\n[4]\n4\ntrailing");
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].input, "[1,2]");
        assert_eq!(examples[1].output, "4");
        assert!(parse_examples("").is_empty());
    }

    #[test]
    fn test_level_difficulties_default_to_mid() {
        assert_eq!(
            level_difficulties("principal"),
            [Difficulty::Easy, Difficulty::Medium, Difficulty::Medium]
        );
        assert_eq!(level_difficulties("STAFF")[2], Difficulty::Hard);
    }

    #[tokio::test]
    async fn test_fetch_problem_details_parses_and_caches() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_partial_json(json!({"variables": {"titleSlug": "two-sum"}})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(question_body("two-sum", "Two Sum")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let problem = client.fetch_problem_details("two-sum").await.unwrap();
        assert_eq!(problem.title, "Two Sum");
        assert_eq!(problem.source, ProblemOrigin::Leetcode);
        assert_eq!(problem.difficulty, Difficulty::Easy);
        assert_eq!(problem.description, "Given an array nums, return <indices>.");
        assert_eq!(problem.topics, vec!["Array", "Hash Table"]);
        assert_eq!(problem.examples.len(), 2);
        assert_eq!(problem.url.as_deref(), Some("https://leetcode.com/problems/two-sum/"));

        // second lookup is served from the cache
        let again = client.fetch_problem_details("two-sum").await.unwrap();
        assert_eq!(again, problem);
    }

    #[tokio::test]
    async fn test_missing_question_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"question": null}})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.fetch_problem_details("no-such-problem").await.unwrap_err();
        assert!(matches!(err, ProblemApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_problem_by_difficulty_falls_back_on_api_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let problem = client.problem_by_difficulty(Difficulty::Medium).await;
        assert_eq!(problem.source, ProblemOrigin::LeetcodeFallback);
        assert_eq!(problem.difficulty, Difficulty::Medium);
        assert_eq!(
            problem.description,
            "This is a medium level coding problem. Please solve it step by step."
        );
        assert_eq!(problem.hints.len(), 2);
    }

    #[test]
    fn test_static_fallback_for_two_sum() {
        let problem = fallback_problem(&EASY[0], Difficulty::Easy);
        assert!(problem.description.starts_with("Given an array of integers nums"));
        assert_eq!(problem.hints[0], "Try using a hash map to store numbers you've seen");
    }

    #[tokio::test]
    async fn test_problems_by_topic_limits_to_matching_slugs() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let problems = client.problems_by_topic("string", Difficulty::Easy, 5).await;
        let titles: Vec<&str> = problems.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles.len(), 2);
        assert!(titles.contains(&"Valid Palindrome"));
        assert!(titles.contains(&"Valid Anagram"));

        let any = client.problems_by_topic("graphs", Difficulty::Hard, 3).await;
        assert_eq!(any.len(), 3);
    }

    #[tokio::test]
    async fn test_search_returns_only_fetched_matches() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"variables": {"titleSlug": "valid-anagram"}})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(question_body("valid-anagram", "Valid Anagram")),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let results = client.search("VALID", None).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Valid Anagram");
    }
}
