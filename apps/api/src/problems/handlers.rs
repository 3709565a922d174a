//! Axum route handlers for browsing the problem banks outside an interview.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::problems::{Difficulty, Problem, ProblemSource};
use crate::state::AppState;

const DEFAULT_COUNT: usize = 5;
const MAX_COUNT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct ProblemQuery {
    pub source: Option<ProblemSource>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetQuery {
    pub source: Option<ProblemSource>,
    pub level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TopicQuery {
    pub difficulty: Option<String>,
    pub count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RatingQuery {
    pub min: u32,
    pub max: u32,
    pub count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct TagsQuery {
    /// Comma-separated Codeforces tags.
    pub tags: String,
    pub difficulty: Option<String>,
    pub count: Option<usize>,
}

fn difficulty_or_medium(label: Option<&str>) -> Difficulty {
    label.map(Difficulty::from_label).unwrap_or(Difficulty::Medium)
}

fn clamp_count(count: Option<usize>) -> usize {
    count.unwrap_or(DEFAULT_COUNT).clamp(1, MAX_COUNT)
}

/// GET /api/v1/problems?source=&difficulty=
///
/// One problem from the chosen bank. Random across both banks when no source is given.
pub async fn handle_get_problem(
    State(state): State<AppState>,
    Query(query): Query<ProblemQuery>,
) -> Json<Problem> {
    let problem = match (query.source, query.difficulty.as_deref()) {
        (Some(source), difficulty) => {
            state
                .problems
                .problem_from(source, difficulty_or_medium(difficulty))
                .await
        }
        (None, Some(difficulty)) => {
            let source = if rand::random::<bool>() {
                ProblemSource::Leetcode
            } else {
                ProblemSource::Codeforces
            };
            state
                .problems
                .problem_from(source, Difficulty::from_label(difficulty))
                .await
        }
        (None, None) => {
            if rand::random::<bool>() {
                state.problems.leetcode.random_problem().await
            } else {
                state.problems.codeforces.random_problem().await
            }
        }
    };
    Json(problem)
}

/// GET /api/v1/problems/search?q=&difficulty=
pub async fn handle_search_problems(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Problem>>, AppError> {
    if query.q.trim().is_empty() {
        return Err(AppError::Validation("q cannot be empty".to_string()));
    }

    let difficulty = query.difficulty.as_deref().map(Difficulty::from_label);
    Ok(Json(state.problems.search(query.q.trim(), difficulty).await))
}

/// GET /api/v1/problems/set?source=&level=
///
/// Three problems sized for a candidate level.
pub async fn handle_problem_set(
    State(state): State<AppState>,
    Query(query): Query<SetQuery>,
) -> Json<Vec<Problem>> {
    let source = query.source.unwrap_or(ProblemSource::Leetcode);
    let level = query.level.as_deref().unwrap_or("mid");
    Json(state.problems.problem_set(source, level).await)
}

/// GET /api/v1/problems/leetcode/:slug
pub async fn handle_leetcode_problem(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Problem>, AppError> {
    Ok(Json(state.problems.leetcode.fetch_problem_details(&slug).await?))
}

/// GET /api/v1/problems/leetcode/topics/:topic?difficulty=&count=
pub async fn handle_leetcode_topic(
    State(state): State<AppState>,
    Path(topic): Path<String>,
    Query(query): Query<TopicQuery>,
) -> Json<Vec<Problem>> {
    let problems = state
        .problems
        .leetcode
        .problems_by_topic(
            &topic,
            difficulty_or_medium(query.difficulty.as_deref()),
            clamp_count(query.count),
        )
        .await;
    Json(problems)
}

/// GET /api/v1/problems/codeforces/:contest_id/:index
pub async fn handle_codeforces_problem(
    State(state): State<AppState>,
    Path((contest_id, index)): Path<(u32, String)>,
) -> Result<Json<Problem>, AppError> {
    let problem = state
        .problems
        .codeforces
        .fetch_problem_details(contest_id, &index.to_uppercase())
        .await?;
    Ok(Json(problem))
}

/// GET /api/v1/problems/codeforces/contests/:contest_id
pub async fn handle_codeforces_contest(
    State(state): State<AppState>,
    Path(contest_id): Path<u32>,
) -> Result<Json<Vec<Problem>>, AppError> {
    Ok(Json(
        state.problems.codeforces.contest_problems(contest_id).await?,
    ))
}

/// GET /api/v1/problems/codeforces/rating?min=&max=&count=
pub async fn handle_codeforces_rating(
    State(state): State<AppState>,
    Query(query): Query<RatingQuery>,
) -> Result<Json<Vec<Problem>>, AppError> {
    if query.min > query.max {
        return Err(AppError::UnprocessableEntity(format!(
            "min rating {} is above max rating {}",
            query.min, query.max
        )));
    }

    let problems = state
        .problems
        .codeforces
        .problems_by_rating_range(query.min, query.max, clamp_count(query.count))
        .await;
    Ok(Json(problems))
}

/// GET /api/v1/problems/codeforces/tags?tags=dp,greedy&difficulty=&count=
pub async fn handle_codeforces_tags(
    State(state): State<AppState>,
    Query(query): Query<TagsQuery>,
) -> Result<Json<Vec<Problem>>, AppError> {
    let tags: Vec<String> = query
        .tags
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    if tags.is_empty() {
        return Err(AppError::Validation("tags cannot be empty".to_string()));
    }

    let problems = state
        .problems
        .codeforces
        .problems_by_tags(
            &tags,
            difficulty_or_medium(query.difficulty.as_deref()),
            clamp_count(query.count),
        )
        .await;
    Ok(Json(problems))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_is_clamped() {
        assert_eq!(clamp_count(None), DEFAULT_COUNT);
        assert_eq!(clamp_count(Some(0)), 1);
        assert_eq!(clamp_count(Some(500)), MAX_COUNT);
    }

    #[test]
    fn test_missing_difficulty_defaults_to_medium() {
        assert_eq!(difficulty_or_medium(None), Difficulty::Medium);
        assert_eq!(difficulty_or_medium(Some("hard")), Difficulty::Hard);
    }
}
