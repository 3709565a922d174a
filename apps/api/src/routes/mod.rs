pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::archive::handlers as archive;
use crate::problems::handlers as problems;
use crate::state::AppState;
use crate::workflow::handlers as interviews;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interview API
        .route(
            "/api/v1/interviews",
            post(interviews::handle_start_interview),
        )
        .route(
            "/api/v1/interviews/:id",
            get(interviews::handle_get_interview),
        )
        .route(
            "/api/v1/interviews/:id/messages",
            post(interviews::handle_message),
        )
        .route("/api/v1/interviews/:id/hint", post(interviews::handle_hint))
        .route(
            "/api/v1/interviews/:id/reset",
            post(interviews::handle_reset),
        )
        .route(
            "/api/v1/interviews/:id/end",
            post(interviews::handle_end_interview),
        )
        .route(
            "/api/v1/interviews/:id/evaluation",
            get(interviews::handle_get_session_evaluation),
        )
        // Evaluation archive
        .route(
            "/api/v1/evaluations/:evaluation_id",
            get(archive::handle_get_evaluation),
        )
        // Problem banks
        .route("/api/v1/problems", get(problems::handle_get_problem))
        .route(
            "/api/v1/problems/search",
            get(problems::handle_search_problems),
        )
        .route("/api/v1/problems/set", get(problems::handle_problem_set))
        .route(
            "/api/v1/problems/leetcode/:slug",
            get(problems::handle_leetcode_problem),
        )
        .route(
            "/api/v1/problems/leetcode/topics/:topic",
            get(problems::handle_leetcode_topic),
        )
        .route(
            "/api/v1/problems/codeforces/rating",
            get(problems::handle_codeforces_rating),
        )
        .route(
            "/api/v1/problems/codeforces/tags",
            get(problems::handle_codeforces_tags),
        )
        .route(
            "/api/v1/problems/codeforces/contests/:contest_id",
            get(problems::handle_codeforces_contest),
        )
        .route(
            "/api/v1/problems/codeforces/:contest_id/:index",
            get(problems::handle_codeforces_problem),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use aws_config::{BehaviorVersion, Region};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::testing::ScriptedModel;
    use crate::problems::codeforces::CodeforcesClient;
    use crate::problems::leetcode::LeetCodeClient;
    use crate::problems::{Difficulty, ProblemBank};
    use crate::sessions::InMemorySessionStore;
    use crate::workflow::{InterviewWorkflow, WorkflowSettings};

    fn test_config() -> Config {
        Config {
            database_url: "postgres://localhost/interviewer_test".to_string(),
            redis_url: "redis://localhost".to_string(),
            s3_bucket: "evaluations-test".to_string(),
            s3_endpoint: "http://localhost:9000".to_string(),
            aws_access_key_id: "test".to_string(),
            aws_secret_access_key: "test".to_string(),
            anthropic_api_key: "test".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            question_difficulty: Difficulty::Hard,
            questions_per_interview: 2,
            exchanges_per_question: 4,
            max_redirects: 3,
            max_turns: 20,
            session_ttl_secs: 60,
            leetcode_graphql_url: "http://localhost/graphql".to_string(),
            codeforces_api_url: "http://localhost/api".to_string(),
        }
    }

    fn test_router() -> Router {
        let config = test_config();
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        let problems = Arc::new(ProblemBank::new(
            LeetCodeClient::with_base_url(config.leetcode_graphql_url.clone()).unwrap(),
            CodeforcesClient::with_base_url(config.codeforces_api_url.clone()).unwrap(),
        ));
        let workflow = Arc::new(InterviewWorkflow::new(
            Arc::new(ScriptedModel::failing()),
            problems.clone(),
            WorkflowSettings::default(),
        ));

        build_router(AppState {
            db,
            s3: aws_sdk_s3::Client::from_conf(s3_config),
            sessions: Arc::new(InMemorySessionStore::new()),
            workflow,
            problems,
            config,
        })
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(json) => Body::from(json.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_start_then_summary() {
        let app = test_router();
        let (status, started) = send(
            &app,
            "POST",
            "/api/v1/interviews",
            Some(json!({"candidate_name": "Grace", "target_role": "SRE"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(started["stage"], "introduction");
        assert!(started["message"].as_str().unwrap().contains("Grace"));

        let id = started["session_id"].as_str().unwrap();
        let (status, summary) = send(&app, "GET", &format!("/api/v1/interviews/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["conversation_length"], 1);
        assert_eq!(summary["interview_complete"], false);
        assert_eq!(summary["flow"]["status"], "normal");
    }

    #[tokio::test]
    async fn test_help_command_is_answered_directly() {
        let app = test_router();
        let (_, started) = send(&app, "POST", "/api/v1/interviews", Some(json!({}))).await;
        assert_eq!(started["candidate_name"], "Demo Candidate");
        let id = started["session_id"].as_str().unwrap();

        let (status, reply) = send(
            &app,
            "POST",
            &format!("/api/v1/interviews/{id}/messages"),
            Some(json!({"message": "help"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["status"], "success");
        assert!(reply["message"].as_str().unwrap().starts_with("Available commands"));
        assert!(reply.get("archive").is_none());
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let app = test_router();
        let (status, body) = send(
            &app,
            "GET",
            "/api/v1/interviews/00000000-0000-0000-0000-000000000000",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_evaluation_missing_until_interview_ends() {
        let app = test_router();
        let (_, started) = send(&app, "POST", "/api/v1/interviews", Some(json!({}))).await;
        let id = started["session_id"].as_str().unwrap();

        let uri = format!("/api/v1/interviews/{id}/evaluation");
        let (status, _) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_hint_without_question_explains_itself() {
        let app = test_router();
        let (_, started) = send(&app, "POST", "/api/v1/interviews", Some(json!({}))).await;
        let id = started["session_id"].as_str().unwrap();

        let uri = format!("/api/v1/interviews/{id}/hint");
        let (status, body) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["hint"].as_str().unwrap().contains("no active coding question"));
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let app = test_router();
        let (status, _) = send(&app, "GET", "/api/v1/problems/search?q=", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_inverted_rating_range_is_rejected() {
        let app = test_router();
        let (status, _) = send(
            &app,
            "GET",
            "/api/v1/problems/codeforces/rating?min=1600&max=800",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
