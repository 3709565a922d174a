mod archive;
mod config;
mod db;
mod errors;
mod evaluation;
mod guardrails;
mod interview;
mod llm_client;
mod models;
mod problems;
mod routes;
mod security;
mod sessions;
mod state;
mod workflow;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::problems::codeforces::CodeforcesClient;
use crate::problems::leetcode::LeetCodeClient;
use crate::problems::ProblemBank;
use crate::routes::build_router;
use crate::sessions::RedisSessionStore;
use crate::state::AppState;
use crate::workflow::InterviewWorkflow;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interviewer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize Redis session store
    let redis = redis::Client::open(config.redis_url.clone())?;
    let sessions = Arc::new(RedisSessionStore::new(redis, config.session_ttl_secs));
    info!("Redis session store initialized (ttl: {}s)", config.session_ttl_secs);

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize LLM client
    let llm = Arc::new(LlmClient::new(config.anthropic_api_key.clone())?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize problem banks
    let problems = Arc::new(ProblemBank::new(
        LeetCodeClient::with_base_url(config.leetcode_graphql_url.clone())?,
        CodeforcesClient::with_base_url(config.codeforces_api_url.clone())?,
    ));

    let settings = config.workflow_settings();
    info!(
        difficulty = %settings.question_difficulty,
        questions = settings.questions_per_interview,
        max_turns = settings.max_turns,
        "Interview workflow configured"
    );
    let workflow = Arc::new(InterviewWorkflow::new(llm, problems.clone(), settings));

    // Build app state
    let state = AppState {
        db,
        s3,
        sessions,
        workflow,
        problems,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        // TODO: restrict origins once the web client has a fixed host
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "interviewer-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
