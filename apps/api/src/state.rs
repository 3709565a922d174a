use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::problems::ProblemBank;
use crate::sessions::SessionStore;
use crate::workflow::InterviewWorkflow;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    /// Live interview sessions. Redis-backed outside of tests.
    pub sessions: Arc<dyn SessionStore>,
    pub workflow: Arc<InterviewWorkflow>,
    pub problems: Arc<ProblemBank>,
    pub config: Config,
}
