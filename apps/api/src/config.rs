use std::str::FromStr;

use anyhow::{Context, Result};

use crate::problems::codeforces::CODEFORCES_API_URL;
use crate::problems::leetcode::LEETCODE_GRAPHQL_URL;
use crate::problems::Difficulty;
use crate::workflow::WorkflowSettings;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub question_difficulty: Difficulty,
    pub questions_per_interview: u32,
    pub exchanges_per_question: u32,
    pub max_redirects: u32,
    pub max_turns: u32,
    pub session_ttl_secs: u64,
    pub leetcode_graphql_url: String,
    pub codeforces_api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            question_difficulty: std::env::var("QUESTION_DIFFICULTY")
                .map(|v| Difficulty::from_label(&v))
                .unwrap_or(Difficulty::Hard),
            questions_per_interview: parse_env("QUESTIONS_PER_INTERVIEW", 2)?,
            exchanges_per_question: parse_env("EXCHANGES_PER_QUESTION", 4)?,
            max_redirects: parse_env("MAX_REDIRECTS", 3)?,
            max_turns: parse_env("MAX_TURNS", 20)?,
            session_ttl_secs: parse_env("SESSION_TTL_SECS", 7200)?,
            leetcode_graphql_url: std::env::var("LEETCODE_GRAPHQL_URL")
                .unwrap_or_else(|_| LEETCODE_GRAPHQL_URL.to_string()),
            codeforces_api_url: std::env::var("CODEFORCES_API_URL")
                .unwrap_or_else(|_| CODEFORCES_API_URL.to_string()),
        })
    }

    pub fn workflow_settings(&self) -> WorkflowSettings {
        WorkflowSettings {
            question_difficulty: self.question_difficulty,
            questions_per_interview: self.questions_per_interview,
            exchanges_per_question: self.exchanges_per_question,
            max_redirects: self.max_redirects,
            max_turns: self.max_turns,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_trims_and_parses() {
        let port: u16 = parse_value("PORT", " 9090 ").unwrap();
        assert_eq!(port, 9090);
    }

    #[test]
    fn test_parse_value_reports_key_on_error() {
        let err = parse_value::<u32>("MAX_TURNS", "twenty").unwrap_err();
        assert!(err.to_string().contains("MAX_TURNS"));
    }
}
