use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::interview::models::{CandidateResponse, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    TechnicalSkills,
    Communication,
    ProblemApproach,
    Collaboration,
}

impl Criterion {
    pub const ALL: [Criterion; 4] = [
        Criterion::TechnicalSkills,
        Criterion::Communication,
        Criterion::ProblemApproach,
        Criterion::Collaboration,
    ];

    pub fn weight(&self) -> f64 {
        match self {
            Criterion::TechnicalSkills => 0.4,
            Criterion::Communication => 0.25,
            Criterion::ProblemApproach => 0.2,
            Criterion::Collaboration => 0.15,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Criterion::TechnicalSkills => "Technical Skills",
            Criterion::Communication => "Communication",
            Criterion::ProblemApproach => "Problem Approach",
            Criterion::Collaboration => "Collaboration",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Excellent,
    Good,
    Satisfactory,
    NeedsImprovement,
    Inadequate,
}

impl Rating {
    pub fn from_score(score: f64) -> Self {
        if score >= 4.5 {
            Rating::Excellent
        } else if score >= 3.5 {
            Rating::Good
        } else if score >= 2.5 {
            Rating::Satisfactory
        } else if score >= 1.5 {
            Rating::NeedsImprovement
        } else {
            Rating::Inadequate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Excellent => "excellent",
            Rating::Good => "good",
            Rating::Satisfactory => "satisfactory",
            Rating::NeedsImprovement => "needs_improvement",
            Rating::Inadequate => "inadequate",
        }
    }
}

/// Accepts any JSON list (or null) and turns each item into text.
fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .map(|item| match item {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriterionAnalysis {
    #[serde(default, deserialize_with = "lenient_strings")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub areas_for_improvement: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub examples: Vec<String>,
}

/// What the evaluator LLM observed about the candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceAnalysis {
    #[serde(default)]
    pub technical_skills: CriterionAnalysis,
    #[serde(default)]
    pub communication: CriterionAnalysis,
    #[serde(default)]
    pub problem_approach: CriterionAnalysis,
    #[serde(default)]
    pub collaboration: CriterionAnalysis,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub notable_moments: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub red_flags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub positive_highlights: Vec<String>,
    /// Unparsed LLM output, kept when it was not valid JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_analysis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PerformanceAnalysis {
    pub fn criterion(&self, criterion: Criterion) -> &CriterionAnalysis {
        match criterion {
            Criterion::TechnicalSkills => &self.technical_skills,
            Criterion::Communication => &self.communication,
            Criterion::ProblemApproach => &self.problem_approach,
            Criterion::Collaboration => &self.collaboration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub score: u8,
    pub rating: Rating,
    pub weight: f64,
    pub weighted_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedScores {
    pub technical_skills: CriterionScore,
    pub communication: CriterionScore,
    pub problem_approach: CriterionScore,
    pub collaboration: CriterionScore,
}

impl DetailedScores {
    pub fn get(&self, criterion: Criterion) -> &CriterionScore {
        match criterion {
            Criterion::TechnicalSkills => &self.technical_skills,
            Criterion::Communication => &self.communication,
            Criterion::ProblemApproach => &self.problem_approach,
            Criterion::Collaboration => &self.collaboration,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Criterion, &CriterionScore)> {
        Criterion::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub hiring_decision: String,
    pub next_steps: Vec<String>,
    pub development_areas: Vec<String>,
    pub follow_up_questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetadata {
    pub duration_minutes: i64,
    /// Number of recorded candidate answers.
    pub questions_completed: usize,
    pub interview_stage_reached: Stage,
    pub total_conversation_exchanges: usize,
    pub candidate_responses: Vec<CandidateResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub evaluation_id: String,
    pub candidate_name: String,
    pub target_role: String,
    pub timestamp: DateTime<Utc>,
    pub overall_score: f64,
    pub overall_rating: Rating,
    pub detailed_scores: DetailedScores,
    pub analysis: PerformanceAnalysis,
    pub assessment: String,
    pub recommendations: Recommendations,
    pub interview_metadata: EvaluationMetadata,
}
