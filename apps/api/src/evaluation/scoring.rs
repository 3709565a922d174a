//! Deterministic scoring: every number in an evaluation is derived from list counts here.

use super::models::{
    Criterion, CriterionScore, DetailedScores, PerformanceAnalysis, Rating, Recommendations,
};

const HIGHLIGHT_LIMIT: usize = 3;
const DEVELOPMENT_AREAS_PER_CRITERION: usize = 2;

/// Maps strength / improvement counts to a 1-5 score.
pub fn criterion_score(strengths: usize, improvements: usize) -> u8 {
    if strengths >= 3 && improvements <= 1 {
        5
    } else if strengths >= 2 && improvements <= 2 {
        4
    } else if strengths >= 1 && improvements <= 3 {
        3
    } else if strengths >= 1 || improvements <= 4 {
        2
    } else {
        1
    }
}

fn score_criterion(analysis: &PerformanceAnalysis, criterion: Criterion) -> CriterionScore {
    let observed = analysis.criterion(criterion);
    let score = criterion_score(
        observed.strengths.len(),
        observed.areas_for_improvement.len(),
    );
    CriterionScore {
        score,
        rating: Rating::from_score(score as f64),
        weight: criterion.weight(),
        weighted_score: score as f64 * criterion.weight(),
    }
}

pub fn score_analysis(analysis: &PerformanceAnalysis) -> DetailedScores {
    DetailedScores {
        technical_skills: score_criterion(analysis, Criterion::TechnicalSkills),
        communication: score_criterion(analysis, Criterion::Communication),
        problem_approach: score_criterion(analysis, Criterion::ProblemApproach),
        collaboration: score_criterion(analysis, Criterion::Collaboration),
    }
}

/// Weighted mean of the criterion scores, rounded to two decimals.
pub fn overall_score(scores: &DetailedScores) -> f64 {
    let (weighted, weight) = scores
        .iter()
        .fold((0.0, 0.0), |(w, t), (_, s)| (w + s.weighted_score, t + s.weight));
    if weight > 0.0 {
        (weighted / weight * 100.0).round() / 100.0
    } else {
        0.0
    }
}

pub fn assessment(overall: f64, analysis: &PerformanceAnalysis) -> String {
    let mut text = match Rating::from_score(overall) {
        Rating::Excellent => format!(
            "The candidate demonstrated exceptional performance throughout the interview with an overall score of {overall:.2}/5.\n\
             They showed strong capabilities across all evaluation areas and would be an excellent addition to the team."
        ),
        Rating::Good => format!(
            "The candidate performed well in the interview with an overall score of {overall:.2}/5.\n\
             They demonstrated solid technical skills and good communication, with minor areas for development."
        ),
        Rating::Satisfactory => format!(
            "The candidate showed adequate performance with an overall score of {overall:.2}/5.\n\
             While they met basic expectations, there are several areas where continued development would be beneficial."
        ),
        Rating::NeedsImprovement => format!(
            "The candidate's performance was below expectations with an overall score of {overall:.2}/5.\n\
             Significant improvement would be needed in key areas before they would be ready for this role."
        ),
        Rating::Inadequate => format!(
            "The candidate's performance was significantly below expectations with an overall score of {overall:.2}/5.\n\
             They would need substantial development before being considered for a technical role."
        ),
    };

    let strengths: Vec<&str> = Criterion::ALL
        .iter()
        .flat_map(|c| analysis.criterion(*c).strengths.iter())
        .map(String::as_str)
        .take(HIGHLIGHT_LIMIT)
        .collect();
    let improvements: Vec<&str> = Criterion::ALL
        .iter()
        .flat_map(|c| analysis.criterion(*c).areas_for_improvement.iter())
        .map(String::as_str)
        .take(HIGHLIGHT_LIMIT)
        .collect();

    if !strengths.is_empty() {
        text.push_str(&format!("\n\nKey strengths observed: {}", strengths.join(", ")));
    }
    if !improvements.is_empty() {
        text.push_str(&format!("\n\nAreas for development: {}", improvements.join(", ")));
    }
    text
}

pub fn hiring_decision(overall: f64) -> &'static str {
    if overall >= 4.0 {
        "Strong hire - Recommend proceeding to next round"
    } else if overall >= 3.0 {
        "Hire - Candidate meets requirements with some development potential"
    } else if overall >= 2.0 {
        "Borderline - Consider additional interviews or specific role fit"
    } else {
        "No hire - Candidate needs significant development"
    }
}

fn next_steps(overall: f64) -> [&'static str; 3] {
    if overall >= 3.5 {
        [
            "Schedule technical deep-dive interview",
            "Discuss team fit and role expectations",
            "Check references",
        ]
    } else if overall >= 2.5 {
        [
            "Consider take-home technical assessment",
            "Schedule behavioral interview",
            "Evaluate for junior or alternative roles",
        ]
    } else {
        [
            "Provide constructive feedback",
            "Suggest areas for skill development",
            "Keep candidate in pipeline for future opportunities",
        ]
    }
}

pub fn recommendations(overall: f64, analysis: &PerformanceAnalysis) -> Recommendations {
    let development_areas = Criterion::ALL
        .iter()
        .flat_map(|c| {
            analysis
                .criterion(*c)
                .areas_for_improvement
                .iter()
                .take(DEVELOPMENT_AREAS_PER_CRITERION)
                .cloned()
        })
        .collect();

    // Red flags become the questions a follow-up interviewer should probe.
    let follow_up_questions = analysis
        .red_flags
        .iter()
        .map(|flag| format!("Follow up on: {flag}"))
        .collect();

    Recommendations {
        hiring_decision: hiring_decision(overall).to_string(),
        next_steps: next_steps(overall).iter().map(|s| s.to_string()).collect(),
        development_areas,
        follow_up_questions,
    }
}
