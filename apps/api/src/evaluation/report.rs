//! Human-readable renderings of an evaluation: chat summary, full report, CSV row, transcript.

use super::models::Evaluation;

const RULE_WIDTH: usize = 80;
const SEPARATOR_WIDTH: usize = 60;

pub const CSV_HEADER: &str = "Candidate,Role,Date,EvaluationID,OverallScore,OverallRating,\
HiringDecision,Duration,QuestionsCompleted,TechnicalScore,CommunicationScore,\
ProblemApproachScore,CollaborationScore";

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn section(parts: &mut Vec<String>, title: &str) {
    parts.extend([rule(), title.to_string(), rule(), String::new()]);
}

fn display_date(evaluation: &Evaluation) -> String {
    evaluation.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Short report embedded in the final chat message.
pub fn short_summary(evaluation: &Evaluation) -> String {
    let mut parts = vec![
        "=== INTERVIEW EVALUATION REPORT ===".to_string(),
        format!("Evaluation ID: {}", evaluation.evaluation_id),
        format!("Date: {}", evaluation.timestamp.to_rfc3339()),
        format!(
            "Overall Score: {:.2}/5.0 ({})",
            evaluation.overall_score,
            evaluation.overall_rating.as_str().to_uppercase()
        ),
        String::new(),
        "=== DETAILED SCORES ===".to_string(),
    ];

    for (criterion, score) in evaluation.detailed_scores.iter() {
        parts.push(format!(
            "{}: {}/5 ({})",
            criterion.display_name(),
            score.score,
            score.rating.as_str()
        ));
    }

    parts.extend([
        String::new(),
        "=== OVERALL ASSESSMENT ===".to_string(),
        evaluation.assessment.clone(),
        String::new(),
        "=== RECOMMENDATIONS ===".to_string(),
        format!(
            "Hiring Decision: {}",
            evaluation.recommendations.hiring_decision
        ),
    ]);

    if !evaluation.recommendations.next_steps.is_empty() {
        parts.push("Next Steps:".to_string());
        for step in &evaluation.recommendations.next_steps {
            parts.push(format!("  • {step}"));
        }
    }

    parts.join("\n")
}

/// Full report archived alongside the JSON evaluation.
pub fn comprehensive_summary(evaluation: &Evaluation) -> String {
    let mut parts = vec![rule(), "INTERVIEW EVALUATION REPORT".to_string(), rule(), String::new()];
    parts.extend([
        format!("CANDIDATE: {}", evaluation.candidate_name),
        format!("TARGET ROLE: {}", evaluation.target_role),
        format!("DATE: {}", display_date(evaluation)),
        format!("EVALUATION ID: {}", evaluation.evaluation_id),
        String::new(),
    ]);

    section(&mut parts, "OVERALL PERFORMANCE");
    parts.extend([
        format!("OVERALL SCORE: {:.2}/5.0", evaluation.overall_score),
        format!(
            "OVERALL RATING: {}",
            evaluation.overall_rating.as_str().to_uppercase()
        ),
        String::new(),
        format!(
            "HIRING RECOMMENDATION: {}",
            evaluation.recommendations.hiring_decision
        ),
        String::new(),
    ]);

    section(&mut parts, "DETAILED BREAKDOWN");
    for (criterion, score) in evaluation.detailed_scores.iter() {
        parts.extend([
            format!("{}:", criterion.display_name()),
            format!(
                "   Score: {}/5 ({})",
                score.score,
                score.rating.as_str().to_uppercase()
            ),
            format!("   Weight: {:.0}%", score.weight * 100.0),
            format!("   Weighted: {:.2}", score.weighted_score),
            String::new(),
        ]);
    }

    section(&mut parts, "DETAILED ANALYSIS");
    for (criterion, _) in evaluation.detailed_scores.iter() {
        let observed = evaluation.analysis.criterion(criterion);
        parts.push(format!("{}:", criterion.display_name()));
        if !observed.strengths.is_empty() {
            parts.push("   STRENGTHS:".to_string());
            parts.extend(observed.strengths.iter().map(|s| format!("      - {s}")));
        }
        if !observed.areas_for_improvement.is_empty() {
            parts.push("   AREAS FOR IMPROVEMENT:".to_string());
            parts.extend(
                observed
                    .areas_for_improvement
                    .iter()
                    .map(|a| format!("      - {a}")),
            );
        }
        parts.push(String::new());
    }

    section(&mut parts, "OVERALL ASSESSMENT");
    parts.extend([evaluation.assessment.clone(), String::new()]);

    if !evaluation.recommendations.next_steps.is_empty() {
        section(&mut parts, "RECOMMENDED NEXT STEPS");
        for (i, step) in evaluation.recommendations.next_steps.iter().enumerate() {
            parts.push(format!("{}. {step}", i + 1));
        }
        parts.push(String::new());
    }

    let metadata = &evaluation.interview_metadata;
    section(&mut parts, "INTERVIEW STATISTICS");
    parts.extend([
        format!("Duration: {} minutes", metadata.duration_minutes),
        format!("Questions Completed: {}", metadata.questions_completed),
        format!("Final Stage: {}", metadata.interview_stage_reached),
        format!("Total Exchanges: {}", metadata.total_conversation_exchanges),
        String::new(),
        rule(),
    ]);

    parts.join("\n")
}

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Header plus one data row, for spreadsheet import.
pub fn csv_metrics(evaluation: &Evaluation) -> String {
    let scores = &evaluation.detailed_scores;
    let row = [
        csv_field(&evaluation.candidate_name),
        csv_field(&evaluation.target_role),
        csv_field(&evaluation.timestamp.format("%Y-%m-%d").to_string()),
        csv_field(&evaluation.evaluation_id),
        format!("{:.2}", evaluation.overall_score),
        csv_field(evaluation.overall_rating.as_str()),
        csv_field(&evaluation.recommendations.hiring_decision),
        csv_field(&evaluation.interview_metadata.duration_minutes.to_string()),
        evaluation.interview_metadata.questions_completed.to_string(),
        scores.technical_skills.score.to_string(),
        scores.communication.score.to_string(),
        scores.problem_approach.score.to_string(),
        scores.collaboration.score.to_string(),
    ];
    format!("{CSV_HEADER}\n{}", row.join(","))
}

/// Question-by-question record of the candidate's answers.
pub fn transcript(evaluation: &Evaluation) -> String {
    let mut parts = vec![
        rule(),
        format!("INTERVIEW TRANSCRIPT - {}", evaluation.candidate_name),
        rule(),
        String::new(),
        format!("Date: {}", display_date(evaluation)),
        format!("Role: {}", evaluation.target_role),
        String::new(),
        rule(),
        String::new(),
    ];

    for (i, response) in evaluation
        .interview_metadata
        .candidate_responses
        .iter()
        .enumerate()
    {
        parts.extend([
            format!(
                "[{}] QUESTION {}:",
                response.stage.as_str().to_uppercase(),
                i + 1
            ),
            response.question.clone(),
            String::new(),
            "CANDIDATE RESPONSE:".to_string(),
            response.response.clone(),
            String::new(),
            "-".repeat(SEPARATOR_WIDTH),
            String::new(),
        ]);
    }

    parts.join("\n")
}

pub fn detailed_json(evaluation: &Evaluation) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(evaluation)
}


#[cfg(test)]
mod tests {
    use super::fixtures::sample_evaluation;
    use super::*;

    #[test]
    fn test_short_summary_lists_scores_and_steps() {
        let evaluation = sample_evaluation();
        let summary = short_summary(&evaluation);
        assert!(summary.starts_with("=== INTERVIEW EVALUATION REPORT ==="));
        assert!(summary.contains("Evaluation ID: eval_20260314_092653"));
        // technical 4, others 2: 1.6 + 0.5 + 0.4 + 0.3
        assert!(summary.contains("Overall Score: 2.80/5.0 (SATISFACTORY)"));
        assert!(summary.contains("Technical Skills: 4/5 (good)"));
        assert!(summary.contains("Collaboration: 2/5 (needs_improvement)"));
        assert!(summary.contains("  • Consider take-home technical assessment"));
    }

    #[test]
    fn test_comprehensive_summary_sections() {
        let report = comprehensive_summary(&sample_evaluation());
        for heading in [
            "OVERALL PERFORMANCE",
            "DETAILED BREAKDOWN",
            "DETAILED ANALYSIS",
            "OVERALL ASSESSMENT",
            "RECOMMENDED NEXT STEPS",
            "INTERVIEW STATISTICS",
        ] {
            assert!(report.contains(heading), "missing {heading}");
        }
        assert!(report.contains("DATE: 2026-03-14 09:26:53"));
        assert!(report.contains("   Weight: 40%"));
        assert!(report.contains("   Weighted: 1.60"));
        assert!(report.contains("      - Missed empty input"));
        assert!(report.contains("Duration: 37 minutes"));
        assert!(report.contains("Final Stage: complete"));
    }

    #[test]
    fn test_csv_has_thirteen_columns_and_escapes_quotes() {
        let csv = csv_metrics(&sample_evaluation());
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert_eq!(header.split(',').count(), 13);
        let row = lines.next().unwrap();
        assert!(row.starts_with(concat!(
            r#""Grace ""Amazing"" Hopper","Compiler Engineer","2026-03-14","#,
            r#""eval_20260314_092653",2.80,"satisfactory""#
        )));
        assert!(row.ends_with(",\"37\",1,4,2,2,2"));
    }

    #[test]
    fn test_transcript_numbers_questions() {
        let text = transcript(&sample_evaluation());
        assert!(text.contains("INTERVIEW TRANSCRIPT - Grace \"Amazing\" Hopper"));
        assert!(text.contains("[TECHNICAL] QUESTION 1:\nMerge k Sorted Lists"));
        assert!(text.contains("CANDIDATE RESPONSE:\nPush each list head into a min-heap."));
    }

    #[test]
    fn test_detailed_json_round_trips_key_fields() {
        let json = detailed_json(&sample_evaluation()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["overall_rating"], "satisfactory");
        assert_eq!(value["detailed_scores"]["technical_skills"]["score"], 4);
        assert_eq!(value["interview_metadata"]["interview_stage_reached"], "complete");
    }
}
