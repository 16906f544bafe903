use chrono::Utc;
use tracing::{info, warn};

use crate::analysis::prompts::render;
use crate::analysis::session::{AnalysisRun, RunStatus};
use crate::analysis::AnalysisStep;
use crate::llm_client::TextGenerator;
use crate::report::{MetricEntry, ReportBundle};
use crate::text::metrics::find_labeled_number;
use crate::text::sections::extract_section;
use crate::text::similarity::similarity_ratio;

const RECOMMENDATIONS_HEADER: &str = "personalized suggestions";

/// Labels searched in the ATS analysis, paired with their table labels.
const PARSED_METRICS: [(&str, &str); 3] = [
    ("Job Description Match", "Job Match %"),
    ("Application Success Rate", "Success Rate %"),
    ("Skill Gap Percentage", "Skill Gap %"),
];
const SIMILARITY_LABEL: &str = "Text Similarity %";

/// Runs the full prompt sequence, one call at a time.
///
/// The first failing step stops the run. Whatever completed before it is kept,
/// and the returned run carries `RunStatus::Partial` naming the failed step.
pub async fn run_analysis(
    generator: &dyn TextGenerator,
    resume_text: String,
    jd_text: String,
) -> AnalysisRun {
    let mut run = AnalysisRun::new(resume_text, jd_text);

    for step in AnalysisStep::ALL {
        let prompt = render(step.template(), &run.resume_text, &run.jd_text);
        match generator.generate(&prompt).await {
            Ok(text) => {
                store_step(&mut run, step, text.trim().to_string());
                run.completed_steps.push(step);
                info!("Analysis step complete: {step}");
            }
            Err(e) => {
                warn!("Analysis step '{step}' failed: {e}");
                run.status = RunStatus::Partial {
                    failed_step: step,
                    error: e.to_string(),
                };
                break;
            }
        }
    }

    run.finished_at = Utc::now();
    run
}

fn store_step(run: &mut AnalysisRun, step: AnalysisStep, text: String) {
    match step {
        AnalysisStep::AtsAnalysis => {
            run.recommendations = extract_section(&text, RECOMMENDATIONS_HEADER);
            run.analysis = text;
        }
        AnalysisStep::TailoredResume => run.tailored_resume = text,
        AnalysisStep::CoverLetter => run.cover_letter = text,
        AnalysisStep::InterviewQuestions => run.interview_questions = text,
        AnalysisStep::SkillGap => run.skill_gap = text,
        AnalysisStep::RelatedRoles => run.related_roles = text,
        AnalysisStep::SalaryEstimate => run.salary_estimate = text,
        AnalysisStep::NetworkingTips => run.networking_tips = text,
    }
}

/// Scores table: parsed ATS numbers when present, then text similarity, always last.
pub fn build_metrics(run: &AnalysisRun) -> Vec<MetricEntry> {
    let mut metrics: Vec<MetricEntry> = PARSED_METRICS
        .iter()
        .filter_map(|(label, display)| {
            find_labeled_number(&run.analysis, label)
                .map(|value| MetricEntry::new(*display, format_percent(value)))
        })
        .collect();

    let similarity = similarity_ratio(&run.resume_text, &run.jd_text) * 100.0;
    metrics.push(MetricEntry::new(SIMILARITY_LABEL, format_percent(similarity)));
    metrics
}

fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Everything the full report renders for this run.
pub fn build_bundle(run: &AnalysisRun) -> ReportBundle {
    ReportBundle {
        metrics: build_metrics(run),
        recommendations: run.display_recommendations().to_string(),
        tailored_resume: run.tailored_resume.clone(),
        cover_letter: run.cover_letter.clone(),
        interview_questions: run.interview_questions.clone(),
        skill_gap: run.skill_gap.clone(),
        related_roles: run.related_roles.clone(),
        salary_estimate: run.salary_estimate.clone(),
        networking_tips: run.networking_tips.clone(),
    }
}
