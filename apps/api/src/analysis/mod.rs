// Analysis orchestration: the fixed prompt sequence, per-session run state,
// resume text extraction, and the HTTP handlers that drive them.

pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod resume_text;
pub mod session;

use std::fmt;

use serde::Serialize;

/// One model call in the analysis sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStep {
    AtsAnalysis,
    TailoredResume,
    CoverLetter,
    InterviewQuestions,
    SkillGap,
    RelatedRoles,
    SalaryEstimate,
    NetworkingTips,
}

impl AnalysisStep {
    pub const ALL: [AnalysisStep; 8] = [
        AnalysisStep::AtsAnalysis,
        AnalysisStep::TailoredResume,
        AnalysisStep::CoverLetter,
        AnalysisStep::InterviewQuestions,
        AnalysisStep::SkillGap,
        AnalysisStep::RelatedRoles,
        AnalysisStep::SalaryEstimate,
        AnalysisStep::NetworkingTips,
    ];

    pub fn template(self) -> &'static str {
        match self {
            AnalysisStep::AtsAnalysis => prompts::ATS_ANALYSIS_TEMPLATE,
            AnalysisStep::TailoredResume => prompts::TAILORED_RESUME_TEMPLATE,
            AnalysisStep::CoverLetter => prompts::COVER_LETTER_TEMPLATE,
            AnalysisStep::InterviewQuestions => prompts::INTERVIEW_QUESTIONS_TEMPLATE,
            AnalysisStep::SkillGap => prompts::SKILL_GAP_TEMPLATE,
            AnalysisStep::RelatedRoles => prompts::RELATED_ROLES_TEMPLATE,
            AnalysisStep::SalaryEstimate => prompts::SALARY_ESTIMATE_TEMPLATE,
            AnalysisStep::NetworkingTips => prompts::NETWORKING_TIPS_TEMPLATE,
        }
    }

    fn label(self) -> &'static str {
        match self {
            AnalysisStep::AtsAnalysis => "ATS analysis",
            AnalysisStep::TailoredResume => "tailored resume",
            AnalysisStep::CoverLetter => "cover letter",
            AnalysisStep::InterviewQuestions => "interview questions",
            AnalysisStep::SkillGap => "skill gap analysis",
            AnalysisStep::RelatedRoles => "related roles",
            AnalysisStep::SalaryEstimate => "salary estimate",
            AnalysisStep::NetworkingTips => "networking tips",
        }
    }
}

impl fmt::Display for AnalysisStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
