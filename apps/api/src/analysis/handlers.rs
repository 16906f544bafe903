use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::analysis::pipeline::{build_bundle, build_metrics, run_analysis};
use crate::analysis::resume_text::extract_resume_text;
use crate::analysis::session::{AnalysisRun, HistoryRow, RunStatus};
use crate::analysis::AnalysisStep;
use crate::errors::AppError;
use crate::report::{self, build_layout, MetricEntry};
use crate::state::AppState;

const PDF_CONTENT_TYPE: &str = "application/pdf";
const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct RunSummary {
    pub status: RunStatus,
    pub completed_steps: Vec<AnalysisStep>,
    pub metrics: Vec<MetricEntry>,
    pub recommendations: String,
}

#[derive(Serialize)]
pub struct ReportView {
    pub status: RunStatus,
    pub completed_steps: Vec<AnalysisStep>,
    pub metrics: Vec<MetricEntry>,
    pub recommendations: String,
    pub analysis: String,
    pub tailored_resume: String,
    pub cover_letter: String,
    pub interview_questions: String,
    pub skill_gap: String,
    pub related_roles: String,
    pub salary_estimate: String,
    pub networking_tips: String,
    pub finished_at: DateTime<Utc>,
}

impl From<&AnalysisRun> for ReportView {
    fn from(run: &AnalysisRun) -> Self {
        ReportView {
            status: run.status.clone(),
            completed_steps: run.completed_steps.clone(),
            metrics: build_metrics(run),
            recommendations: run.display_recommendations().to_string(),
            analysis: run.analysis.clone(),
            tailored_resume: run.tailored_resume.clone(),
            cover_letter: run.cover_letter.clone(),
            interview_questions: run.interview_questions.clone(),
            skill_gap: run.skill_gap.clone(),
            related_roles: run.related_roles.clone(),
            salary_estimate: run.salary_estimate.clone(),
            networking_tips: run.networking_tips.clone(),
            finished_at: run.finished_at,
        }
    }
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreated>) {
    let session = state.sessions.create().await;
    info!("Session created: {}", session.id);
    (
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id: session.id,
            created_at: session.created_at,
        }),
    )
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(id).await {
        return Err(session_not_found(id));
    }
    info!("Session discarded: {id}");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/analyze
///
/// Multipart fields: `job_description` (text) and `resume` (PDF file).
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<RunSummary>, AppError> {
    if !state.sessions.exists(id).await {
        return Err(session_not_found(id));
    }

    let mut jd_text = String::new();
    let mut resume_pdf = Bytes::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_description" => {
                jd_text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable job description: {e}")))?;
            }
            "resume" => {
                resume_pdf = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable resume upload: {e}")))?;
            }
            _ => {}
        }
    }

    if jd_text.trim().is_empty() || resume_pdf.is_empty() {
        return Err(AppError::Validation(
            "Please supply both a job description and a resume PDF".to_string(),
        ));
    }

    let resume_text = tokio::task::spawn_blocking(move || extract_resume_text(&resume_pdf))
        .await
        .map_err(|e| AppError::UnprocessableEntity(format!("Resume PDF could not be parsed: {e}")))??;

    info!(
        "Analysis started for session {id}: resume {} chars, JD {} chars",
        resume_text.len(),
        jd_text.len()
    );

    let run = run_analysis(state.generator.as_ref(), resume_text, jd_text).await;
    let summary = RunSummary {
        status: run.status.clone(),
        completed_steps: run.completed_steps.clone(),
        metrics: build_metrics(&run),
        recommendations: run.display_recommendations().to_string(),
    };
    let failure = match &run.status {
        RunStatus::Partial { failed_step, error } => Some(format!(
            "Analysis stopped at the {failed_step} step: {error}"
        )),
        RunStatus::Complete => None,
    };

    if !state.sessions.record_run(id, run).await {
        return Err(session_not_found(id));
    }

    match failure {
        Some(message) => Err(AppError::Llm(message)),
        None => {
            info!("Analysis complete for session {id}");
            Ok(Json(summary))
        }
    }
}

/// GET /api/v1/sessions/:id/report
pub async fn handle_get_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReportView>, AppError> {
    // Clone the run out; metrics are computed after the lock is released.
    let run = state
        .sessions
        .read(id, |s| s.current_run.clone())
        .await
        .ok_or_else(|| session_not_found(id))?
        .ok_or_else(no_run_yet)?;
    let view = tokio::task::spawn_blocking(move || ReportView::from(&run))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Report task failed: {e}")))?;
    Ok(Json(view))
}

/// GET /api/v1/sessions/:id/history
pub async fn handle_get_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<HistoryRow>>, AppError> {
    let rows = state
        .sessions
        .read(id, |s| s.history_view())
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(rows))
}

/// A downloadable document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Resume,
    CoverLetter,
    TailoredResume,
    FullReportPdf,
    FullReportDocx,
}

impl Artifact {
    pub fn from_file_name(name: &str) -> Option<Self> {
        match name {
            "resume.pdf" => Some(Artifact::Resume),
            "cover_letter.pdf" => Some(Artifact::CoverLetter),
            "tailored_resume.pdf" => Some(Artifact::TailoredResume),
            "full_report.pdf" => Some(Artifact::FullReportPdf),
            "full_report.docx" => Some(Artifact::FullReportDocx),
            _ => None,
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Artifact::Resume => "resume.pdf",
            Artifact::CoverLetter => "cover_letter.pdf",
            Artifact::TailoredResume => "tailored_resume.pdf",
            Artifact::FullReportPdf => "full_report.pdf",
            Artifact::FullReportDocx => "full_report.docx",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Artifact::FullReportDocx => DOCX_CONTENT_TYPE,
            _ => PDF_CONTENT_TYPE,
        }
    }

    /// Renders this artifact from a finished (or partial) run.
    pub fn render(self, run: &AnalysisRun) -> Result<Vec<u8>, report::ReportError> {
        match self {
            Artifact::Resume => report::pdf::render_simple_pdf("Resume", &run.resume_text),
            Artifact::CoverLetter => {
                report::pdf::render_simple_pdf("Cover Letter", &run.cover_letter)
            }
            Artifact::TailoredResume => {
                report::pdf::render_simple_pdf("Tailored Resume", &run.tailored_resume)
            }
            Artifact::FullReportPdf => {
                report::pdf::render_report_pdf(&build_layout(&build_bundle(run)))
            }
            Artifact::FullReportDocx => {
                report::docx::render_report_docx(&build_layout(&build_bundle(run)))
            }
        }
    }
}

/// GET /api/v1/sessions/:id/downloads/:artifact
pub async fn handle_download(
    State(state): State<AppState>,
    Path((id, artifact_name)): Path<(Uuid, String)>,
) -> Result<Response, AppError> {
    let artifact = Artifact::from_file_name(&artifact_name)
        .ok_or_else(|| AppError::NotFound(format!("Unknown artifact '{artifact_name}'")))?;

    // Clone the run out so the lock is released before rendering.
    let run = state
        .sessions
        .read(id, |s| s.current_run.clone())
        .await
        .ok_or_else(|| session_not_found(id))?
        .ok_or_else(no_run_yet)?;

    let bytes = tokio::task::spawn_blocking(move || artifact.render(&run))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Render task failed: {e}")))??;

    info!(
        "Rendered {} for session {id} ({} bytes)",
        artifact.file_name(),
        bytes.len()
    );

    Ok((
        [
            (header::CONTENT_TYPE, artifact.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.file_name()),
            ),
        ],
        bytes,
    )
        .into_response())
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

fn no_run_yet() -> AppError {
    AppError::NotFound("No analysis has been run in this session yet".to_string())
}
