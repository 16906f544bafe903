use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::analysis::AnalysisStep;

const HISTORY_VIEW_LIMIT: usize = 10;
const JD_PREVIEW_CHARS: usize = 30;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunStatus {
    Complete,
    Partial {
        failed_step: AnalysisStep,
        error: String,
    },
}

/// Everything one analysis run produced. Fields for steps that never ran stay empty.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRun {
    pub resume_text: String,
    pub jd_text: String,
    pub analysis: String,
    pub recommendations: String,
    pub tailored_resume: String,
    pub cover_letter: String,
    pub interview_questions: String,
    pub skill_gap: String,
    pub related_roles: String,
    pub salary_estimate: String,
    pub networking_tips: String,
    pub status: RunStatus,
    pub completed_steps: Vec<AnalysisStep>,
    pub finished_at: DateTime<Utc>,
}

impl AnalysisRun {
    pub fn new(resume_text: String, jd_text: String) -> Self {
        Self {
            resume_text,
            jd_text,
            analysis: String::new(),
            recommendations: String::new(),
            tailored_resume: String::new(),
            cover_letter: String::new(),
            interview_questions: String::new(),
            skill_gap: String::new(),
            related_roles: String::new(),
            salary_estimate: String::new(),
            networking_tips: String::new(),
            status: RunStatus::Complete,
            completed_steps: Vec::new(),
            finished_at: Utc::now(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == RunStatus::Complete
    }

    /// Recommendations for display: the extracted section, or the whole
    /// analysis when no section was found.
    pub fn display_recommendations(&self) -> &str {
        if self.recommendations.is_empty() {
            &self.analysis
        } else {
            &self.recommendations
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub jd_text: String,
    /// Kept with the entry; the history view only shows time and JD preview.
    #[allow(dead_code)]
    pub analysis: String,
}

/// One row of the history view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub time: String,
    pub jd_preview: String,
}

impl HistoryEntry {
    pub fn row(&self) -> HistoryRow {
        let preview: String = self.jd_text.chars().take(JD_PREVIEW_CHARS).collect();
        HistoryRow {
            time: self.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            jd_preview: format!("{preview}..."),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub current_run: Option<AnalysisRun>,
    pub history: Vec<HistoryEntry>,
}

impl Session {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            current_run: None,
            history: Vec::new(),
        }
    }

    /// Replaces the current run. Only complete runs are appended to history.
    pub fn record_run(&mut self, run: AnalysisRun) {
        if run.is_complete() {
            self.history.push(HistoryEntry {
                timestamp: run.finished_at,
                jd_text: run.jd_text.clone(),
                analysis: run.analysis.clone(),
            });
        }
        self.current_run = Some(run);
    }

    /// The most recent history rows, oldest first.
    pub fn history_view(&self) -> Vec<HistoryRow> {
        let start = self.history.len().saturating_sub(HISTORY_VIEW_LIMIT);
        self.history[start..].iter().map(HistoryEntry::row).collect()
    }
}

/// In-memory sessions keyed by id. Nothing survives a restart.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Session {
        let session = Session::new();
        self.inner.write().await.insert(session.id, session.clone());
        session
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }

    pub async fn exists(&self, id: Uuid) -> bool {
        self.inner.read().await.contains_key(&id)
    }

    /// Runs `f` against the session under the read lock.
    pub async fn read<T>(&self, id: Uuid, f: impl FnOnce(&Session) -> T) -> Option<T> {
        self.inner.read().await.get(&id).map(f)
    }

    /// Stores a finished run. Returns false if the session was deleted meanwhile.
    pub async fn record_run(&self, id: Uuid, run: AnalysisRun) -> bool {
        match self.inner.write().await.get_mut(&id) {
            Some(session) => {
                session.record_run(run);
                true
            }
            None => false,
        }
    }
}
