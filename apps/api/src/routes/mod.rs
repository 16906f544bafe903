pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route("/api/v1/sessions/:id", delete(handlers::handle_delete_session))
        // Analysis
        .route(
            "/api/v1/sessions/:id/analyze",
            post(handlers::handle_analyze).layer(upload_limit),
        )
        .route("/api/v1/sessions/:id/report", get(handlers::handle_get_report))
        .route("/api/v1/sessions/:id/history", get(handlers::handle_get_history))
        // Downloads
        .route(
            "/api/v1/sessions/:id/downloads/:artifact",
            get(handlers::handle_download),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::analysis::session::{AnalysisRun, SessionStore};
    use crate::config::Config;
    use crate::llm_client::mock::ScriptedGenerator;
    use crate::report::pdf::render_simple_pdf;

    const BOUNDARY: &str = "pinpoint-test-boundary";

    fn test_state() -> (AppState, Arc<ScriptedGenerator>) {
        test_state_with(ScriptedGenerator::new(vec![]))
    }

    fn test_state_with(generator: ScriptedGenerator) -> (AppState, Arc<ScriptedGenerator>) {
        let generator = Arc::new(generator);
        let state = AppState {
            generator: generator.clone(),
            sessions: SessionStore::new(),
            config: Config::for_tests(),
        };
        (state, generator)
    }

    fn request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    /// Multipart body with an optional JD text part and an optional resume file part.
    fn analyze_request(session: Uuid, jd: Option<&str>, resume: Option<&[u8]>) -> Request<Body> {
        let mut body: Vec<u8> = Vec::new();
        if let Some(jd) = jd {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"job_description\"\r\n\r\n{jd}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some(resume) = resume {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"resume.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(resume);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/sessions/{session}/analyze"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    async fn json_body(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    fn sample_run() -> AnalysisRun {
        let mut run = AnalysisRun::new(
            "Jane Doe\nRust engineer".to_string(),
            "Senior Rust Engineer".to_string(),
        );
        run.analysis = "- Job Description Match With Ats score: 80%".to_string();
        run.cover_letter = "Dear team,".to_string();
        run.tailored_resume = "Jane Doe\nStaff Rust engineer".to_string();
        run
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _) = test_state();
        let response = build_router(state)
            .oneshot(request("GET", "/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_session_returns_id() {
        let (state, _) = test_state();
        let sessions = state.sessions.clone();
        let response = build_router(state)
            .oneshot(request("POST", "/api/v1/sessions"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = json_body(response).await;
        let id: Uuid = body["session_id"].as_str().unwrap().parse().unwrap();
        assert!(sessions.exists(id).await);
    }

    #[tokio::test]
    async fn test_analyze_without_jd_is_rejected_and_leaves_no_run() {
        let (state, generator) = test_state();
        let session = state.sessions.create().await;
        let app = build_router(state.clone());

        let response = app
            .oneshot(analyze_request(session.id, None, Some(b"%PDF-1.4 fake")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");

        let has_run = state
            .sessions
            .read(session.id, |s| s.current_run.is_some())
            .await;
        assert_eq!(has_run, Some(false));
        assert!(generator.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_with_blank_jd_is_rejected() {
        let (state, _) = test_state();
        let session = state.sessions.create().await;
        let response = build_router(state)
            .oneshot(analyze_request(session.id, Some("   "), Some(b"%PDF-1.4 fake")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analyze_with_unreadable_pdf_is_unprocessable() {
        let (state, generator) = test_state();
        let session = state.sessions.create().await;
        let response = build_router(state)
            .oneshot(analyze_request(
                session.id,
                Some("Senior Rust Engineer"),
                Some(b"not a pdf at all"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(generator.prompts().is_empty());
    }

    fn resume_pdf() -> Vec<u8> {
        render_simple_pdf(
            "Resume",
            "Jane Doe\nSenior Rust Engineer\nTokio, Postgres, Kubernetes",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_analyze_complete_run_records_history() {
        let (state, generator) = test_state_with(ScriptedGenerator::new(vec![
            "- Job Description Match With Ats score: 70%",
        ]));
        let session = state.sessions.create().await;
        let app = build_router(state.clone());

        let response = app
            .clone()
            .oneshot(analyze_request(
                session.id,
                Some("Senior Rust Engineer"),
                Some(&resume_pdf()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"]["state"], "complete");
        assert_eq!(body["completed_steps"].as_array().unwrap().len(), 8);
        assert_eq!(body["metrics"][0]["value"], "70.0%");
        assert_eq!(generator.prompts().len(), 8);
        assert!(generator.prompts()[0].contains("Jane"));

        let uri = format!("/api/v1/sessions/{}/history", session.id);
        let rows = json_body(app.oneshot(request("GET", &uri)).await.unwrap()).await;
        assert_eq!(rows.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_analyze_step_failure_keeps_partial_run() {
        let (state, generator) = test_state_with(
            ScriptedGenerator::new(vec!["analysis", "tailored", "cover"]).failing_at(3),
        );
        let session = state.sessions.create().await;
        let app = build_router(state.clone());

        let response = app
            .clone()
            .oneshot(analyze_request(
                session.id,
                Some("Senior Rust Engineer"),
                Some(&resume_pdf()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "LLM_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("interview questions"));
        assert_eq!(generator.prompts().len(), 4);

        let (complete, cover_letter, history_len) = state
            .sessions
            .read(session.id, |s| {
                let run = s.current_run.as_ref().unwrap();
                (run.is_complete(), run.cover_letter.clone(), s.history.len())
            })
            .await
            .unwrap();
        assert!(!complete);
        assert_eq!(cover_letter, "cover");
        assert_eq!(history_len, 0);

        let uri = format!("/api/v1/sessions/{}/downloads/full_report.pdf", session.id);
        let response = app.oneshot(request("GET", &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_bytes(response).await.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_analyze_unknown_session_is_not_found() {
        let (state, _) = test_state();
        let response = build_router(state)
            .oneshot(analyze_request(Uuid::new_v4(), Some("jd"), Some(b"pdf")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_report_before_any_run_is_not_found() {
        let (state, _) = test_state();
        let session = state.sessions.create().await;
        let response = build_router(state)
            .oneshot(request("GET", &format!("/api/v1/sessions/{}/report", session.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_report_shows_metrics_and_fallback_recommendations() {
        let (state, _) = test_state();
        let session = state.sessions.create().await;
        state.sessions.record_run(session.id, sample_run()).await;

        let response = build_router(state)
            .oneshot(request("GET", &format!("/api/v1/sessions/{}/report", session.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"]["state"], "complete");
        assert_eq!(body["metrics"][0]["label"], "Job Match %");
        assert_eq!(body["metrics"][0]["value"], "80.0%");
        assert_eq!(body["metrics"][1]["label"], "Text Similarity %");
        assert_eq!(
            body["recommendations"],
            "- Job Description Match With Ats score: 80%"
        );
    }

    #[tokio::test]
    async fn test_history_lists_complete_runs() {
        let (state, _) = test_state();
        let session = state.sessions.create().await;
        state.sessions.record_run(session.id, sample_run()).await;

        let response = build_router(state)
            .oneshot(request("GET", &format!("/api/v1/sessions/{}/history", session.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let rows = json_body(response).await;
        assert_eq!(rows.as_array().unwrap().len(), 1);
        assert_eq!(rows[0]["jd_preview"], "Senior Rust Engineer...");
    }

    #[tokio::test]
    async fn test_downloads_have_content_type_and_magic_bytes() {
        let (state, _) = test_state();
        let session = state.sessions.create().await;
        state.sessions.record_run(session.id, sample_run()).await;
        let app = build_router(state);

        let cases: [(&str, &str, &[u8]); 3] = [
            ("full_report.pdf", "application/pdf", b"%PDF-"),
            (
                "full_report.docx",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                b"PK",
            ),
            ("cover_letter.pdf", "application/pdf", b"%PDF-"),
        ];

        for (artifact, content_type, magic) in cases {
            let uri = format!("/api/v1/sessions/{}/downloads/{artifact}", session.id);
            let response = app.clone().oneshot(request("GET", &uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{artifact}");
            assert_eq!(
                response.headers().get(header::CONTENT_TYPE).unwrap(),
                content_type
            );
            assert_eq!(
                response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
                format!("attachment; filename=\"{artifact}\"").as_str()
            );
            assert!(body_bytes(response).await.starts_with(magic), "{artifact}");
        }
    }

    #[tokio::test]
    async fn test_unknown_artifact_is_not_found() {
        let (state, _) = test_state();
        let session = state.sessions.create().await;
        state.sessions.record_run(session.id, sample_run()).await;
        let uri = format!("/api/v1/sessions/{}/downloads/secrets.zip", session.id);
        let response = build_router(state)
            .oneshot(request("GET", &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_session() {
        let (state, _) = test_state();
        let session = state.sessions.create().await;
        let app = build_router(state);
        let uri = format!("/api/v1/sessions/{}", session.id);

        let response = app.clone().oneshot(request("DELETE", &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.oneshot(request("DELETE", &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
