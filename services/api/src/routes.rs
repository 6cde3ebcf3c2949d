use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use exam_outreach::error::AppError;
use exam_outreach::workflows::exams::{ExamFrequency, FrequencyGrouping};
use exam_outreach::workflows::outreach::{EligibleRecord, MemoryDeliveryLog, OutreachSummary};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct MatchRequest {
    #[serde(default)]
    pub(crate) text: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MatchResponse {
    pub(crate) exams: Option<Vec<String>>,
    pub(crate) joined: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreviewRequest {
    pub(crate) unstructured_csv: String,
    #[serde(default)]
    pub(crate) group_by: FrequencyGrouping,
}

#[derive(Debug, Serialize)]
pub(crate) struct PreviewResponse {
    pub(crate) summary: OutreachSummary,
    pub(crate) records: Vec<EligibleRecord>,
    pub(crate) frequency: ExamFrequency,
    pub(crate) deliveries: usize,
}

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/exams/match", post(match_endpoint))
        .route("/api/v1/outreach/preview", post(preview_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn match_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<MatchRequest>,
) -> Json<MatchResponse> {
    let found = state.pipeline.matcher().find_optional(payload.text.as_deref());
    let joined = found.as_ref().map(|exams| exams.joined());

    Json(MatchResponse {
        exams: found.map(|exams| exams.into_exams()),
        joined,
    })
}

/// Runs the batch over an inline CSV without touching the delivery log file.
pub(crate) async fn preview_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let PreviewRequest {
        unstructured_csv,
        group_by,
    } = payload;

    let log = MemoryDeliveryLog::default();
    let report = state
        .pipeline
        .run_from_reader(Cursor::new(unstructured_csv.into_bytes()), &log)?;
    let frequency = report.frequency(group_by);
    let deliveries = log.attempts().len();

    info!(
        scanned = report.summary.scanned,
        eligible = report.summary.eligible,
        "outreach preview generated"
    );

    Ok(Json(PreviewResponse {
        summary: report.summary,
        records: report.records,
        frequency,
        deliveries,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::build_pipeline;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use exam_outreach::workflows::exams::TermCase;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(ready: bool) -> Router {
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            pipeline: build_pipeline(TermCase::Preserve),
        };
        router().layer(Extension(state))
    }

    async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        (status, serde_json::from_slice(&bytes).expect("json"))
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let response = app(false)
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn match_endpoint_resolves_synonyms() {
        let (status, payload) = post_json(
            app(true),
            "/api/v1/exams/match",
            json!({ "text": "Solicito ultrassom abdominal e RX" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["exams"], json!(["ULTRASSONOGRAFIA", "RADIOGRAFIA"]));
        assert_eq!(payload["joined"], json!("ULTRASSONOGRAFIA, RADIOGRAFIA"));
    }

    #[tokio::test]
    async fn match_endpoint_returns_null_without_exams() {
        let (status, payload) = post_json(app(true), "/api/v1/exams/match", json!({})).await;

        assert_eq!(status, StatusCode::OK);
        assert!(payload["exams"].is_null());
        assert!(payload["joined"].is_null());
    }

    #[tokio::test]
    async fn preview_returns_eligible_records_and_frequency() {
        let csv = "ID,DATA,TEL,CPF,SOLICITANTE,DS_RECEITA\n\
1,2024-01-05,11911110000,111,Ana,RX e hemograma completo\n\
2,2024-01-06,,222,Bruno,Solicito ultrassom abdominal\n";
        let (status, payload) = post_json(
            app(true),
            "/api/v1/outreach/preview",
            json!({ "unstructured_csv": csv, "group_by": "exam" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["summary"]["eligible"], json!(1));
        assert_eq!(payload["deliveries"], json!(1));
        assert_eq!(payload["records"][0]["exams"], json!("RADIOGRAFIA, HEMOGRAMA"));
        assert_eq!(payload["records"][0]["status"], json!("Enviado"));
        assert_eq!(payload["frequency"]["entries"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn preview_rejects_csv_without_required_columns() {
        let (status, payload) = post_json(
            app(true),
            "/api/v1/outreach/preview",
            json!({ "unstructured_csv": "ID,TEL\n1,2\n" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload["error"]
            .as_str()
            .is_some_and(|message| message.contains("DATA")));
    }
}
