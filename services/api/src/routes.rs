use crate::infra::AppState;
use admission_placement::error::AppError;
use admission_placement::placement::{
    convert_batch, AdmissionTrack, CandidateScores, ConversionOutcome, ConversionQuery,
    PlacementReport,
};
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Deserialize)]
pub(crate) struct PlacementAnalysisPayload {
    pub(crate) academic_year: u16,
    #[serde(alias = "admission_type")]
    pub(crate) admission_track: AdmissionTrack,
    #[serde(flatten)]
    pub(crate) candidate: CandidateScores,
}

#[derive(Debug, Serialize)]
pub(crate) struct PlacementAnalysisResponse {
    pub(crate) success: bool,
    pub(crate) academic_year: u16,
    pub(crate) admission_track: AdmissionTrack,
    pub(crate) input_scores: CandidateScores,
    #[serde(flatten)]
    pub(crate) report: PlacementReport,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchConversionRequest {
    pub(crate) academic_year: u16,
    pub(crate) conversions: Vec<ConversionQuery>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchConversionResponse {
    pub(crate) success: bool,
    pub(crate) academic_year: u16,
    /// False when no official table is loaded for the year and every level is estimated.
    pub(crate) table_available: bool,
    pub(crate) results: Vec<ConversionOutcome>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConversionParams {
    pub(crate) year: u16,
    pub(crate) subject: String,
    pub(crate) level: i32,
}

pub(crate) fn placement_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/placement-analysis",
            get(describe_placement_analysis).post(placement_analysis_endpoint),
        )
        .route(
            "/api/v1/score-conversion",
            get(single_conversion_endpoint).post(batch_conversion_endpoint),
        )
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

pub(crate) async fn placement_analysis_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<PlacementAnalysisPayload>,
) -> Result<Json<PlacementAnalysisResponse>, AppError> {
    let PlacementAnalysisPayload {
        academic_year,
        admission_track,
        candidate,
    } = payload;

    let request = state
        .reference
        .request(academic_year, admission_track, candidate);
    let report = state.engine.analyze(&request)?;

    Ok(Json(PlacementAnalysisResponse {
        success: true,
        academic_year,
        admission_track,
        input_scores: request.candidate,
        report,
    }))
}

pub(crate) async fn describe_placement_analysis(
    Extension(state): Extension<AppState>,
) -> Json<serde_json::Value> {
    let limits = state.engine.config().display_limits;

    Json(json!({
        "endpoint": "/api/v1/placement-analysis",
        "method": "POST",
        "description": "Estimate admission odds for every department offering the requested track",
        "supported_years": state.engine.config().supported_years,
        "admission_tracks": [
            AdmissionTrack::PersonalApplication.label(),
            AdmissionTrack::DistributionAdmission.label(),
            AdmissionTrack::StarPlan.label(),
        ],
        "request_body": {
            "academic_year": "number",
            "admission_track": "personal_application | distribution_admission | star_plan",
            "general_scores": "15-level general test scores keyed by subject",
            "subject_scores": "60-level subject test scores keyed by subject",
            "listening_grade": "A | B | C | F (optional)"
        },
        "example_request": {
            "academic_year": 114,
            "admission_track": "distribution_admission",
            "general_scores": { "chinese": 13, "english": 12, "math_a": 14, "social": 12, "nature": 13 },
            "subject_scores": { "history": 45, "geography": 42 },
            "listening_grade": "A"
        },
        "display_limits": limits,
    }))
}

pub(crate) async fn batch_conversion_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<BatchConversionRequest>,
) -> Json<BatchConversionResponse> {
    let table = state.reference.conversion_for(payload.academic_year);

    Json(BatchConversionResponse {
        success: true,
        academic_year: payload.academic_year,
        table_available: table.is_some(),
        results: convert_batch(&payload.conversions, table),
    })
}

pub(crate) async fn single_conversion_endpoint(
    Extension(state): Extension<AppState>,
    Query(params): Query<ConversionParams>,
) -> impl IntoResponse {
    let table = state.reference.conversion_for(params.year);
    let query = ConversionQuery {
        subject: params.subject,
        level_15: params.level,
    };

    let mut outcomes = convert_batch(std::slice::from_ref(&query), table);
    let outcome = outcomes.pop();
    let status = match &outcome {
        Some(outcome) if outcome.error.is_none() => StatusCode::OK,
        _ => StatusCode::BAD_REQUEST,
    };

    (status, Json(json!({ "academic_year": params.year, "data": outcome })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use admission_placement::placement::{
        ConfidenceLevel, PlacementConfig, PlacementError, ReferenceBundle,
    };
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;

    fn sample_bundle() -> ReferenceBundle {
        serde_json::from_value(json!({
            "general_standards": {
                "academic_year": 114,
                "exam_type": "general",
                "subjects": {
                    "chinese": { "top": 13, "front": 12, "average": 10, "back": 9, "bottom": 7 }
                }
            },
            "conversion_table": {
                "academic_year": 113,
                "subjects": { "chinese": { "13": 50 } }
            },
            "schools": [{
                "school_id": "0001",
                "school_name": "國立臺灣大學",
                "departments": [{
                    "department_id": "0001-CL",
                    "department_name": "中國文學系",
                    "admission_data": {
                        "114": { "plans": { "distribution_admission": {
                            "exam_thresholds": [
                                { "subject": "國文", "exam_type": "學測", "threshold": "前標" }
                            ],
                            "scoring_weights": [
                                { "subject": "國文", "source_type": "學測", "multiplier": 1.0 }
                            ],
                            "last_year_pass_data": { "min_score": 40.0 }
                        } } }
                    }
                }]
            }]
        }))
        .expect("sample bundle parses")
    }

    fn sample_state(supported_years: Vec<u16>) -> AppState {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let config = PlacementConfig {
            supported_years,
            ..PlacementConfig::default()
        };
        AppState::new(handle, config, sample_bundle())
    }

    fn payload(academic_year: u16) -> PlacementAnalysisPayload {
        serde_json::from_value(json!({
            "academic_year": academic_year,
            "admission_type": "distribution_admission",
            "gsat_scores": { "國文": 13 },
        }))
        .expect("payload parses")
    }

    #[tokio::test]
    async fn placement_analysis_endpoint_returns_bucketed_report() {
        let state = sample_state(vec![114]);

        let Json(body) = placement_analysis_endpoint(Extension(state), Json(payload(114)))
            .await
            .expect("analysis succeeds");

        assert!(body.success);
        assert_eq!(body.report.summary.total_departments, 1);
        let result = &body.report.results.high_confidence[0];
        assert_eq!(result.identity.department_name, "中國文學系");
        assert_eq!(result.score_calculation.weighted_score, 50.0);
        assert_eq!(result.confidence_level, ConfidenceLevel::High);
        assert_eq!(body.input_scores.general_scores.get("chinese"), Some(&13));
    }

    #[tokio::test]
    async fn placement_analysis_endpoint_rejects_unsupported_years() {
        let state = sample_state(vec![114]);

        let err = placement_analysis_endpoint(Extension(state), Json(payload(113)))
            .await
            .expect_err("year 113 is not served");

        assert!(matches!(
            err,
            AppError::Placement(PlacementError::UnsupportedYear { year: 113, .. })
        ));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn describe_lists_supported_years() {
        let Json(body) = describe_placement_analysis(Extension(sample_state(vec![114, 115]))).await;

        assert_eq!(body["method"], "POST");
        assert_eq!(body["supported_years"], json!([114, 115]));
        assert_eq!(body["display_limits"]["high"], 50);
    }

    #[tokio::test]
    async fn batch_conversion_uses_the_matching_year_table() {
        let request = BatchConversionRequest {
            academic_year: 113,
            conversions: vec![
                ConversionQuery {
                    subject: "chinese".to_string(),
                    level_15: 13,
                },
                ConversionQuery {
                    subject: "english".to_string(),
                    level_15: 10,
                },
                ConversionQuery {
                    subject: "history".to_string(),
                    level_15: 10,
                },
            ],
        };

        let Json(body) =
            batch_conversion_endpoint(Extension(sample_state(Vec::new())), Json(request)).await;

        assert!(body.table_available);
        assert_eq!(body.results[0].level_60, Some(50));
        assert_eq!(body.results[1].level_60, Some(40));
        assert!(body.results[2].error.is_some());
    }

    #[tokio::test]
    async fn single_conversion_rejects_out_of_range_levels() {
        let params = ConversionParams {
            year: 113,
            subject: "chinese".to_string(),
            level: 16,
        };

        let response = single_conversion_endpoint(Extension(sample_state(Vec::new())), Query(params))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn readiness_reports_initializing_until_bound() {
        let response = readiness_endpoint(Extension(sample_state(Vec::new())))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn analysis_route_accepts_json_payloads() {
        let router = placement_routes().layer(Extension(sample_state(Vec::new())));
        let body = json!({
            "academic_year": 114,
            "admission_type": "distribution_admission",
            "gsat_scores": { "chinese": 13 },
        });

        let response = router
            .oneshot(
                axum::http::Request::post("/api/v1/placement-analysis")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(axum::body::Body::from(body.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(payload["admission_track"], "distribution_admission");
        assert_eq!(payload["summary"]["total_departments"], 1);
        assert_eq!(payload["results"]["high_confidence"][0]["department_id"], "0001-CL");
    }
}
