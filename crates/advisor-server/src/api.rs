//! HTTP API for analysis, follow-up questions, health checks and metrics

use advisor_lib::{
    health::{ComponentStatus, HealthRegistry},
    inventory::load_inventory_json,
    narrative::{prompts::analysis_message, validate_question, NarrativeContext, NarrativeGenerator},
    observability::{EngineMetrics, StructuredLogger},
    AnalysisError, Analyzer, MigrationRecommendation,
};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub narrator: Arc<dyn NarrativeGenerator>,
    pub health_registry: HealthRegistry,
    pub metrics: EngineMetrics,
    pub logger: StructuredLogger,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(
        analyzer: Analyzer,
        narrator: Arc<dyn NarrativeGenerator>,
        health_registry: HealthRegistry,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            narrator,
            health_registry,
            metrics: EngineMetrics::new(),
            logger,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: String,
    pub data: MigrationRecommendation,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub recommendation: MigrationRecommendation,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    details: String,
}

/// Library errors mapped onto HTTP statuses
pub struct ApiError(AnalysisError);

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self.0 {
            AnalysisError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid input"),
            AnalysisError::Parse(_) => (StatusCode::BAD_REQUEST, "malformed request body"),
            AnalysisError::Narrative(_) => (StatusCode::BAD_GATEWAY, "narrative generation failed"),
            AnalysisError::InvalidConfig(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "service misconfigured")
            }
        };
        let body = ErrorBody {
            error,
            details: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn body_text(body: &Bytes) -> Result<&str, ApiError> {
    std::str::from_utf8(body).map_err(|e| {
        ApiError(AnalysisError::InvalidInput(format!(
            "request body is not UTF-8: {}",
            e
        )))
    })
}

/// Analyze an uploaded inventory document
async fn analyze(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let inventory = load_inventory_json(body_text(&body)?)?;

    let outcome = state.analyzer.analyze_detailed(&inventory);
    state.metrics.record_analysis(&outcome);
    state.logger.log_analysis(&outcome);

    let recommendation = outcome.recommendation;
    Ok(Json(AnalysisResponse {
        kind: "analysis",
        message: analysis_message(&recommendation),
        data: recommendation,
        timestamp: Utc::now(),
    }))
}

/// Answer a follow-up question about a recommendation the caller holds
async fn ask(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AnswerResponse>, ApiError> {
    let request: AskRequest = serde_json::from_str(body_text(&body)?).map_err(AnalysisError::from)?;
    let question = validate_question(&request.question)?;
    let context = NarrativeContext::from_recommendation(&request.recommendation);

    state.metrics.inc_narrative_requests();
    let start = Instant::now();
    let result = state.narrator.answer(&context, question).await;
    let elapsed = start.elapsed();

    state.logger.log_narrative_answer(
        &context.application_name,
        state.narrator.name(),
        elapsed,
        result.is_ok(),
    );
    let failure = result.as_ref().err().map(ToString::to_string);
    state
        .health_registry
        .record_narrator_call(state.narrator.as_ref(), failure.as_deref())
        .await;

    match result {
        Ok(message) => Ok(Json(AnswerResponse {
            kind: "answer",
            message,
            timestamp: Utc::now(),
        })),
        Err(err) => {
            state.metrics.inc_narrative_errors();
            error!(error = %err, narrator = %state.narrator.name(), "Narrator call failed");
            Err(err.into())
        }
    }
}

/// Health check response - returns 200 if healthy or degraded, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.max_body_bytes;
    Router::new()
        .route("/api/v1/analyze", post(analyze))
        .route("/api/v1/ask", post(ask))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Start the API server and run until Ctrl-C
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
        })
        .await?;

    Ok(())
}
