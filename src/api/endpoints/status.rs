//! AI service status and connection-test endpoints.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::ai::manager::{ServiceStatus, MODEL_NAME, SERVICE_NAME};
use crate::ai::metrics::MetricsSnapshot;
use crate::ai::monitor::MonitorStats;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Debug, Serialize)]
pub struct AiStatusResponse {
    pub success: bool,
    pub ai_manager: ServiceStatus,
    pub colab: Option<ColabStatus>,
    pub monitor: MonitorStats,
    pub metrics: MetricsSnapshot,
    pub environment: EnvironmentStatus,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ColabStatus {
    pub enabled: bool,
    pub available: bool,
    pub api_url: Option<String>,
    pub timeout_ms: u128,
    pub model: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct EnvironmentStatus {
    pub colab_enabled: bool,
    pub colab_api_url: &'static str,
}

/// `GET /ai-status` — manager availability, endpoint details, monitor
/// stats and request metrics in one report.
pub async fn ai_status(State(ctx): State<ApiContext>) -> Json<AiStatusResponse> {
    let ai_manager = ctx.ai.service_status().await;

    let colab = ctx.config.colab.enabled.then(|| ColabStatus {
        enabled: true,
        available: ai_manager.available,
        api_url: ctx
            .config
            .colab
            .api_url
            .as_ref()
            .map(|url| url.trim_end_matches('/').to_string()),
        timeout_ms: ctx.config.colab.timeout.as_millis(),
        model: MODEL_NAME,
        service: SERVICE_NAME,
    });

    Json(AiStatusResponse {
        success: true,
        ai_manager,
        colab,
        monitor: ctx.monitor.stats(),
        metrics: ctx.ai.metrics().snapshot(),
        environment: EnvironmentStatus {
            colab_enabled: ctx.config.colab.enabled,
            colab_api_url: if ctx.config.colab.api_url.is_some() {
                "configured"
            } else {
                "not_configured"
            },
        },
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct TestColabResponse {
    pub success: bool,
    pub error: Option<String>,
    pub timestamp: String,
}

/// `POST /test-colab` — one direct health probe against the endpoint.
/// 400 when the service is disabled, per the original contract.
pub async fn test_colab(
    State(ctx): State<ApiContext>,
) -> Result<Json<TestColabResponse>, ApiError> {
    let Some(client) = ctx.ai.client() else {
        return Err(ApiError::Validation(
            "Le service IA externe n'est pas activé".into(),
        ));
    };

    let result = client.health_check().await;
    Ok(Json(TestColabResponse {
        success: result.is_ok(),
        error: result.err().map(|e| e.to_string()),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}
