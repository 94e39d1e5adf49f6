//! API router.
//!
//! Two route groups sharing the same handlers:
//! - `/api/public/diagnosis/*` — unauthenticated, never persisted
//! - `/api/patient/diagnosis/*` — identity middleware injects
//!   `PatientContext`, analyses and chat turns are persisted

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

pub fn api_router(ctx: ApiContext) -> Router {
    let public = Router::new()
        .route("/analyze", post(endpoints::analyze::analyze))
        .route("/analyze-advanced", post(endpoints::analyze::analyze_advanced))
        .route("/chat", post(endpoints::chat::send))
        .route("/symptoms", get(endpoints::symptoms::list))
        .route("/ai-status", get(endpoints::status::ai_status))
        .route("/test-colab", post(endpoints::status::test_colab))
        .with_state(ctx.clone());

    let patient = Router::new()
        .route("/analyze", post(endpoints::analyze::analyze))
        .route("/analyze-advanced", post(endpoints::analyze::analyze_advanced))
        .route("/chat", post(endpoints::chat::send))
        .route("/history", get(endpoints::history::history))
        .route("/feedback", post(endpoints::history::submit_feedback))
        .with_state(ctx)
        .layer(axum::middleware::from_fn(
            middleware::identity::require_patient,
        ));

    Router::new()
        .nest("/api/public/diagnosis", public)
        .nest("/api/patient/diagnosis", patient)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::ai::colab::{MockBehavior, MockModelClient};
    use crate::ai::metrics::PerformanceMetrics;
    use crate::ai::monitor::HealthMonitor;
    use crate::ai::AiManager;
    use crate::config::{AppConfig, ColabConfig};

    struct TestHarness {
        router: Router,
        // Holds the database directory for the test's lifetime
        _tmp: tempfile::TempDir,
    }

    fn harness_with(client: Option<MockModelClient>) -> TestHarness {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("test.db");
        // Initialize the schema once, as main() does
        crate::db::open_database(&db_path).unwrap();

        let config = Arc::new(AppConfig {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            database_path: db_path.clone(),
            colab: ColabConfig {
                enabled: client.is_some(),
                api_url: client
                    .is_some()
                    .then(|| "https://test.ngrok.io".to_string()),
                timeout: std::time::Duration::from_secs(30),
                health_interval: std::time::Duration::from_secs(60),
            },
        });

        let ai = Arc::new(AiManager::new(
            client.map(|c| Arc::new(c) as Arc<dyn crate::ai::ModelClient>),
            Arc::new(PerformanceMetrics::new()),
        ));

        let ctx = ApiContext::new(config, ai, Arc::new(HealthMonitor::disabled()), db_path);
        TestHarness {
            router: api_router(ctx),
            _tmp: tmp,
        }
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_json_as_patient(uri: &str, patient_id: i64, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("X-Patient-Id", patient_id.to_string())
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ── analyze ────────────────────────────────────────────────

    #[tokio::test]
    async fn public_analyze_returns_suggestions() {
        let harness = harness_with(None);
        let response = harness
            .router
            .oneshot(post_json(
                "/api/public/diagnosis/analyze",
                serde_json::json!({"symptoms": ["fièvre", "toux"]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert!(json["analysis_id"].is_null());
        assert_eq!(json["has_emergency_symptoms"], false);
        let conditions: Vec<&str> = json["suggestions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["condition"].as_str().unwrap())
            .collect();
        assert!(conditions.contains(&"Syndrome viral"));
    }

    #[tokio::test]
    async fn analyze_without_symptoms_is_400() {
        let harness = harness_with(None);
        let response = harness
            .router
            .oneshot(post_json(
                "/api/public/diagnosis/analyze",
                serde_json::json!({"symptoms": []}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "Au moins un symptôme est requis");
    }

    #[tokio::test]
    async fn emergency_symptom_flagged_in_response() {
        let harness = harness_with(None);
        let response = harness
            .router
            .oneshot(post_json(
                "/api/public/diagnosis/analyze",
                serde_json::json!({"symptoms": ["chest_pain"]}),
            ))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["has_emergency_symptoms"], true);
        assert!(json["emergency_message"].is_string());
    }

    #[tokio::test]
    async fn patient_analyze_persists_and_appears_in_history() {
        let harness = harness_with(None);

        let response = harness
            .router
            .clone()
            .oneshot(post_json_as_patient(
                "/api/patient/diagnosis/analyze",
                7,
                serde_json::json!({"symptoms": ["fièvre"], "additional_info": "depuis hier"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["analysis_id"].is_i64());

        let response = harness
            .router
            .oneshot(
                Request::builder()
                    .uri("/api/patient/diagnosis/history")
                    .header("X-Patient-Id", "7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let history = json["history"].as_array().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["symptoms"][0], "fièvre");
        assert_eq!(history[0]["additional_info"], "depuis hier");
    }

    #[tokio::test]
    async fn patient_routes_require_identity_header() {
        let harness = harness_with(None);
        let response = harness
            .router
            .oneshot(post_json(
                "/api/patient/diagnosis/analyze",
                serde_json::json!({"symptoms": ["fièvre"]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_patient_id_rejected() {
        let harness = harness_with(None);
        let response = harness
            .router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/patient/diagnosis/analyze")
                    .header("content-type", "application/json")
                    .header("X-Patient-Id", "not-a-number")
                    .body(Body::from(r#"{"symptoms":["fièvre"]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // ── chat ───────────────────────────────────────────────────

    #[tokio::test]
    async fn public_chat_replies_with_disclaimer() {
        let harness = harness_with(Some(MockModelClient::replying("Reposez-vous.")));
        let response = harness
            .router
            .oneshot(post_json(
                "/api/public/diagnosis/chat",
                serde_json::json!({"message": "bonjour docteur"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert!(json["message"]
            .as_str()
            .unwrap()
            .contains("professionnel de santé"));
        assert_eq!(json["persistence"]["status"], "skipped");
        assert_eq!(json["type"], "assistant");
        assert_eq!(json["source"], "colab");
    }

    #[tokio::test]
    async fn patient_chat_is_persisted() {
        let harness = harness_with(Some(MockModelClient::replying("Je comprends.")));
        let response = harness
            .router
            .oneshot(post_json_as_patient(
                "/api/patient/diagnosis/chat",
                7,
                serde_json::json!({"message": "j'ai mal à la tête"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["persistence"]["status"], "saved");
        assert!(json["conversation_id"].as_str().unwrap().starts_with("conv_"));
    }

    #[tokio::test]
    async fn empty_chat_message_is_400() {
        let harness = harness_with(Some(MockModelClient::replying("x")));
        let response = harness
            .router
            .oneshot(post_json(
                "/api/public/diagnosis/chat",
                serde_json::json!({"message": "   "}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "Message requis");
    }

    #[tokio::test]
    async fn chat_with_disabled_ai_is_503() {
        let harness = harness_with(None);
        let response = harness
            .router
            .oneshot(post_json(
                "/api/public/diagnosis/chat",
                serde_json::json!({"message": "bonjour"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn chat_upstream_timeout_is_504() {
        let harness = harness_with(Some(MockModelClient::failing(MockBehavior::Timeout)));
        let response = harness
            .router
            .oneshot(post_json(
                "/api/public/diagnosis/chat",
                serde_json::json!({"message": "bonjour"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    // ── feedback ───────────────────────────────────────────────

    #[tokio::test]
    async fn feedback_flow_round_trips() {
        let harness = harness_with(None);

        let response = harness
            .router
            .clone()
            .oneshot(post_json_as_patient(
                "/api/patient/diagnosis/analyze",
                7,
                serde_json::json!({"symptoms": ["toux"]}),
            ))
            .await
            .unwrap();
        let json = body_json(response).await;
        let analysis_id = json["analysis_id"].as_i64().unwrap();

        let response = harness
            .router
            .oneshot(post_json_as_patient(
                "/api/patient/diagnosis/feedback",
                7,
                serde_json::json!({"suggestion_id": analysis_id, "rating": 4, "feedback": "utile"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn feedback_on_foreign_analysis_is_404() {
        let harness = harness_with(None);

        let response = harness
            .router
            .clone()
            .oneshot(post_json_as_patient(
                "/api/patient/diagnosis/analyze",
                7,
                serde_json::json!({"symptoms": ["toux"]}),
            ))
            .await
            .unwrap();
        let json = body_json(response).await;
        let analysis_id = json["analysis_id"].as_i64().unwrap();

        // Another patient cannot rate it
        let response = harness
            .router
            .oneshot(post_json_as_patient(
                "/api/patient/diagnosis/feedback",
                8,
                serde_json::json!({"suggestion_id": analysis_id, "rating": 4}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn feedback_rating_out_of_range_is_400() {
        let harness = harness_with(None);
        let response = harness
            .router
            .oneshot(post_json_as_patient(
                "/api/patient/diagnosis/feedback",
                7,
                serde_json::json!({"suggestion_id": 1, "rating": 6}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // ── symptoms & status ──────────────────────────────────────

    #[tokio::test]
    async fn symptoms_catalog_served() {
        let harness = harness_with(None);
        let response = harness
            .router
            .oneshot(
                Request::builder()
                    .uri("/api/public/diagnosis/symptoms")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let symptoms = json["symptoms"].as_array().unwrap();
        assert_eq!(symptoms.len(), 20);
        assert_eq!(symptoms[0]["id"], "fever");
        assert_eq!(symptoms[0]["label"], "Fièvre");
        assert_eq!(symptoms[0]["darija"], "سخانة");
    }

    #[tokio::test]
    async fn ai_status_reports_disabled_environment() {
        let harness = harness_with(None);
        let response = harness
            .router
            .oneshot(
                Request::builder()
                    .uri("/api/public/diagnosis/ai-status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert!(json["colab"].is_null());
        assert_eq!(json["environment"]["colab_enabled"], false);
        assert_eq!(json["environment"]["colab_api_url"], "not_configured");
        assert_eq!(json["ai_manager"]["available"], false);
    }

    #[tokio::test]
    async fn test_colab_disabled_is_400() {
        let harness = harness_with(None);
        let response = harness
            .router
            .oneshot(post_json("/api/public/diagnosis/test-colab", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_colab_enabled_probes_endpoint() {
        let harness = harness_with(Some(MockModelClient::replying("ok")));
        let response = harness
            .router
            .oneshot(post_json("/api/public/diagnosis/test-colab", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert!(json["error"].is_null());
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let harness = harness_with(None);
        let response = harness
            .router
            .oneshot(
                Request::builder()
                    .uri("/api/public/diagnosis/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
