//! AI service manager: single-provider selector in front of the Colab
//! client. When the service is disabled the manager surfaces
//! `AiError::Disabled` — there is deliberately no rule-based
//! conversational fallback on this path.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use super::colab::{ChatRequest, ModelClient};
use super::enhance;
use super::metrics::PerformanceMetrics;
use super::AiError;

pub const SERVICE_NAME: &str = "colab";
pub const MODEL_NAME: &str = "phi3:mini";

/// Reply after enhancement, with provenance attached.
#[derive(Debug, Clone, Serialize)]
pub struct ManagedReply {
    pub response: String,
    pub conversation_id: Option<String>,
    pub service: &'static str,
    pub model: &'static str,
}

/// AI-backed symptom analysis result.
#[derive(Debug, Clone, Serialize)]
pub struct AiAnalysis {
    pub analysis: String,
    pub service: &'static str,
    pub confidence: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub available: bool,
    pub primary_service: &'static str,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub kind: &'static str,
    pub message: &'static str,
    pub action: &'static str,
}

pub struct AiManager {
    client: Option<Arc<dyn ModelClient>>,
    metrics: Arc<PerformanceMetrics>,
}

impl AiManager {
    pub fn new(client: Option<Arc<dyn ModelClient>>, metrics: Arc<PerformanceMetrics>) -> Self {
        Self { client, metrics }
    }

    pub fn enabled(&self) -> bool {
        self.client.is_some()
    }

    pub fn client(&self) -> Option<&Arc<dyn ModelClient>> {
        self.client.as_ref()
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }

    fn require_client(&self) -> Result<&Arc<dyn ModelClient>, AiError> {
        self.client.as_ref().ok_or(AiError::Disabled)
    }

    /// Call the model and run the enhancement pass over its reply.
    pub async fn generate_medical_response(
        &self,
        request: ChatRequest,
    ) -> Result<ManagedReply, AiError> {
        let client = self.require_client()?;
        let language = request.language;

        let start = Instant::now();
        let result = client.generate(request).await;
        self.metrics.record(start.elapsed(), result.is_err());

        let reply = result.inspect_err(|error| {
            tracing::error!(%error, "AI generation failed");
        })?;

        tracing::info!(
            chars = reply.response.len(),
            service = SERVICE_NAME,
            "AI response received"
        );

        Ok(ManagedReply {
            response: enhance::enhance(&reply.response, language),
            conversation_id: reply.conversation_id,
            service: SERVICE_NAME,
            model: MODEL_NAME,
        })
    }

    /// AI-backed analysis of discrete symptoms: the symptom list is
    /// rendered into a prompt and sent through the same chat path.
    pub async fn analyze_symptoms_with_ai(
        &self,
        symptoms: &[String],
        additional_info: Option<&str>,
    ) -> Result<AiAnalysis, AiError> {
        self.require_client()?;

        let message = format!(
            "Analyze these symptoms: {}. Additional info: {}",
            symptoms.join(", "),
            additional_info.unwrap_or("None"),
        );

        let request = ChatRequest {
            message,
            conversation_id: format!("analysis_{}", uuid::Uuid::new_v4().simple()),
            patient_id: "symptom_analysis".to_string(),
            language: crate::models::enums::Language::Fr,
            conversation_history: Vec::new(),
        };

        let reply = self.generate_medical_response(request).await?;

        Ok(AiAnalysis {
            analysis: reply.response,
            service: SERVICE_NAME,
            confidence: "high",
        })
    }

    /// Availability report for the status endpoint.
    pub async fn service_status(&self) -> ServiceStatus {
        let available = match self.client.as_ref() {
            Some(client) => client.health_check().await.is_ok(),
            None => false,
        };

        let recommendations = if available {
            vec![Recommendation {
                kind: "success",
                message: "External AI service (phi3:mini) is available and working.",
                action: "none",
            }]
        } else {
            vec![Recommendation {
                kind: "critical",
                message: "External AI service is not available. Check COLAB_API_URL and ensure the notebook is running.",
                action: "setup_colab",
            }]
        };

        ServiceStatus {
            available,
            primary_service: if available { SERVICE_NAME } else { "none" },
            recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::colab::{MockBehavior, MockModelClient};
    use crate::models::enums::Language;

    fn request(message: &str) -> ChatRequest {
        ChatRequest {
            message: message.into(),
            conversation_id: "conv_test".into(),
            patient_id: "7".into(),
            language: Language::Fr,
            conversation_history: Vec::new(),
        }
    }

    fn manager_with(client: MockModelClient) -> AiManager {
        AiManager::new(
            Some(Arc::new(client)),
            Arc::new(PerformanceMetrics::new()),
        )
    }

    fn disabled_manager() -> AiManager {
        AiManager::new(None, Arc::new(PerformanceMetrics::new()))
    }

    #[tokio::test]
    async fn disabled_manager_surfaces_disabled_error() {
        let manager = disabled_manager();
        let err = manager
            .generate_medical_response(request("bonjour"))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Disabled));
    }

    #[tokio::test]
    async fn reply_is_enhanced_with_disclaimer() {
        let manager = manager_with(MockModelClient::replying("Reposez-vous bien."));
        let reply = manager
            .generate_medical_response(request("fatigue"))
            .await
            .unwrap();
        assert!(reply.response.starts_with("Reposez-vous bien."));
        assert!(reply.response.contains("professionnel de santé"));
        assert_eq!(reply.service, "colab");
        assert_eq!(reply.model, "phi3:mini");
    }

    #[tokio::test]
    async fn upstream_failure_propagates_and_is_metered() {
        let manager = manager_with(MockModelClient::failing(MockBehavior::Upstream(500)));
        let err = manager
            .generate_medical_response(request("bonjour"))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Upstream { status: 500, .. }));

        let snap = manager.metrics().snapshot();
        assert_eq!(snap.total_requests, 1);
        assert_eq!(snap.error_rate, 100.0);
    }

    #[tokio::test]
    async fn symptom_analysis_builds_prompt() {
        let manager = manager_with(MockModelClient::replying("Analyse: syndrome grippal."));
        let analysis = manager
            .analyze_symptoms_with_ai(&["fièvre".into(), "toux".into()], Some("depuis 2 jours"))
            .await
            .unwrap();
        assert!(analysis.analysis.contains("syndrome grippal"));
        assert_eq!(analysis.confidence, "high");
    }

    #[tokio::test]
    async fn status_reports_available_service() {
        let manager = manager_with(MockModelClient::replying("ok"));
        let status = manager.service_status().await;
        assert!(status.available);
        assert_eq!(status.primary_service, "colab");
        assert_eq!(status.recommendations[0].kind, "success");
    }

    #[tokio::test]
    async fn status_reports_disabled_service() {
        let manager = disabled_manager();
        let status = manager.service_status().await;
        assert!(!status.available);
        assert_eq!(status.primary_service, "none");
        assert_eq!(status.recommendations[0].action, "setup_colab");
    }
}
