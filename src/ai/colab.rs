//! HTTP client for the Colab-hosted phi3:mini endpoint.
//!
//! The remote notebook exposes `GET /` (health), `POST /chat`,
//! `GET /conversations/{id}` and `POST /reset-conversation`, usually
//! tunnelled through ngrok — hence the skip-browser-warning header.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::AiError;
use crate::models::enums::Language;
use crate::models::HistoryTurn;

/// Health probes use a short timeout regardless of the chat timeout.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Request payload for `POST /chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: String,
    pub patient_id: String,
    pub language: Language,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conversation_history: Vec<HistoryTurn>,
}

/// Successful reply from `POST /chat`.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub response: String,
    pub conversation_id: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireChatReply {
    status: Option<String>,
    response: Option<String>,
    conversation_id: Option<String>,
    timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireHistoryReply {
    #[serde(default)]
    history: Vec<HistoryTurn>,
}

#[derive(Debug, Deserialize)]
struct WireResetReply {
    conversation_id: Option<String>,
}

/// Seam between the orchestration code and the remote model, so tests
/// can substitute a mock.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, request: ChatRequest) -> Result<ChatReply, AiError>;
    async fn health_check(&self) -> Result<(), AiError>;
    async fn conversation_history(
        &self,
        conversation_id: &str,
        patient_id: &str,
    ) -> Result<Vec<HistoryTurn>, AiError>;
    async fn reset_conversation(&self) -> Result<String, AiError>;
}

#[derive(Debug, Clone)]
pub struct ColabClient {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl ColabClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        // ngrok interstitial pages break JSON parsing otherwise
        headers.insert(
            "ngrok-skip-browser-warning",
            reqwest::header::HeaderValue::from_static("true"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .user_agent("BluePulse-Assistant/1.0")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs: timeout.as_secs(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    fn map_send_error(&self, err: reqwest::Error) -> AiError {
        if err.is_timeout() {
            AiError::Timeout {
                seconds: self.timeout_secs,
            }
        } else if err.is_connect() {
            AiError::Connection(self.base_url.clone())
        } else {
            AiError::Connection(format!("{}: {err}", self.base_url))
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Upstream {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ModelClient for ColabClient {
    async fn generate(&self, request: ChatRequest) -> Result<ChatReply, AiError> {
        let url = format!("{}/chat", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Colab chat request failed");
                self.map_send_error(e)
            })?;

        let response = Self::check_status(response).await?;

        let wire: WireChatReply = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;

        if wire.status.as_deref() != Some("success") {
            return Err(AiError::InvalidResponse(format!(
                "unexpected status {:?}",
                wire.status
            )));
        }

        let text = wire
            .response
            .ok_or_else(|| AiError::InvalidResponse("missing response field".into()))?;

        Ok(ChatReply {
            response: text,
            conversation_id: wire.conversation_id,
            timestamp: wire.timestamp,
        })
    }

    async fn health_check(&self) -> Result<(), AiError> {
        let url = format!("{}/", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        Self::check_status(response).await.map(|_| ())
    }

    async fn conversation_history(
        &self,
        conversation_id: &str,
        patient_id: &str,
    ) -> Result<Vec<HistoryTurn>, AiError> {
        let url = format!("{}/conversations/{conversation_id}", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("patient_id", patient_id)])
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let response = Self::check_status(response).await?;
        let wire: WireHistoryReply = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;
        Ok(wire.history)
    }

    async fn reset_conversation(&self) -> Result<String, AiError> {
        let url = format!("{}/reset-conversation", self.base_url);
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let response = Self::check_status(response).await?;
        let wire: WireResetReply = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;

        wire.conversation_id
            .ok_or_else(|| AiError::InvalidResponse("missing conversation_id".into()))
    }
}

// ═══════════════════════════════════════════════════════════
// Mock client for tests
// ═══════════════════════════════════════════════════════════

/// What a `MockModelClient` should do on each call.
#[cfg(test)]
#[derive(Debug, Clone)]
pub enum MockBehavior {
    Reply(String),
    Timeout,
    Upstream(u16),
    Connection,
}

#[cfg(test)]
pub struct MockModelClient {
    behavior: MockBehavior,
    pub conversation_id: Option<String>,
}

#[cfg(test)]
impl MockModelClient {
    pub fn replying(text: &str) -> Self {
        Self {
            behavior: MockBehavior::Reply(text.to_string()),
            conversation_id: None,
        }
    }

    pub fn failing(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            conversation_id: None,
        }
    }

    fn error(&self) -> Option<AiError> {
        match &self.behavior {
            MockBehavior::Reply(_) => None,
            MockBehavior::Timeout => Some(AiError::Timeout { seconds: 120 }),
            MockBehavior::Upstream(status) => Some(AiError::Upstream {
                status: *status,
                body: "mock upstream failure".into(),
            }),
            MockBehavior::Connection => {
                Some(AiError::Connection("http://mock.invalid".into()))
            }
        }
    }
}

#[cfg(test)]
#[async_trait]
impl ModelClient for MockModelClient {
    async fn generate(&self, _request: ChatRequest) -> Result<ChatReply, AiError> {
        if let Some(err) = self.error() {
            return Err(err);
        }
        let MockBehavior::Reply(text) = &self.behavior else {
            unreachable!()
        };
        Ok(ChatReply {
            response: text.clone(),
            conversation_id: self.conversation_id.clone(),
            timestamp: None,
        })
    }

    async fn health_check(&self) -> Result<(), AiError> {
        match self.error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn conversation_history(
        &self,
        _conversation_id: &str,
        _patient_id: &str,
    ) -> Result<Vec<HistoryTurn>, AiError> {
        match self.error() {
            Some(err) => Err(err),
            None => Ok(Vec::new()),
        }
    }

    async fn reset_conversation(&self) -> Result<String, AiError> {
        match self.error() {
            Some(err) => Err(err),
            None => Ok("conv_mock".into()),
        }
    }
}
