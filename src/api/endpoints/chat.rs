//! `POST /chat` — free-text conversation with the assistant.

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, PatientContext};
use crate::chat::{self, ChatTurn, PatientSession, PersistenceOutcome};
use crate::models::enums::Language;

#[derive(Debug, Deserialize)]
pub struct ChatApiRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub language: Option<Language>,
}

#[derive(Debug, Serialize)]
pub struct ChatApiResponse {
    pub message: String,
    pub conversation_id: String,
    pub language: Language,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub source: &'static str,
    pub timestamp: String,
    pub persistence: PersistenceOutcome,
}

pub async fn send(
    State(ctx): State<ApiContext>,
    patient: Option<Extension<PatientContext>>,
    Json(request): Json<ChatApiRequest>,
) -> Result<Json<ChatApiResponse>, ApiError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(ApiError::Validation("Message requis".into()));
    }
    if message.len() > chat::MAX_MESSAGE_CHARS {
        return Err(ApiError::Validation(
            "Message trop long (2000 caractères maximum)".into(),
        ));
    }

    let turn = ChatTurn {
        message: message.to_string(),
        conversation_id: request.conversation_id,
        language: request.language,
    };

    let session = match patient {
        Some(Extension(patient)) => Some(PatientSession {
            conn: ctx.open_db()?,
            patient_id: patient.patient_id,
        }),
        None => None,
    };

    let outcome = chat::run_chat_turn(&ctx.ai, session, turn).await?;

    Ok(Json(ChatApiResponse {
        message: outcome.message,
        conversation_id: outcome.conversation_id,
        language: outcome.language,
        kind: "assistant",
        source: outcome.source,
        timestamp: chrono::Utc::now().to_rfc3339(),
        persistence: outcome.persistence,
    }))
}
