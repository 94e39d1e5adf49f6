//! Conversational orchestrator for the assistant chat path.
//!
//! Decides the response language, loads short-term history, calls the
//! external model through `AiManager` (no rule-based fallback — an AI
//! failure is surfaced to the caller), post-processes the reply, and
//! persists the turn best-effort for authenticated patients.

use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

use crate::ai::colab::ChatRequest;
use crate::ai::{enhance, AiError, AiManager, ManagedReply};
use crate::db::repository::chat_history;
use crate::models::enums::{Language, Sender};
use crate::models::HistoryTurn;
use crate::triage::extract::analyze_message;
use crate::triage::specialist::{recommend_specialist, recommendation_text};

pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Darija marker words: any of these in the message switches the
/// response language to Arabic when no explicit language was given.
const DARIJA_MARKERS: &[&str] = &["ديال", "كاين", "واش"];

/// One incoming chat request.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub message: String,
    pub conversation_id: Option<String>,
    pub language: Option<Language>,
}

/// Database access for an authenticated patient. Absent for public
/// (unauthenticated) turns, which are never persisted.
///
/// Owns its connection: a borrowed `&Connection` held across the AI
/// await would make the turn future non-Send.
pub struct PatientSession {
    pub conn: Connection,
    pub patient_id: i64,
}

/// Reported separately from the reply so callers can tell a fully
/// persisted turn from a best-effort one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum PersistenceOutcome {
    Saved,
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatOutcome {
    pub message: String,
    pub conversation_id: String,
    pub language: Language,
    pub source: &'static str,
    pub persistence: PersistenceOutcome,
}

/// Pick the response language: explicit parameter wins, then Darija
/// markers, then French.
pub fn detect_language(message: &str, explicit: Option<Language>) -> Language {
    if let Some(language) = explicit {
        return language;
    }
    if DARIJA_MARKERS.iter().any(|marker| message.contains(marker)) {
        Language::Ar
    } else {
        Language::Fr
    }
}

/// Run one chat turn end to end.
pub async fn run_chat_turn(
    ai: &AiManager,
    session: Option<PatientSession>,
    turn: ChatTurn,
) -> Result<ChatOutcome, AiError> {
    let language = detect_language(&turn.message, turn.language);
    let mut conversation_id = turn
        .conversation_id
        .clone()
        .unwrap_or_else(|| format!("conv_{}", Uuid::new_v4().simple()));

    let mut store_failure: Option<String> = None;

    // History only exists for authenticated patients resuming a
    // conversation; failures degrade to an empty context.
    let history: Vec<HistoryTurn> = match (&session, &turn.conversation_id) {
        (Some(session), Some(conversation_id)) => {
            match chat_history::get_recent_messages(&session.conn, conversation_id, session.patient_id)
            {
                Ok(messages) => messages.iter().map(HistoryTurn::from).collect(),
                Err(error) => {
                    tracing::warn!(%error, "Could not retrieve chat history");
                    Vec::new()
                }
            }
        }
        _ => Vec::new(),
    };

    if let Some(session) = &session {
        if let Err(error) = chat_history::insert_message(
            &session.conn,
            &conversation_id,
            session.patient_id,
            &turn.message,
            Sender::User,
        ) {
            tracing::warn!(%error, "Could not store user message");
            store_failure = Some(error.to_string());
        }
    }

    let signals = analyze_message(&turn.message);

    let request = ChatRequest {
        message: turn.message.clone(),
        conversation_id: conversation_id.clone(),
        patient_id: session
            .as_ref()
            .map(|s| s.patient_id.to_string())
            .unwrap_or_else(|| "public_user".to_string()),
        language,
        conversation_history: history,
    };

    let reply: ManagedReply = ai.generate_medical_response(request).await?;
    if let Some(id) = reply.conversation_id {
        conversation_id = id;
    }

    let mut message = enhance::dedup_disclaimers(&reply.response);

    if !signals.symptoms.is_empty() || !signals.body_parts.is_empty() {
        let specialty = recommend_specialist(&signals.body_parts, &signals.symptoms);
        message.push_str(&recommendation_text(specialty, signals.severity, language));
    }

    let message = enhance::ensure_disclaimer(&message, language);

    if let Some(session) = &session {
        if let Err(error) = chat_history::insert_message(
            &session.conn,
            &conversation_id,
            session.patient_id,
            &message,
            Sender::Assistant,
        ) {
            tracing::warn!(%error, "Could not store assistant message");
            store_failure = Some(error.to_string());
        }
    }

    let persistence = match (&session, store_failure) {
        (None, _) => PersistenceOutcome::Skipped,
        (Some(_), None) => PersistenceOutcome::Saved,
        (Some(_), Some(reason)) => PersistenceOutcome::Failed(reason),
    };

    Ok(ChatOutcome {
        message,
        conversation_id,
        language,
        source: reply.service,
        persistence,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ai::colab::{MockBehavior, MockModelClient};
    use crate::ai::metrics::PerformanceMetrics;

    fn manager(client: MockModelClient) -> AiManager {
        AiManager::new(
            Some(Arc::new(client)),
            Arc::new(PerformanceMetrics::new()),
        )
    }

    fn turn(message: &str) -> ChatTurn {
        ChatTurn {
            message: message.into(),
            conversation_id: None,
            language: None,
        }
    }

    // ── language detection ─────────────────────────────────────

    #[test]
    fn explicit_language_wins() {
        assert_eq!(detect_language("واش نتا بخير", Some(Language::Fr)), Language::Fr);
    }

    #[test]
    fn darija_markers_switch_to_arabic() {
        assert_eq!(detect_language("واش عندي شي مشكل", None), Language::Ar);
        assert_eq!(detect_language("الوجع ديال الراس", None), Language::Ar);
        assert_eq!(detect_language("كاين وجع", None), Language::Ar);
    }

    #[test]
    fn default_language_is_french() {
        assert_eq!(detect_language("j'ai mal à la tête", None), Language::Fr);
    }

    // ── orchestration ──────────────────────────────────────────

    #[tokio::test]
    async fn public_turn_is_not_persisted() {
        let ai = manager(MockModelClient::replying("Reposez-vous."));
        let outcome = run_chat_turn(&ai, None, turn("bonjour docteur"))
            .await
            .unwrap();
        assert_eq!(outcome.persistence, PersistenceOutcome::Skipped);
        assert!(outcome.conversation_id.starts_with("conv_"));
        assert_eq!(outcome.source, "colab");
    }

    #[tokio::test]
    async fn authenticated_turn_stores_both_messages() {
        // File-backed database so a second connection sees the rows
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("chat.db");
        let conn = crate::db::open_database(&db_path).unwrap();

        let ai = manager(MockModelClient::replying("Reposez-vous."));
        let outcome = run_chat_turn(
            &ai,
            Some(PatientSession { conn, patient_id: 7 }),
            turn("bonjour docteur"),
        )
        .await
        .unwrap();

        assert_eq!(outcome.persistence, PersistenceOutcome::Saved);
        let conn = crate::db::open_database(&db_path).unwrap();
        let messages =
            chat_history::get_recent_messages(&conn, &outcome.conversation_id, 7).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[1].sender, Sender::Assistant);
    }

    #[tokio::test]
    async fn symptoms_append_specialist_recommendation() {
        let ai = manager(MockModelClient::replying("Je comprends votre douleur."));
        let outcome = run_chat_turn(&ai, None, turn("j'ai mal à la tête 7/10"))
            .await
            .unwrap();
        assert!(outcome.message.contains("Neurologue"));
        assert!(outcome.message.contains("24-48h"));
    }

    #[tokio::test]
    async fn severe_pain_gets_urgent_tier() {
        let ai = manager(MockModelClient::replying("Je comprends."));
        let outcome = run_chat_turn(&ai, None, turn("douleur à la poitrine 9/10"))
            .await
            .unwrap();
        assert!(outcome.message.contains("Cardiologue"));
        assert!(outcome.message.contains("urgences"));
    }

    #[tokio::test]
    async fn no_symptoms_no_recommendation() {
        let ai = manager(MockModelClient::replying("Bonjour, comment puis-je aider ?"));
        let outcome = run_chat_turn(&ai, None, turn("bonjour")).await.unwrap();
        assert!(!outcome.message.contains("Recommandation médicale"));
    }

    #[tokio::test]
    async fn reply_carries_exactly_one_disclaimer() {
        // Model reply already disclaimed; enhancement + orchestration
        // must not stack a second one
        let ai = manager(MockModelClient::replying(
            "Reposez-vous. Consultez un professionnel de santé au besoin.",
        ));
        let outcome = run_chat_turn(&ai, None, turn("fatigue depuis hier"))
            .await
            .unwrap();
        assert_eq!(outcome.message.matches("professionnel de santé").count(), 1);
    }

    #[tokio::test]
    async fn ai_failure_surfaces_without_fallback() {
        let ai = manager(MockModelClient::failing(MockBehavior::Timeout));
        let err = run_chat_turn(&ai, None, turn("bonjour"))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Timeout { .. }));
    }

    #[tokio::test]
    async fn client_conversation_id_is_reused() {
        let ai = manager(MockModelClient::replying("Suite."));
        let outcome = run_chat_turn(
            &ai,
            None,
            ChatTurn {
                message: "encore mal".into(),
                conversation_id: Some("conv_existing".into()),
                language: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(outcome.conversation_id, "conv_existing");
    }

    #[tokio::test]
    async fn model_conversation_id_takes_over() {
        let mut client = MockModelClient::replying("Suite.");
        client.conversation_id = Some("conv_from_model".into());
        let ai = manager(client);
        let outcome = run_chat_turn(&ai, None, turn("bonjour docteur"))
            .await
            .unwrap();
        assert_eq!(outcome.conversation_id, "conv_from_model");
    }

    #[tokio::test]
    async fn arabic_turn_gets_arabic_recommendation() {
        let ai = manager(MockModelClient::replying("فهمت."));
        let outcome = run_chat_turn(&ai, None, turn("عندي وجع فالراس ديال بزاف والفيفر fièvre"))
            .await
            .unwrap();
        assert_eq!(outcome.language, Language::Ar);
        assert!(outcome.message.contains("نصيحة طبية"));
    }
}
