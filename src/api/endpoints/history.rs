//! Patient-only endpoints: analysis history and feedback submission.

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, PatientContext};
use crate::db::repository::{feedback, suggestion};
use crate::models::StoredAnalysis;

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<StoredAnalysis>,
}

/// `GET /history` — last 20 analyses with feedback aggregates.
pub async fn history(
    State(ctx): State<ApiContext>,
    Extension(patient): Extension<PatientContext>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let history = suggestion::get_history(&conn, patient.patient_id)?;
    Ok(Json(HistoryResponse { history }))
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub suggestion_id: Option<i64>,
    pub rating: Option<u8>,
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub message: &'static str,
}

/// `POST /feedback` — rate a stored analysis (1–5), atomic upsert.
pub async fn submit_feedback(
    State(ctx): State<ApiContext>,
    Extension(patient): Extension<PatientContext>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let (suggestion_id, rating) = match (request.suggestion_id, request.rating) {
        (Some(id), Some(rating)) if (1..=5).contains(&rating) => (id, rating),
        _ => {
            return Err(ApiError::Validation(
                "ID de suggestion et note (1-5) requis".into(),
            ))
        }
    };

    let conn = ctx.open_db()?;
    if !suggestion::analysis_belongs_to_patient(&conn, suggestion_id, patient.patient_id)? {
        return Err(ApiError::NotFound("Suggestion non trouvée".into()));
    }

    feedback::upsert_feedback(
        &conn,
        suggestion_id,
        patient.patient_id,
        rating,
        request.feedback.as_deref(),
    )?;

    Ok(Json(FeedbackResponse {
        message: "Feedback enregistré avec succès",
    }))
}
