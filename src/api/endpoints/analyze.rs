//! Symptom analysis endpoints.
//!
//! - `POST analyze` — rule-based mapping of discrete symptom ids
//! - `POST analyze-advanced` — AI-backed analysis through the manager
//!
//! Both are mounted on the public and the patient router; only
//! authenticated calls are persisted.

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, PatientContext};
use crate::db::repository::suggestion;
use crate::models::DiagnosisSuggestion;
use crate::triage::diagnosis::{self, DISCLAIMER, EMERGENCY_MESSAGE};
use crate::triage::lexicon::{is_emergency_symptom, normalize_symptom_id};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub additional_info: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis_id: Option<i64>,
    pub symptoms: Vec<String>,
    pub suggestions: Vec<DiagnosisSuggestion>,
    pub has_emergency_symptoms: bool,
    pub disclaimer: &'static str,
    pub emergency_message: Option<&'static str>,
}

/// `POST /analyze` — rule-based suggestions.
pub async fn analyze(
    State(ctx): State<ApiContext>,
    patient: Option<Extension<PatientContext>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    if request.symptoms.is_empty() {
        return Err(ApiError::Validation(
            "Au moins un symptôme est requis".into(),
        ));
    }

    let analysis =
        diagnosis::analyze_symptom_ids(&request.symptoms, &mut rand::thread_rng());

    let analysis_id = match patient {
        Some(Extension(patient)) => {
            let conn = ctx.open_db()?;
            let suggestions_json = serde_json::to_value(&analysis.suggestions)
                .map_err(|e| ApiError::Internal(e.to_string()))?;
            Some(suggestion::insert_analysis(
                &conn,
                patient.patient_id,
                &analysis.symptoms,
                &suggestions_json,
                request.additional_info.as_deref(),
            )?)
        }
        None => None,
    };

    Ok(Json(AnalyzeResponse {
        analysis_id,
        has_emergency_symptoms: analysis.has_emergency_symptoms,
        emergency_message: analysis
            .has_emergency_symptoms
            .then_some(EMERGENCY_MESSAGE),
        symptoms: analysis.symptoms,
        suggestions: analysis.suggestions,
        disclaimer: DISCLAIMER,
    }))
}

const ADVANCED_DISCLAIMER: &str =
    "Analyse basée sur l'IA (phi3:mini). Consultez toujours un professionnel de santé pour un diagnostic précis.";

#[derive(Debug, Serialize)]
pub struct AdvancedAnalyzeResponse {
    pub analysis_id: Option<i64>,
    pub symptoms: Vec<String>,
    pub analysis: String,
    pub service: &'static str,
    pub confidence: &'static str,
    pub has_emergency_symptoms: bool,
    pub disclaimer: &'static str,
    pub emergency_message: Option<&'static str>,
}

/// `POST /analyze-advanced` — AI-backed analysis. No rule-based
/// fallback: an AI failure surfaces as an upstream error.
pub async fn analyze_advanced(
    State(ctx): State<ApiContext>,
    patient: Option<Extension<PatientContext>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AdvancedAnalyzeResponse>, ApiError> {
    if request.symptoms.is_empty() {
        return Err(ApiError::Validation(
            "Au moins un symptôme est requis".into(),
        ));
    }

    let ai_analysis = ctx
        .ai
        .analyze_symptoms_with_ai(&request.symptoms, request.additional_info.as_deref())
        .await?;

    let has_emergency_symptoms = request
        .symptoms
        .iter()
        .any(|symptom| is_emergency_symptom(&normalize_symptom_id(symptom)));

    let analysis_id = match patient {
        Some(Extension(patient)) => {
            let conn = ctx.open_db()?;
            let analysis_json = serde_json::Value::String(ai_analysis.analysis.clone());
            Some(suggestion::insert_analysis(
                &conn,
                patient.patient_id,
                &request.symptoms,
                &analysis_json,
                request.additional_info.as_deref(),
            )?)
        }
        None => None,
    };

    Ok(Json(AdvancedAnalyzeResponse {
        analysis_id,
        symptoms: request.symptoms,
        analysis: ai_analysis.analysis,
        service: ai_analysis.service,
        confidence: ai_analysis.confidence,
        has_emergency_symptoms,
        disclaimer: ADVANCED_DISCLAIMER,
        emergency_message: has_emergency_symptoms.then_some(EMERGENCY_MESSAGE),
    }))
}
