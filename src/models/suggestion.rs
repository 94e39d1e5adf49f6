use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::SuggestionSeverity;

/// A candidate condition produced by the rule-based mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisSuggestion {
    pub condition: String,
    /// Heuristic confidence, 0–100. Combined scores from repeated
    /// symptom matches are clamped to 100.
    pub probability: f64,
    pub description: String,
    pub matching_symptoms: Vec<String>,
    pub severity: SuggestionSeverity,
}

/// Full result of one rule-based analysis request.
#[derive(Debug, Clone, Serialize)]
pub struct SymptomAnalysis {
    pub symptoms: Vec<String>,
    pub suggestions: Vec<DiagnosisSuggestion>,
    pub has_emergency_symptoms: bool,
}

/// A persisted analysis row read back for the history endpoint, with
/// feedback aggregates joined in.
#[derive(Debug, Clone, Serialize)]
pub struct StoredAnalysis {
    pub id: i64,
    pub symptoms: Vec<String>,
    pub suggestions: serde_json::Value,
    pub additional_info: Option<String>,
    pub created_at: NaiveDateTime,
    pub average_rating: Option<f64>,
    pub feedback_count: i64,
}

/// Entry of the static common-symptoms catalog served by GET /symptoms.
#[derive(Debug, Clone, Serialize)]
pub struct SymptomCatalogEntry {
    pub id: &'static str,
    /// French display label.
    pub label: &'static str,
    pub english: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub darija: Option<&'static str>,
}
