//! `GET /symptoms` — static catalog of common symptoms with French,
//! English and Darija labels.

use axum::Json;
use serde::Serialize;

use crate::models::SymptomCatalogEntry;
use crate::triage::lexicon::COMMON_SYMPTOMS;

#[derive(Debug, Serialize)]
pub struct SymptomsResponse {
    pub symptoms: &'static [SymptomCatalogEntry],
}

pub async fn list() -> Json<SymptomsResponse> {
    Json(SymptomsResponse {
        symptoms: COMMON_SYMPTOMS,
    })
}
