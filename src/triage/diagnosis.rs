//! Diagnosis mapping: discrete symptom identifiers → ranked
//! `DiagnosisSuggestion` list. This is the "basic analysis" path, as
//! opposed to the free-text chat path.

use rand::Rng;

use super::lexicon::{conditions_for, is_emergency_symptom, normalize_symptom_id, resolve_symptom_id};
use crate::models::enums::SuggestionSeverity;
use crate::models::{DiagnosisSuggestion, SymptomAnalysis};

/// Initial probability: min(INITIAL_CAP, INITIAL_BASE + rand * INITIAL_SPREAD).
const INITIAL_BASE: f64 = 30.0;
const INITIAL_SPREAD: f64 = 40.0;
const INITIAL_CAP: f64 = 85.0;
/// Flat bump each time another input symptom points at the same condition.
const REPEAT_INCREMENT: f64 = 15.0;
/// Combined scores are clamped here after repeat increments.
const COMBINED_CAP: f64 = 100.0;
const MAX_SUGGESTIONS: usize = 5;

const CONDITION_DESCRIPTION: &str = "Condition possible basée sur les symptômes rapportés";
const UNKNOWN_DESCRIPTION: &str = "Symptôme rapporté nécessitant une évaluation médicale";

pub const DISCLAIMER: &str =
    "Ceci est une analyse préliminaire. Consultez toujours un professionnel de santé pour un diagnostic précis.";
pub const EMERGENCY_MESSAGE: &str =
    "⚠️ ATTENTION: Certains de vos symptômes nécessitent une attention médicale immédiate. Consultez un médecin ou rendez-vous aux urgences.";

/// Map symptom identifiers (canonical ids, French labels or English
/// names) to a ranked list of candidate conditions.
pub fn analyze_symptom_ids<R: Rng>(symptoms: &[String], rng: &mut R) -> SymptomAnalysis {
    let mut suggestions: Vec<DiagnosisSuggestion> = Vec::new();
    let mut processed = Vec::new();
    let mut has_emergency_symptoms = false;

    for symptom in symptoms {
        let normalized = normalize_symptom_id(symptom);
        if is_emergency_symptom(&normalized) {
            has_emergency_symptoms = true;
        }

        match resolve_symptom_id(symptom) {
            Some(id) => {
                let emergency = is_emergency_symptom(id);
                if emergency {
                    has_emergency_symptoms = true;
                }
                let conditions = conditions_for(id).unwrap_or(&[]);
                for condition in conditions {
                    match suggestions.iter_mut().find(|s| s.condition == *condition) {
                        Some(existing) => {
                            existing.probability =
                                (existing.probability + REPEAT_INCREMENT).min(COMBINED_CAP);
                            existing.matching_symptoms.push(symptom.clone());
                        }
                        None => suggestions.push(DiagnosisSuggestion {
                            condition: condition.to_string(),
                            probability: initial_probability(rng),
                            description: CONDITION_DESCRIPTION.to_string(),
                            matching_symptoms: vec![symptom.clone()],
                            severity: if emergency {
                                SuggestionSeverity::High
                            } else {
                                SuggestionSeverity::Medium
                            },
                        }),
                    }
                }
            }
            None => {
                // No mapping — keep the symptom visible as a generic entry
                suggestions.push(DiagnosisSuggestion {
                    condition: format!("Symptôme: {symptom}"),
                    probability: 50.0,
                    description: UNKNOWN_DESCRIPTION.to_string(),
                    matching_symptoms: vec![symptom.clone()],
                    severity: if is_emergency_symptom(&normalized) {
                        SuggestionSeverity::High
                    } else {
                        SuggestionSeverity::Medium
                    },
                });
            }
        }

        processed.push(symptom.clone());
    }

    // Two or more symptoms together raise the generic viral-syndrome
    // hypothesis.
    let general = (symptoms.len() >= 2).then(|| DiagnosisSuggestion {
        condition: "Syndrome viral".to_string(),
        probability: 60.0,
        description: "Combinaison de symptômes pouvant indiquer une infection virale".to_string(),
        matching_symptoms: processed.clone(),
        severity: SuggestionSeverity::Medium,
    });
    if let Some(general) = general.clone() {
        suggestions.push(general);
    }

    suggestions.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    suggestions.truncate(MAX_SUGGESTIONS);

    // The multi-symptom hypothesis is always part of the reported
    // window, even when randomized specific scores would displace it.
    if let Some(general) = general {
        if !suggestions.iter().any(|s| s.condition == general.condition) {
            if let Some(last) = suggestions.last_mut() {
                *last = general;
            }
        }
    }

    SymptomAnalysis {
        symptoms: processed,
        suggestions,
        has_emergency_symptoms,
    }
}

fn initial_probability<R: Rng>(rng: &mut R) -> f64 {
    (INITIAL_BASE + rng.gen_range(0.0..INITIAL_SPREAD)).min(INITIAL_CAP)
}
