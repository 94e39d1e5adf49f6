//! Static French-language lexicons and mapping tables for the triage
//! engine. Table order is meaningful: extraction reports matches in
//! table order, and the specialist rules are checked first to last.

use crate::models::SymptomCatalogEntry;

/// French body-part surface form → canonical tag.
pub const BODY_PARTS: &[(&str, &str)] = &[
    ("tête", "head"),
    ("crâne", "head"),
    ("front", "head"),
    ("gorge", "throat"),
    ("cou", "neck"),
    ("poitrine", "chest"),
    ("seins", "breasts"),
    ("thorax", "chest"),
    ("ventre", "abdomen"),
    ("estomac", "stomach"),
    ("utérus", "uterus"),
    ("dos", "back"),
    ("colonne", "spine"),
    ("bras", "arms"),
    ("mains", "hands"),
    ("jambes", "legs"),
    ("pieds", "feet"),
    ("genoux", "knees"),
];

/// French symptom keyword → canonical tag.
pub const SYMPTOM_KEYWORDS: &[(&str, &str)] = &[
    ("douleur", "pain"),
    ("mal", "pain"),
    ("souffrance", "pain"),
    ("fièvre", "fever"),
    ("température", "fever"),
    ("chaud", "fever"),
    ("toux", "cough"),
    ("crachat", "cough"),
    ("nausée", "nausea"),
    ("vomissement", "vomiting"),
    ("fatigue", "fatigue"),
    ("épuisement", "fatigue"),
    ("vertige", "dizziness"),
    ("étourdissement", "dizziness"),
];

/// Canonical symptom id → candidate condition names (French).
pub const DIAGNOSIS_MAP: &[(&str, &[&str])] = &[
    ("fever", &["Infection virale", "Grippe", "Infection bactérienne"]),
    ("cough", &["Rhume", "Bronchite", "Pneumonie", "Allergie"]),
    ("headache", &["Tension", "Migraine", "Sinusite", "Déshydratation"]),
    ("sore_throat", &["Pharyngite", "Amygdalite", "Infection virale"]),
    ("nausea", &["Gastro-entérite", "Intoxication alimentaire", "Stress"]),
    ("fatigue", &["Surmenage", "Anémie", "Dépression", "Infection"]),
    (
        "chest_pain",
        &["Angine de poitrine", "Infarctus", "Anxiété", "Reflux gastrique"],
    ),
    (
        "shortness_of_breath",
        &["Asthme", "Insuffisance cardiaque", "Pneumonie", "Anxiété"],
    ),
    (
        "abdominal_pain",
        &["Gastrite", "Appendicite", "Calculs biliaires", "Ulcère"],
    ),
    (
        "dizziness",
        &["Hypotension", "Déshydratation", "Problème d'oreille interne"],
    ),
    ("back_pain", &["Tension musculaire", "Hernie discale", "Arthrose"]),
    ("joint_pain", &["Arthrite", "Arthrose", "Tendinite"]),
    ("skin_rash", &["Eczéma", "Allergie", "Infection cutanée"]),
    ("difficulty_sleeping", &["Insomnie", "Stress", "Apnée du sommeil"]),
    ("loss_of_appetite", &["Dépression", "Infection", "Problème digestif"]),
    ("weight_loss", &["Hyperthyroïdie", "Diabète", "Cancer", "Dépression"]),
    ("muscle_pain", &["Fibromyalgie", "Tension", "Infection virale"]),
    ("swelling", &["Rétention d'eau", "Insuffisance cardiaque", "Allergie"]),
    ("numbness", &["Neuropathie", "Compression nerveuse", "Diabète"]),
    ("vision_problems", &["Fatigue oculaire", "Glaucome", "Cataracte"]),
];

/// Symptom ids that require immediate medical attention. Any of these in
/// an analysis request flags the response and raises the triggered
/// suggestions to high severity.
pub const EMERGENCY_SYMPTOMS: &[&str] = &[
    "chest_pain",
    "shortness_of_breath",
    "severe_abdominal_pain",
    "loss_of_consciousness",
    "severe_bleeding",
    "difficulty_breathing",
    "severe_headache",
    "high_fever",
    "seizure",
    "stroke_symptoms",
];

/// Catalog served by GET /symptoms. Darija labels exist for the ten
/// most common entries only.
pub const COMMON_SYMPTOMS: &[SymptomCatalogEntry] = &[
    SymptomCatalogEntry { id: "fever", label: "Fièvre", english: "fever", darija: Some("سخانة") },
    SymptomCatalogEntry { id: "cough", label: "Toux", english: "cough", darija: Some("كحة") },
    SymptomCatalogEntry { id: "headache", label: "Mal de tête", english: "headache", darija: Some("صداع") },
    SymptomCatalogEntry { id: "sore_throat", label: "Mal de gorge", english: "sore_throat", darija: Some("وجع الحلق") },
    SymptomCatalogEntry { id: "nausea", label: "Nausée", english: "nausea", darija: Some("غثيان") },
    SymptomCatalogEntry { id: "fatigue", label: "Fatigue", english: "fatigue", darija: Some("تعب") },
    SymptomCatalogEntry { id: "chest_pain", label: "Douleur thoracique", english: "chest_pain", darija: Some("وجع الصدر") },
    SymptomCatalogEntry { id: "shortness_of_breath", label: "Essoufflement", english: "shortness_of_breath", darija: Some("ضيق التنفس") },
    SymptomCatalogEntry { id: "abdominal_pain", label: "Douleur abdominale", english: "abdominal_pain", darija: Some("وجع البطن") },
    SymptomCatalogEntry { id: "dizziness", label: "Vertiges", english: "dizziness", darija: Some("دوخة") },
    SymptomCatalogEntry { id: "back_pain", label: "Mal de dos", english: "back_pain", darija: None },
    SymptomCatalogEntry { id: "joint_pain", label: "Douleur articulaire", english: "joint_pain", darija: None },
    SymptomCatalogEntry { id: "skin_rash", label: "Éruption cutanée", english: "skin_rash", darija: None },
    SymptomCatalogEntry { id: "difficulty_sleeping", label: "Difficulté à dormir", english: "difficulty_sleeping", darija: None },
    SymptomCatalogEntry { id: "loss_of_appetite", label: "Perte d'appétit", english: "loss_of_appetite", darija: None },
    SymptomCatalogEntry { id: "weight_loss", label: "Perte de poids", english: "weight_loss", darija: None },
    SymptomCatalogEntry { id: "muscle_pain", label: "Douleur musculaire", english: "muscle_pain", darija: None },
    SymptomCatalogEntry { id: "swelling", label: "Gonflement", english: "swelling", darija: None },
    SymptomCatalogEntry { id: "numbness", label: "Engourdissement", english: "numbness", darija: None },
    SymptomCatalogEntry { id: "vision_problems", label: "Problèmes de vision", english: "vision_problems", darija: None },
];

/// Look up condition candidates for a canonical symptom id.
pub fn conditions_for(symptom_id: &str) -> Option<&'static [&'static str]> {
    DIAGNOSIS_MAP
        .iter()
        .find(|(id, _)| *id == symptom_id)
        .map(|(_, conditions)| *conditions)
}

pub fn is_emergency_symptom(symptom_id: &str) -> bool {
    EMERGENCY_SYMPTOMS.contains(&symptom_id)
}

/// Resolve user input (canonical id, French label, or English name) to a
/// canonical symptom id known to the diagnosis map.
pub fn resolve_symptom_id(input: &str) -> Option<&'static str> {
    let normalized = normalize_symptom_id(input);

    if let Some(&(id, _)) = DIAGNOSIS_MAP.iter().find(|(id, _)| *id == normalized) {
        return Some(id);
    }

    COMMON_SYMPTOMS
        .iter()
        .find(|entry| {
            entry.label.to_lowercase() == input.trim().to_lowercase()
                || entry.english == normalized
                || entry.id == normalized
        })
        .map(|entry| entry.id)
}

/// Lowercase and replace whitespace runs with a single underscore.
pub fn normalize_symptom_id(input: &str) -> String {
    input
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}
