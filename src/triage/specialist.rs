//! Specialist recommendation: matched body parts + symptom keywords →
//! one medical specialty, with a bilingual recommendation block.

use super::SignalMatch;
use crate::models::enums::{Language, Severity, Specialty};

/// Ordered category rules. The first category whose keyword appears in
/// the concatenated signal text wins; the order is the triage priority,
/// not alphabetical.
const SPECIALTY_RULES: &[(Specialty, &[&str])] = &[
    (
        Specialty::Neurologist,
        &["tête", "migraine", "vertige", "maux de tête", "étourdissement"],
    ),
    (
        Specialty::Cardiologist,
        &["cœur", "poitrine", "thorax", "palpitation", "essoufflement"],
    ),
    (
        Specialty::Gastroenterologist,
        &["estomac", "ventre", "abdomen", "digestif", "nausée", "vomissement"],
    ),
    (
        Specialty::Dermatologist,
        &["peau", "éruption", "démangeaison", "acné", "eczéma"],
    ),
    (
        Specialty::Rheumatologist,
        &["articulaire", "os", "arthrite", "rhumatisme", "articulation"],
    ),
    (Specialty::Urologist, &["urinaire", "rein", "vessie", "prostate"]),
    (
        Specialty::Pulmonologist,
        &["respiratoire", "poumon", "toux", "asthme", "bronche"],
    ),
    (
        Specialty::Gynecologist,
        &["règles", "menstruation", "gynéco", "utérus", "ovaire"],
    ),
    (
        Specialty::Otolaryngologist,
        &["oreille", "nez", "gorge", "orl", "sinusite"],
    ),
    (
        Specialty::Ophthalmologist,
        &["œil", "vision", "vue", "ophtalmologie"],
    ),
    (
        Specialty::Psychiatrist,
        &["stress", "anxiété", "dépression", "mental", "psychologique"],
    ),
    (
        Specialty::Endocrinologist,
        &["diabète", "thyroïde", "hormone", "endocrine"],
    ),
];

/// Pick the specialty for a set of extracted signals. Deterministic:
/// the same inputs always produce the same recommendation.
pub fn recommend_specialist(body_parts: &[SignalMatch], symptoms: &[SignalMatch]) -> Specialty {
    let blob = body_parts
        .iter()
        .chain(symptoms)
        .map(|signal| signal.label)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    for (specialty, keywords) in SPECIALTY_RULES {
        if keywords.iter().any(|keyword| blob.contains(keyword)) {
            return *specialty;
        }
    }
    Specialty::GeneralPractitioner
}

/// Build the recommendation block appended to assistant replies:
/// which specialist to see, why, and how urgently.
pub fn recommendation_text(specialty: Specialty, severity: Severity, language: Language) -> String {
    let mut text = match language {
        Language::Ar => {
            let mut t = format!(
                "\n\n👨‍⚕️ <strong>نصيحة طبية</strong>: نصحك تشوف <strong>{}</strong>",
                specialty.darija_label()
            );
            let reason = specialty.french_reason();
            if !reason.is_empty() {
                t.push(' ');
                t.push_str(reason);
            }
            t.push_str(".\n\n");
            t
        }
        Language::Fr => {
            let mut t = format!(
                "\n\n👨‍⚕️ <strong>Recommandation médicale</strong>: Je vous conseille de consulter un <strong>{}</strong>",
                specialty.french_label()
            );
            let reason = specialty.french_reason();
            if !reason.is_empty() {
                t.push_str(&format!(" <strong>{reason}</strong>"));
            }
            t.push_str(".\n\n");
            t
        }
    };

    text.push_str(urgency_line(severity, language));
    text
}

fn urgency_line(severity: Severity, language: Language) -> &'static str {
    match (severity, language) {
        (Severity::Severe, Language::Ar) => {
            "⚠️ <strong>مهم</strong>: خاصك تشوف <strong>الطبيب بسرعة</strong> أو تمشي <strong>للمستعجلات</strong>!"
        }
        (Severity::Severe, Language::Fr) => {
            "⚠️ <strong>IMPORTANT</strong>: <strong>Consultez rapidement</strong> ou rendez-vous aux <strong>urgences</strong>!"
        }
        (Severity::Moderate, Language::Ar) => {
            "📅 <strong>نصيحة</strong>: شوف الطبيب في أقرب وقت ممكن (<strong>خلال 24-48 ساعة</strong>)."
        }
        (Severity::Moderate, Language::Fr) => {
            "📅 <strong>Conseil</strong>: Prenez rendez-vous dans les prochains jours (<strong>24-48h</strong>)."
        }
        (Severity::Mild, Language::Ar) => {
            "📅 <strong>نصيحة</strong>: شوف الطبيب إذا <strong>استمرت الأعراض</strong> أو <strong>تطورت</strong>."
        }
        (Severity::Mild, Language::Fr) => {
            "📅 <strong>Conseil</strong>: Consultez si les <strong>symptômes persistent</strong> ou <strong>s'aggravent</strong>."
        }
    }
}
