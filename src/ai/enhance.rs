//! Post-processing of model output: disclaimer guarantees, harmful
//! phrase removal, and bold markup of key medical terms.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::enums::Language;

pub const DISCLAIMER_FR: &str = "\n\n⚠️ <strong>Rappel</strong>: Cette conversation est à titre informatif uniquement. <strong>Consultez un professionnel de santé</strong> pour tout problème médical.";
pub const DISCLAIMER_AR: &str = "\n\n⚠️ <strong>تذكير</strong>: هاد المحادثة غير للمعلومات فقط. <strong>شوف طبيب مختص</strong> لأي مشكل صحي.";

const SAFETY_PLACEHOLDER: &str = "[Consultez un professionnel de santé]";

static DISCLAIMER_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)professionnel de santé",
        r"(?i)consultez.*médecin",
        r"طبيب مختص",
        r"شوف.*طبيب",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid disclaimer pattern"))
    .collect()
});

/// Phrases the model must never relay. Matches are replaced, not
/// removed, so the reader still gets a safe instruction.
static HARMFUL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)ne consultez pas de médecin",
        r"(?i)évitez les médecins",
        r"(?i)les médecins sont inutiles",
        r"(?i)auto-médication recommandée",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid safety pattern"))
    .collect()
});

/// Markdown bold → HTML bold.
static MARKDOWN_BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold pattern"));

/// Existing `<strong>` spans pass through untouched (first alternation
/// branch); bare medical terms get wrapped (second branch). The regex
/// crate has no lookbehind, so double-wrapping is avoided by consuming
/// already-bold spans atomically.
static MEDICAL_TERM_RE: LazyLock<Regex> = LazyLock::new(|| {
    let terms = [
        "urgent", "urgence", "important", "consultation", "médecin", "docteur",
        "symptômes", "douleur", "traitement", "médicament", "diagnostic",
        "neurologue", "cardiologue", "gastro-entérologue", "dermatologue",
        "gynécologue", "urologue", "pneumologue", "rhumatologue",
        "endocrinologue", "psychiatre", "psychologue", "orl", "ophtalmologue",
        "24h", "48h", "72h", "heures", "jours", "semaines", "rappel", "recommandation",
    ]
    .join("|");
    Regex::new(&format!(r"(?i)(<strong>.*?</strong>)|\b({terms})\b"))
        .expect("valid medical term pattern")
});

/// De-dup patterns for the fixed disclaimer boilerplate, matching both
/// the plain and `<strong>`-wrapped renderings.
static DISCLAIMER_DEDUP_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"⚠️\s*(?:<strong>)?Rappel(?:</strong>)?\s*:.*?médical\.",
        r"⚠️\s*(?:<strong>)?تذكير(?:</strong>)?\s*:.*?صحي\.",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid dedup pattern"))
    .collect()
});

/// Does the text already carry a medical disclaimer?
pub fn has_disclaimer(text: &str) -> bool {
    DISCLAIMER_MARKERS.iter().any(|re| re.is_match(text))
}

/// Append the fixed disclaimer when none is present. Idempotent: a text
/// that already contains one comes back unchanged.
pub fn ensure_disclaimer(text: &str, language: Language) -> String {
    if has_disclaimer(text) {
        return text.to_string();
    }
    let disclaimer = match language {
        Language::Ar => DISCLAIMER_AR,
        Language::Fr => DISCLAIMER_FR,
    };
    format!("{text}{disclaimer}")
}

/// Replace harmful-advice phrases with a safety placeholder.
pub fn apply_safety_filters(text: &str) -> String {
    let mut filtered = text.to_string();
    for pattern in HARMFUL_PATTERNS.iter() {
        filtered = pattern.replace_all(&filtered, SAFETY_PLACEHOLDER).into_owned();
    }
    filtered
}

/// Bold key medical terms, converting markdown bold to HTML first and
/// never double-wrapping a term that is already inside `<strong>`.
pub fn bold_medical_terms(text: &str) -> String {
    let html = MARKDOWN_BOLD_RE.replace_all(text, "<strong>$1</strong>");

    MEDICAL_TERM_RE
        .replace_all(&html, |caps: &regex::Captures<'_>| {
            if let Some(existing) = caps.get(1) {
                existing.as_str().to_string()
            } else {
                format!("<strong>{}</strong>", &caps[2])
            }
        })
        .into_owned()
}

/// Strip all but the last occurrence of the fixed disclaimer
/// boilerplate.
pub fn dedup_disclaimers(text: &str) -> String {
    let mut result = text.to_string();
    for pattern in DISCLAIMER_DEDUP_RES.iter() {
        let ranges: Vec<(usize, usize)> = pattern
            .find_iter(&result)
            .map(|m| (m.start(), m.end()))
            .collect();
        if ranges.len() > 1 {
            // Remove from the back so earlier offsets stay valid,
            // keeping only the final occurrence.
            for &(start, end) in ranges[..ranges.len() - 1].iter().rev() {
                result.replace_range(start..end, "");
            }
        }
    }
    result
}

/// Full enhancement pass applied after a successful model call.
pub fn enhance(text: &str, language: Language) -> String {
    let with_disclaimer = ensure_disclaimer(text, language);
    let filtered = apply_safety_filters(&with_disclaimer);
    bold_medical_terms(&filtered)
}
