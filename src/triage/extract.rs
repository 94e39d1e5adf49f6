//! Signal extraction: free text → `ExtractedSignals`.
//!
//! All matching is case-folded substring or regex work over the raw
//! message; matches are reported in lexicon table order.

use std::sync::LazyLock;

use regex::Regex;

use super::lexicon::{BODY_PARTS, SYMPTOM_KEYWORDS};
use super::{DurationEstimate, ExtractedSignals, SignalMatch};
use crate::models::enums::{DurationUnit, Severity};

static PAIN_LEVEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(?:/\s*10|sur\s*10)").expect("valid pain regex"));

/// One entry of the ordered duration-pattern table. A `fixed` value
/// overrides the captured number ("depuis hier" carries no digits).
struct DurationPattern {
    regex: Regex,
    unit: DurationUnit,
    fixed: Option<f32>,
}

static DURATION_PATTERNS: LazyLock<Vec<DurationPattern>> = LazyLock::new(|| {
    let pattern = |re: &str, unit, fixed| DurationPattern {
        regex: Regex::new(re).expect("valid duration regex"),
        unit,
        fixed,
    };
    vec![
        pattern(r"(?i)depuis (\d+) jours?", DurationUnit::Days, None),
        pattern(r"(?i)depuis (\d+) semaines?", DurationUnit::Weeks, None),
        pattern(r"(?i)depuis (\d+) mois", DurationUnit::Months, None),
        pattern(r"(?i)depuis hier", DurationUnit::Days, Some(1.0)),
        pattern(r"(?i)depuis ce matin", DurationUnit::Days, Some(0.5)),
    ]
});

/// Extract a self-reported pain level ("7/10", "7 sur 10").
/// Absence is distinct from zero: `None` means no figure was mentioned.
pub fn extract_pain_level(message: &str) -> Option<u8> {
    PAIN_LEVEL_RE
        .captures(message)
        .and_then(|caps| caps[1].parse().ok())
}

pub fn extract_body_parts(message: &str) -> Vec<SignalMatch> {
    scan_lexicon(message, BODY_PARTS)
}

pub fn extract_symptoms(message: &str) -> Vec<SignalMatch> {
    scan_lexicon(message, SYMPTOM_KEYWORDS)
}

fn scan_lexicon(message: &str, table: &[(&'static str, &'static str)]) -> Vec<SignalMatch> {
    let lower = message.to_lowercase();
    table
        .iter()
        .filter(|(french, _)| lower.contains(french))
        .map(|&(french, tag)| SignalMatch { label: french, tag })
        .collect()
}

/// Try the ordered duration patterns; first match wins.
pub fn extract_duration(message: &str) -> Option<DurationEstimate> {
    for pattern in DURATION_PATTERNS.iter() {
        if let Some(caps) = pattern.regex.captures(message) {
            let value = match pattern.fixed {
                Some(fixed) => fixed,
                None => caps.get(1)?.as_str().parse().ok()?,
            };
            return Some(DurationEstimate {
                value,
                unit: pattern.unit,
            });
        }
    }
    None
}

/// Severity ladder. The thresholds are triage policy, not medical law —
/// keep in sync with the urgency tiers in `specialist`.
pub fn derive_severity(pain_level: Option<u8>, symptoms: &[SignalMatch]) -> Severity {
    if let Some(pain) = pain_level {
        if pain >= 8 {
            return Severity::Severe;
        }
        if pain >= 6 {
            return Severity::Moderate;
        }
        if pain >= 4 {
            return Severity::Mild;
        }
    }
    if symptoms.iter().any(|s| s.tag == "fever" || s.tag == "vomiting") {
        return Severity::Moderate;
    }
    Severity::Mild
}

/// Run the full extraction pipeline over one message.
pub fn analyze_message(message: &str) -> ExtractedSignals {
    let pain_level = extract_pain_level(message);
    let body_parts = extract_body_parts(message);
    let symptoms = extract_symptoms(message);
    let duration = extract_duration(message);
    let severity = derive_severity(pain_level, &symptoms);

    ExtractedSignals {
        pain_level,
        body_parts,
        symptoms,
        duration,
        severity,
    }
}
