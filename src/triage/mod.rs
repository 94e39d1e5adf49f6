//! Rule-based symptom triage: signal extraction from free-text
//! French/Darija input, diagnosis mapping for discrete symptom ids, and
//! specialist recommendation.

pub mod diagnosis;
pub mod extract;
pub mod lexicon;
pub mod specialist;

use serde::Serialize;

use crate::models::enums::{DurationUnit, Severity};

/// A lexicon hit: the French surface form found in the input plus its
/// canonical tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalMatch {
    pub label: &'static str,
    pub tag: &'static str,
}

/// How long the patient reports having had the symptoms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationEstimate {
    pub value: f32,
    pub unit: DurationUnit,
}

/// Structured signals extracted from one free-text message.
///
/// Ephemeral — built per request and discarded. `severity` is always
/// derivable from the other fields.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedSignals {
    /// Pain level 0–10 when the patient wrote "n/10" or "n sur 10".
    /// `None` means no pain figure was mentioned at all.
    pub pain_level: Option<u8>,
    pub body_parts: Vec<SignalMatch>,
    pub symptoms: Vec<SignalMatch>,
    pub duration: Option<DurationEstimate>,
    pub severity: Severity,
}

impl ExtractedSignals {
    /// Did the message carry any usable medical signal?
    pub fn has_signals(&self) -> bool {
        self.pain_level.is_some() || !self.body_parts.is_empty() || !self.symptoms.is_empty()
    }
}
