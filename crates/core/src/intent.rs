//! Structured intent for the relational query path

use serde::Serialize;

use crate::normalize::normalize;

/// Words that mean the caller wants someone available right now
const AVAILABILITY_WORDS: &[&str] = &["available", "availability", "free", "now", "open"];

const HOSPITAL_WORDS: &[&str] = &["hospital", "hospitals", "beds"];
const SYMPTOM_WORDS: &[&str] = &["fever", "pain", "headache", "symptom", "symptoms"];

/// Row cap for ordinary queries
pub const DEFAULT_ROW_LIMIT: usize = 3;
/// Row cap when a specific doctor is asked for
pub const DOCTOR_ROW_LIMIT: usize = 10;

/// What a request asks the record store for.
///
/// Always carries a specialty taken from the symptom catalog; the query
/// path never runs without one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryIntent {
    pub specialty: String,
    pub hospital: Option<String>,
    pub doctor: Option<String>,
    pub require_available: bool,
}

impl QueryIntent {
    pub fn new(specialty: impl Into<String>) -> Self {
        Self {
            specialty: specialty.into(),
            hospital: None,
            doctor: None,
            require_available: false,
        }
    }

    pub fn with_hospital(mut self, hospital: Option<String>) -> Self {
        self.hospital = hospital;
        self
    }

    /// Set the doctor filter, dropping any "Dr." title
    pub fn with_doctor(mut self, doctor: Option<String>) -> Self {
        self.doctor = doctor
            .map(|d| strip_title(&d))
            .filter(|d| !d.is_empty());
        self
    }

    pub fn with_availability(mut self, required: bool) -> Self {
        self.require_available = required;
        self
    }

    /// Maximum rows the query may return
    pub fn limit(&self) -> usize {
        if self.doctor.is_some() {
            DOCTOR_ROW_LIMIT
        } else {
            DEFAULT_ROW_LIMIT
        }
    }
}

fn strip_title(name: &str) -> String {
    let trimmed = name.trim();
    let lowered = trimmed.to_lowercase();
    let rest = if lowered.starts_with("dr.") {
        &trimmed[3..]
    } else if lowered.starts_with("dr ") {
        &trimmed[2..]
    } else {
        trimmed
    };
    rest.trim().to_string()
}

fn has_any_word(text: &str, words: &[&str]) -> bool {
    normalize(text)
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| words.contains(&w))
}

/// Whether the request implies real-time availability
pub fn implies_availability(text: &str) -> bool {
    has_any_word(text, AVAILABILITY_WORDS)
}

/// Phrasing style for formatted rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Hospital,
    Symptom,
    Doctor,
}

impl QueryKind {
    /// Guess the style from keywords in the request
    pub fn detect(text: &str) -> Self {
        if has_any_word(text, HOSPITAL_WORDS) {
            QueryKind::Hospital
        } else if has_any_word(text, SYMPTOM_WORDS) {
            QueryKind::Symptom
        } else {
            QueryKind::Doctor
        }
    }
}
