//! Entity resolution: free text to symptom, specialty and hospital

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::catalog::{HospitalRegistry, SymptomCatalog};
use crate::matcher::{Scorer, WeightedRatio, best_match};
use crate::normalize::{institution_phrase, is_institution_word, normalize};

/// Minimum similarity score accepted as a match
pub const DEFAULT_CUTOFF: u8 = 70;

/// Single-word hospital phrases up to this many characters ("kg", "hope")
/// only match free text when an institution word follows them.
const SHORT_PHRASE_CHARS: usize = 4;

/// Per-request outcome of entity resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedQuery {
    pub raw_text: String,
    pub symptom: Option<String>,
    /// Always a value of the symptom catalog when set
    pub specialty: Option<String>,
    /// Canonical hospital name from the registry
    pub hospital: Option<String>,
    pub doctor: Option<String>,
    pub location: Option<String>,
}

impl ResolvedQuery {
    /// Whether the request can be answered from the record store
    pub fn is_resolved(&self) -> bool {
        self.specialty.is_some()
    }
}

/// Fields a text-generation model extracts from a request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedEntities {
    pub problem: Option<String>,
    pub doctor: Option<String>,
    pub hospital: Option<String>,
    pub location: Option<String>,
}

impl ExtractedEntities {
    /// Parse the first syntactically valid JSON object found in `text`.
    ///
    /// Anything unparseable yields the empty value, which resolves to
    /// nothing.
    pub fn from_model_output(text: &str) -> Self {
        for (start, _) in text.match_indices('{') {
            let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<JsonValue>();
            if let Some(Ok(JsonValue::Object(map))) = stream.next() {
                let field = |name: &str| {
                    map.get(name)
                        .and_then(|v| v.as_str())
                        .map(str::trim)
                        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("null"))
                        .map(str::to_string)
                };
                return Self {
                    problem: field("problem"),
                    doctor: field("doctor"),
                    hospital: field("hospital"),
                    location: field("location"),
                };
            }
        }
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.problem.is_none() && self.doctor.is_none() && self.hospital.is_none() && self.location.is_none()
    }
}

/// Maps free text onto the closed symptom and hospital sets
pub struct Resolver {
    symptoms: SymptomCatalog,
    hospitals: HospitalRegistry,
    scorer: Box<dyn Scorer>,
    cutoff: u8,
}

impl Resolver {
    pub fn new(symptoms: SymptomCatalog, hospitals: HospitalRegistry) -> Self {
        Self {
            symptoms,
            hospitals,
            scorer: Box::new(WeightedRatio),
            cutoff: DEFAULT_CUTOFF,
        }
    }

    /// Replace the similarity scorer
    pub fn with_scorer(mut self, scorer: impl Scorer + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    pub fn with_cutoff(mut self, cutoff: u8) -> Self {
        self.cutoff = cutoff.min(100);
        self
    }

    /// Resolve symptom and hospital independently from one free-text request
    pub fn resolve(&self, raw_text: &str) -> ResolvedQuery {
        let (symptom, specialty) = self.match_symptom(&normalize(raw_text));
        let hospital = self.match_hospital_in_text(raw_text);

        ResolvedQuery {
            raw_text: raw_text.to_string(),
            symptom,
            specialty,
            hospital,
            doctor: None,
            location: None,
        }
    }

    /// Resolve fields already extracted by a model
    pub fn resolve_entities(&self, raw_text: &str, entities: &ExtractedEntities) -> ResolvedQuery {
        let (symptom, specialty) = match entities.problem.as_deref() {
            Some(problem) => self.match_symptom(&normalize(problem)),
            None => (None, None),
        };
        let hospital = entities
            .hospital
            .as_deref()
            .and_then(|h| self.match_hospital(&institution_phrase(h)));

        ResolvedQuery {
            raw_text: raw_text.to_string(),
            symptom,
            specialty,
            hospital,
            doctor: entities.doctor.clone(),
            location: entities.location.clone(),
        }
    }

    fn match_symptom(&self, text: &str) -> (Option<String>, Option<String>) {
        best_match(self.scorer.as_ref(), text, self.symptoms.keys(), self.cutoff)
            .and_then(|(index, _)| self.symptoms.entry(index))
            .map(|(key, specialty)| (Some(key.to_string()), Some(specialty.to_string())))
            .unwrap_or((None, None))
    }

    /// `text` must already have the institution words stripped
    fn match_hospital(&self, text: &str) -> Option<String> {
        self.best_hospital(text, self.hospitals.phrases())
    }

    /// Like `match_hospital`, but short names must be written as a hospital
    /// ("KG Hospital", "Hope Medical Center") so that "70 kg" or "I hope"
    /// don't count.
    fn match_hospital_in_text(&self, raw_text: &str) -> Option<String> {
        let text = normalize(raw_text);
        let candidates = self.hospitals.phrases().map(|phrase| {
            if is_short_phrase(phrase) && !followed_by_institution_word(&text, phrase) {
                ""
            } else {
                phrase
            }
        });
        self.best_hospital(&institution_phrase(raw_text), candidates)
    }

    fn best_hospital<'a>(&self, text: &str, phrases: impl Iterator<Item = &'a str>) -> Option<String> {
        best_match(self.scorer.as_ref(), text, phrases, self.cutoff)
            .and_then(|(index, _)| self.hospitals.name(index))
            .map(str::to_string)
    }
}

fn is_short_phrase(phrase: &str) -> bool {
    !phrase.contains(' ') && phrase.chars().count() <= SHORT_PHRASE_CHARS
}

/// Whether `word` occurs in normalized `text` directly before an institution word
fn followed_by_institution_word(text: &str, word: &str) -> bool {
    let words: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    words
        .windows(2)
        .any(|pair| pair[0] == word && is_institution_word(pair[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> Resolver {
        Resolver::new(SymptomCatalog::builtin(), HospitalRegistry::builtin())
    }

    #[test]
    fn verbatim_keywords_resolve_to_their_specialty() {
        let resolver = resolver();
        let catalog = SymptomCatalog::builtin();
        for key in catalog.keys() {
            let resolved = resolver.resolve(&format!("I think I have {key}"));
            assert_eq!(
                resolved.specialty.as_deref(),
                catalog.specialty_for(key),
                "keyword {key}"
            );
        }
    }

    #[test]
    fn unrelated_text_leaves_everything_unset() {
        let resolved = resolver().resolve("what time is it");
        assert_eq!(resolved.symptom, None);
        assert_eq!(resolved.specialty, None);
        assert!(!resolved.is_resolved());
    }

    #[test]
    fn hospital_resolves_to_canonical_name() {
        let resolved = resolver().resolve("I have chest pain at Ganga Hospital");
        assert_eq!(resolved.symptom.as_deref(), Some("chest pain"));
        assert_eq!(resolved.specialty.as_deref(), Some("Cardiology"));
        assert_eq!(resolved.hospital.as_deref(), Some("Ganga Hospital"));
    }

    #[test]
    fn fields_resolve_independently() {
        let resolved = resolver().resolve("is Ganga Hospital open");
        assert_eq!(resolved.specialty, None);
        assert_eq!(resolved.hospital.as_deref(), Some("Ganga Hospital"));

        let resolved = resolver().resolve("I have chest pain at Unknown Hospital");
        assert_eq!(resolved.specialty.as_deref(), Some("Cardiology"));
        assert_eq!(resolved.hospital, None);
    }

    #[test]
    fn multi_word_hospitals_resolve_in_free_text() {
        let resolved = resolver().resolve("any fracture doctor at Kovai Medical College Hospital?");
        assert_eq!(resolved.hospital.as_deref(), Some("Kovai Medical College Hospital"));

        let resolved = resolver().resolve("skin rash, PSG Hospitals please");
        assert_eq!(resolved.hospital.as_deref(), Some("PSG Hospitals"));
    }

    #[test]
    fn short_names_need_an_institution_word() {
        let resolver = resolver();

        let resolved = resolver.resolve("I hope a doctor can help with my fever");
        assert_eq!(resolved.specialty.as_deref(), Some("General Medicine"));
        assert_eq!(resolved.hospital, None);

        let resolved = resolver.resolve("I weigh 70 kg and have chest pain");
        assert_eq!(resolved.specialty.as_deref(), Some("Cardiology"));
        assert_eq!(resolved.hospital, None);

        let resolved = resolver.resolve("chest pain, is KG Hospital close?");
        assert_eq!(resolved.hospital.as_deref(), Some("KG Hospital"));

        let resolved = resolver.resolve("fever again, Hope Medical Center please");
        assert_eq!(resolved.hospital.as_deref(), Some("Hope Medical Center"));
    }

    #[test]
    fn extracted_short_names_still_resolve() {
        let entities = ExtractedEntities {
            problem: Some("fever".to_string()),
            hospital: Some("KG".to_string()),
            ..Default::default()
        };
        let resolved = resolver().resolve_entities("raw", &entities);
        assert_eq!(resolved.hospital.as_deref(), Some("KG Hospital"));
    }

    #[test]
    fn injected_scorer_decides_matches() {
        struct Never;
        impl Scorer for Never {
            fn score(&self, _query: &str, _candidate: &str) -> u8 {
                0
            }
        }

        let resolved = resolver().with_scorer(Never).resolve("chest pain");
        assert_eq!(resolved.specialty, None);
    }

    #[test]
    fn model_output_parses_first_valid_object() {
        let output = r#"Sure! {not json} Here you go:
{"problem": "memory loss", "doctor": null, "hospital": "Coimbatore Medical Center", "location": "null"}
{"problem": "fever"}"#;
        let entities = ExtractedEntities::from_model_output(output);
        assert_eq!(entities.problem.as_deref(), Some("memory loss"));
        assert_eq!(entities.hospital.as_deref(), Some("Coimbatore Medical Center"));
        assert_eq!(entities.doctor, None);
        assert_eq!(entities.location, None);
    }

    #[test]
    fn missing_json_extracts_nothing() {
        assert!(ExtractedEntities::from_model_output("I cannot help with that").is_empty());
        assert!(ExtractedEntities::from_model_output("{\"problem\": ").is_empty());
    }

    #[test]
    fn extracted_entities_are_fuzzy_resolved() {
        let entities = ExtractedEntities {
            problem: Some("skin rashes".to_string()),
            hospital: Some("psg hospital".to_string()),
            doctor: Some("Dr. Arjun".to_string()),
            location: None,
        };
        let resolved = resolver().resolve_entities("raw", &entities);
        assert_eq!(resolved.specialty.as_deref(), Some("Dermatology"));
        assert_eq!(resolved.hospital.as_deref(), Some("PSG Hospitals"));
        assert_eq!(resolved.doctor.as_deref(), Some("Dr. Arjun"));
    }
}
