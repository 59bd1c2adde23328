//! Reply composition: bounded fact block, phrasing prompt, degraded fallback

use medbot_core::{DoctorMatches, DoctorRecord, QueryKind, ResolvedQuery};
use serde::Serialize;

use super::client::{Message, TextGenerator};

/// Returned when no symptom could be recognized
pub const CLARIFICATION: &str =
    "Sorry, I couldn't identify your health issue. Please rephrase or specify your symptom clearly.";

/// Returned when a structured query produced no rows or failed to run
pub const NO_EXACT_MATCH: &str =
    "I could not find an exact match. Please try with another hospital, doctor, or symptom.";

/// Returned when a statement fails the read-only check
pub const INVALID_QUERY: &str = "Sorry, I could not produce a valid query for that request.";

const PRIMARY_HEADER: &str = "Doctor(s) at requested hospital:";
const NONE_AVAILABLE: &str = "None available.";
const DEGRADED_LEAD: &str = "I couldn't phrase a full answer right now, but here is what I found:";

/// Low temperature: the facts are fixed, the model only adds fluency
const PHRASING_TEMPERATURE: f32 = 0.2;

/// Maximum rows rendered by the structured formatter
const MAX_FORMATTED_ROWS: usize = 3;

/// Final answer for one request
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub reply: String,
    /// Fact block the reply was phrased from, absent for clarifications
    pub facts: Option<String>,
    /// True when the text-generation service failed and `reply` is the bare facts
    pub degraded: bool,
    pub resolved: ResolvedQuery,
}

impl Reply {
    pub fn clarification(resolved: ResolvedQuery) -> Self {
        Self {
            reply: CLARIFICATION.to_string(),
            facts: None,
            degraded: false,
            resolved,
        }
    }
}

fn alternates_header(max_alternates: usize) -> String {
    format!("Alternative hospitals for the same specialty (up to {max_alternates}):")
}

/// Render the best primary doctor and up to `max_alternates` alternates
pub fn fact_block(matches: &DoctorMatches, max_alternates: usize) -> String {
    let primary = matches
        .primary
        .first()
        .map(DoctorRecord::fact_line)
        .unwrap_or_else(|| NONE_AVAILABLE.to_string());

    let alternates: Vec<String> = matches
        .alternates
        .iter()
        .take(max_alternates)
        .map(DoctorRecord::fact_line)
        .collect();
    let alternates = if alternates.is_empty() {
        NONE_AVAILABLE.to_string()
    } else {
        alternates.join("\n")
    };

    format!(
        "{PRIMARY_HEADER}\n{primary}\n\n{}\n{alternates}",
        alternates_header(max_alternates)
    )
}

/// Recover (primary, alternates) from a fact block
pub fn parse_fact_block(block: &str) -> (Vec<DoctorRecord>, Vec<DoctorRecord>) {
    let mut primary = Vec::new();
    let mut alternates = Vec::new();
    let mut in_alternates = false;

    for line in block.lines() {
        if line.starts_with("Alternative hospitals") {
            in_alternates = true;
            continue;
        }
        if let Some(record) = DoctorRecord::from_fact_line(line) {
            if in_alternates {
                alternates.push(record);
            } else {
                primary.push(record);
            }
        }
    }

    (primary, alternates)
}

fn phrasing_prompt(resolved: &ResolvedQuery, facts: &str) -> String {
    format!(
        r#"User request: "{request}"
Symptom: {symptom}
Specialty: {specialty}
Hospital: {hospital}

{facts}

Instructions:
- Clearly recommend the available doctor from the requested hospital first (if any).
- If none is listed there, politely explain so and offer the listed alternative hospitals and doctors.
- Be friendly, clear, and actionable.
- Use only the facts above. Never add, change or invent names, numbers, hospitals or areas."#,
        request = resolved.raw_text.trim(),
        symptom = resolved.symptom.as_deref().unwrap_or("Not specified"),
        specialty = resolved.specialty.as_deref().unwrap_or("Not specified"),
        hospital = resolved.hospital.as_deref().unwrap_or("Not specified"),
    )
}

/// Ask the generator to phrase the facts; fall back to the bare facts on failure
pub async fn compose<G: TextGenerator>(
    generator: &G,
    resolved: ResolvedQuery,
    matches: &DoctorMatches,
    max_alternates: usize,
) -> Reply {
    if !resolved.is_resolved() {
        return Reply::clarification(resolved);
    }

    let facts = fact_block(matches, max_alternates);
    let messages = vec![
        Message::system(
            "You are a helpful medical chatbot. ONLY use the data provided; do NOT invent or embellish details.",
        ),
        Message::user(phrasing_prompt(&resolved, &facts)),
    ];

    match generator.complete(messages, PHRASING_TEMPERATURE).await {
        Ok(text) => Reply {
            reply: text,
            facts: Some(facts),
            degraded: false,
            resolved,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Text generation unavailable, replying with facts only");
            Reply {
                reply: format!("{DEGRADED_LEAD}\n\n{facts}"),
                facts: Some(facts),
                degraded: true,
                resolved,
            }
        }
    }
}

/// Render structured query rows as short sentences
pub fn format_rows(rows: &[DoctorRecord], kind: QueryKind) -> String {
    if rows.is_empty() {
        return NO_EXACT_MATCH.to_string();
    }

    rows.iter()
        .take(MAX_FORMATTED_ROWS)
        .map(|row| {
            let status = if row.availability { "available" } else { "not available" };
            match kind {
                QueryKind::Hospital => format!(
                    "{} ({}) currently has {} beds. {} specializes in {}. Availability: {}.",
                    row.hospital_name,
                    row.area,
                    row.available_beds,
                    row.display_name(),
                    row.specialty,
                    status
                ),
                QueryKind::Symptom => format!(
                    "For your symptom, {} ({}, {} years experience) is at {}. Status: {}.",
                    row.display_name(),
                    row.specialty,
                    row.experience_years,
                    row.hospital_name,
                    status
                ),
                QueryKind::Doctor => format!(
                    "{} ({}, {} years experience) works at {}. Current status: {}.",
                    row.display_name(),
                    row.specialty,
                    row.experience_years,
                    row.hospital_name,
                    status
                ),
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use medbot_core::MedbotError;
    use std::sync::Mutex;

    fn doctor(name: &str, hospital: &str, area: &str) -> DoctorRecord {
        DoctorRecord {
            hospital_name: hospital.to_string(),
            area: area.to_string(),
            doctor_name: name.to_string(),
            specialty: "Cardiology".to_string(),
            experience_years: 14,
            availability: true,
            available_beds: 120,
        }
    }

    fn resolved() -> ResolvedQuery {
        ResolvedQuery {
            raw_text: "I have chest pain at Ganga Hospital".to_string(),
            symptom: Some("chest pain".to_string()),
            specialty: Some("Cardiology".to_string()),
            hospital: Some("Ganga Hospital".to_string()),
            ..Default::default()
        }
    }

    /// Records the prompt and answers with a fixed text
    struct Capture {
        prompts: Mutex<Vec<Vec<Message>>>,
        answer: Result<String, String>,
    }

    impl TextGenerator for Capture {
        async fn complete(&self, messages: Vec<Message>, _temperature: f32) -> Result<String, MedbotError> {
            self.prompts.lock().unwrap().push(messages);
            self.answer.clone().map_err(MedbotError::Generation)
        }
    }

    #[test]
    fn fact_block_round_trips() {
        let matches = DoctorMatches {
            primary: vec![doctor("Dr. Arun Kumar", "Ganga Hospital", "Saibaba Colony")],
            alternates: vec![
                doctor("Dr. Priya Nair", "KG Hospital", "Race Course"),
                doctor("Dr. Ravi Menon", "PSG Hospitals", "Peelamedu"),
            ],
        };
        let block = fact_block(&matches, 2);
        let (primary, alternates) = parse_fact_block(&block);
        assert_eq!(primary, matches.primary);
        assert_eq!(alternates, matches.alternates);
    }

    #[test]
    fn fact_block_is_bounded() {
        let matches = DoctorMatches {
            primary: vec![
                doctor("Dr. A", "Ganga Hospital", "Saibaba Colony"),
                doctor("Dr. B", "Ganga Hospital", "Saibaba Colony"),
            ],
            alternates: vec![
                doctor("Dr. C", "KG Hospital", "Race Course"),
                doctor("Dr. D", "PSG Hospitals", "Peelamedu"),
                doctor("Dr. E", "Gem Hospital", "Ramanathapuram"),
            ],
        };
        let (primary, alternates) = parse_fact_block(&fact_block(&matches, 2));
        assert_eq!(primary.len(), 1);
        assert_eq!(alternates.len(), 2);
    }

    #[test]
    fn empty_matches_say_none_available() {
        let block = fact_block(&DoctorMatches::default(), 2);
        assert_eq!(block.matches(NONE_AVAILABLE).count(), 2);
        assert_eq!(parse_fact_block(&block), (vec![], vec![]));
    }

    #[tokio::test]
    async fn prompt_carries_only_supplied_facts() {
        let generator = Capture {
            prompts: Mutex::new(Vec::new()),
            answer: Ok("Dr. Arun Kumar at Ganga Hospital can see you.".to_string()),
        };
        let matches = DoctorMatches {
            primary: vec![doctor("Dr. Arun Kumar", "Ganga Hospital", "Saibaba Colony")],
            alternates: vec![],
        };

        let reply = compose(&generator, resolved(), &matches, 2).await;

        assert!(!reply.degraded);
        assert_eq!(reply.reply, "Dr. Arun Kumar at Ganga Hospital can see you.");
        let prompts = generator.prompts.lock().unwrap();
        let prompt = &prompts[0][1].content;
        assert!(prompt.contains(&matches.primary[0].fact_line()));
        assert!(prompt.contains("Specialty: Cardiology"));
        assert!(prompt.contains("Never add, change or invent"));
    }

    #[tokio::test]
    async fn generation_failure_degrades_to_facts() {
        let generator = Capture {
            prompts: Mutex::new(Vec::new()),
            answer: Err("timeout".to_string()),
        };
        let matches = DoctorMatches {
            primary: vec![],
            alternates: vec![doctor("Dr. Priya Nair", "KG Hospital", "Race Course")],
        };

        let reply = compose(&generator, resolved(), &matches, 2).await;

        assert!(reply.degraded);
        let facts = reply.facts.clone().unwrap();
        assert!(reply.reply.ends_with(&facts));
        assert!(!reply.reply.contains("timeout"));
        assert_eq!(parse_fact_block(&facts).1, matches.alternates);
    }

    #[tokio::test]
    async fn unresolved_query_skips_generation() {
        let generator = Capture {
            prompts: Mutex::new(Vec::new()),
            answer: Ok("unused".to_string()),
        };
        let reply = compose(&generator, ResolvedQuery::default(), &DoctorMatches::default(), 2).await;
        assert_eq!(reply.reply, CLARIFICATION);
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn rows_are_formatted_by_kind() {
        let mut rows = vec![doctor("Arun Kumar", "Ganga Hospital", "Saibaba Colony")];
        rows[0].availability = false;

        let text = format_rows(&rows, QueryKind::Doctor);
        assert_eq!(
            text,
            "Dr. Arun Kumar (Cardiology, 14 years experience) works at Ganga Hospital. Current status: not available."
        );
        assert!(format_rows(&rows, QueryKind::Hospital).starts_with("Ganga Hospital (Saibaba Colony) currently has 120 beds."));
        assert_eq!(format_rows(&[], QueryKind::Symptom), NO_EXACT_MATCH);
    }
}
