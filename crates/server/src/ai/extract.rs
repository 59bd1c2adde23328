//! Model-based entity extraction, the alternate resolver strategy

use std::str::FromStr;

use medbot_core::ExtractedEntities;

use super::client::{Message, TextGenerator};

const INSTRUCTION: &str = r#"You are a medical chatbot. Extract structured entities from the user query.

Return ONLY JSON with keys: problem, doctor, hospital, location.

Rules:
- Return valid JSON only.
- If you don't know a value, use null.
- Do not explain or add alternatives in the JSON.
- Do not invent doctor names."#;

const EXAMPLES: &[(&str, &str)] = &[
    (
        "I have memory loss issues, can I get a doctor at Coimbatore Medical Center?",
        r#"{"problem": "memory loss", "doctor": null, "hospital": "Coimbatore Medical Center", "location": null}"#,
    ),
    (
        "I have a skin rash, is there a Dermatology doctor at PSG Hospitals?",
        r#"{"problem": "skin rash", "doctor": null, "hospital": "PSG Hospitals", "location": null}"#,
    ),
    (
        "Is Dr. Arjun available at Ganga Hospital for Orthopedics?",
        r#"{"problem": "orthopedics", "doctor": "Dr. Arjun", "hospital": "Ganga Hospital", "location": null}"#,
    ),
    (
        "I have cancer what hospital or doctor should I visit?",
        r#"{"problem": "cancer", "doctor": null, "hospital": null, "location": null}"#,
    ),
];

/// How free text becomes a resolved query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolverStrategy {
    /// Fuzzy matching over the whole request
    #[default]
    Fuzzy,
    /// Model extraction followed by fuzzy matching of each field
    Llm,
}

impl FromStr for ResolverStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fuzzy" => Ok(ResolverStrategy::Fuzzy),
            "llm" => Ok(ResolverStrategy::Llm),
            other => Err(format!("expected 'fuzzy' or 'llm', got '{other}'")),
        }
    }
}

/// Conversation asking the model for the entity JSON
fn extraction_messages(user_query: &str) -> Vec<Message> {
    let mut messages = vec![Message::system(INSTRUCTION)];
    for (question, answer) in EXAMPLES {
        messages.push(Message::user(*question));
        messages.push(Message {
            role: "assistant".to_string(),
            content: answer.to_string(),
        });
    }
    messages.push(Message::user(user_query));
    messages
}

/// Ask the model for entities; any failure means nothing was extracted
pub async fn extract_entities<G: TextGenerator>(generator: &G, user_query: &str) -> ExtractedEntities {
    match generator.complete(extraction_messages(user_query), 0.0).await {
        Ok(output) => {
            let entities = ExtractedEntities::from_model_output(&output);
            tracing::debug!(entities = ?entities, "Extracted entities");
            entities
        }
        Err(e) => {
            tracing::warn!(error = %e, "Entity extraction failed");
            ExtractedEntities::default()
        }
    }
}
