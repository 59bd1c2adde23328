//! Request orchestration: resolve, look up, compose
//!
//! One pass per request. Requests that resolve to no specialty are answered
//! with a clarification before the store or the text-generation service is
//! touched.

use medbot_core::{
    DoctorRecord, MedbotError, QueryIntent, QueryKind, ResolvedQuery, Resolver, Result, SelectQuery,
    ensure_read_only, implies_availability,
};
use serde::Serialize;

use super::client::TextGenerator;
use super::composer::{self, CLARIFICATION, INVALID_QUERY, NO_EXACT_MATCH, Reply};
use super::extract::{ResolverStrategy, extract_entities};
use crate::db::DoctorStore;

/// Answer from the structured query path
#[derive(Debug, Clone, Serialize)]
pub struct StructuredReply {
    pub reply: String,
    /// Parameterized statement that was run, if any
    pub query: Option<String>,
    pub params: Vec<String>,
    pub rows: Vec<DoctorRecord>,
    pub resolved: ResolvedQuery,
}

impl StructuredReply {
    fn without_query(reply: &str, resolved: ResolvedQuery) -> Self {
        Self {
            reply: reply.to_string(),
            query: None,
            params: Vec::new(),
            rows: Vec::new(),
            resolved,
        }
    }
}

/// The assistant: resolver, record store and text generator wired together
pub struct Assistant<S, G> {
    resolver: Resolver,
    store: S,
    generator: G,
    strategy: ResolverStrategy,
    max_alternates: usize,
}

impl<S: DoctorStore, G: TextGenerator> Assistant<S, G> {
    pub fn new(resolver: Resolver, store: S, generator: G) -> Self {
        Self {
            resolver,
            store,
            generator,
            strategy: ResolverStrategy::default(),
            max_alternates: medbot_core::lookup::DEFAULT_MAX_ALTERNATES,
        }
    }

    pub fn with_strategy(mut self, strategy: ResolverStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_alternates(mut self, max_alternates: usize) -> Self {
        self.max_alternates = max_alternates;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve a request with the configured strategy.
    ///
    /// The model strategy falls back to fuzzy matching over the whole text
    /// when the model extracts nothing.
    pub async fn resolve(&self, text: &str) -> ResolvedQuery {
        match self.strategy {
            ResolverStrategy::Fuzzy => self.resolver.resolve(text),
            ResolverStrategy::Llm => {
                let entities = extract_entities(&self.generator, text).await;
                if entities.is_empty() {
                    self.resolver.resolve(text)
                } else {
                    self.resolver.resolve_entities(text, &entities)
                }
            }
        }
    }

    /// Free-text request to a phrased answer grounded in store facts
    pub async fn get_reply(&self, text: &str) -> Result<Reply> {
        let resolved = self.resolve(text).await;
        let Some(specialty) = resolved.specialty.clone() else {
            tracing::info!("No symptom recognized, asking for clarification");
            return Ok(Reply::clarification(resolved));
        };

        let matches = self
            .store
            .find_doctors(&specialty, resolved.hospital.as_deref(), self.max_alternates)
            .await?;
        tracing::info!(
            specialty = %specialty,
            hospital = ?resolved.hospital,
            primary = matches.primary.len(),
            alternates = matches.alternates.len(),
            "Doctor lookup complete"
        );

        Ok(composer::compose(&self.generator, resolved, &matches, self.max_alternates).await)
    }

    /// Free-text request answered through the fixed SQL template
    pub async fn get_structured_reply(&self, text: &str) -> Result<StructuredReply> {
        let resolved = self.resolve(text).await;
        let Some(specialty) = resolved.specialty.clone() else {
            tracing::info!("No symptom recognized, asking for clarification");
            return Ok(StructuredReply::without_query(CLARIFICATION, resolved));
        };

        let intent = QueryIntent::new(specialty)
            .with_hospital(resolved.hospital.clone())
            .with_doctor(resolved.doctor.clone())
            .with_availability(implies_availability(text));
        let query = SelectQuery::from_intent(&intent);

        if let Err(e) = ensure_read_only(query.sql()) {
            tracing::warn!(error = %e, sql = %query.sql(), "Rejected structured query");
            return Ok(StructuredReply::without_query(INVALID_QUERY, resolved));
        }

        let rows = match self.store.select(&query).await {
            Ok(rows) => rows,
            Err(MedbotError::InvalidQuery(e)) => {
                tracing::warn!(error = %e, "Store rejected structured query");
                return Ok(StructuredReply::without_query(INVALID_QUERY, resolved));
            }
            Err(MedbotError::Query(e)) => {
                tracing::warn!(error = %e, sql = %query.sql(), "Structured query failed");
                return Ok(StructuredReply {
                    reply: NO_EXACT_MATCH.to_string(),
                    query: Some(query.sql().to_string()),
                    params: query.params().to_vec(),
                    rows: Vec::new(),
                    resolved,
                });
            }
            Err(e) => return Err(e),
        };

        Ok(StructuredReply {
            reply: composer::format_rows(&rows, QueryKind::detect(text)),
            query: Some(query.sql().to_string()),
            params: query.params().to_vec(),
            rows,
            resolved,
        })
    }
}
