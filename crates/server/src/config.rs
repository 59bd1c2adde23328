//! Server configuration

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use medbot_core::MedbotError;

use crate::ai::ResolverStrategy;

const DEFAULT_LLM_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_LLM_MODEL: &str = "llama-3.1-8b-instant";

/// Text-generation service settings
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub timeout: Duration,
}

/// Where doctor records come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSettings {
    Csv { path: PathBuf },
    Postgres { database_url: String },
}

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub api_key: Option<String>,
    pub cors_origins: Vec<String>,
    pub rate_limit_rps: u32,
    pub llm: LlmSettings,
    pub store: StoreSettings,
    pub symptom_map_path: Option<PathBuf>,
    pub strategy: ResolverStrategy,
    pub match_cutoff: u8,
    pub max_alternates: usize,
    pub max_input_chars: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, MedbotError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_vars<F>(var: F) -> Result<Self, MedbotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| var(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let llm_api_key = var("GROQ_API_KEY").ok_or_else(|| {
            MedbotError::Config("GROQ_API_KEY must be set for the text-generation service".to_string())
        })?;

        let store = match var("STORE_BACKEND").as_deref().unwrap_or("csv") {
            "csv" => StoreSettings::Csv {
                path: var("DATA_PATH")
                    .unwrap_or_else(|| "data/hospital_doctors.csv".into())
                    .into(),
            },
            "postgres" => StoreSettings::Postgres {
                database_url: var("DATABASE_URL")
                    .unwrap_or_else(|| "host=localhost user=postgres dbname=medbot".into()),
            },
            other => {
                return Err(MedbotError::Config(format!(
                    "STORE_BACKEND must be 'csv' or 'postgres', got '{other}'"
                )));
            }
        };

        Ok(Self {
            bind_address: var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8080".into()),
            api_key: var("API_KEY"),
            cors_origins: var("CORS_ORIGINS")
                .map(|v| v.split(',').map(|o| o.trim().to_string()).filter(|o| !o.is_empty()).collect())
                .unwrap_or_else(|| vec!["*".to_string()]),
            rate_limit_rps: parse(&var, "RATE_LIMIT_RPS", 50)?.max(1),
            llm: LlmSettings {
                api_key: llm_api_key,
                api_url: var("LLM_API_URL").unwrap_or_else(|| DEFAULT_LLM_URL.into()),
                model: var("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.into()),
                timeout: Duration::from_secs(parse(&var, "LLM_TIMEOUT_SECS", 20)?),
            },
            store,
            symptom_map_path: var("SYMPTOM_MAP_PATH").map(PathBuf::from),
            strategy: parse(&var, "RESOLVER_STRATEGY", ResolverStrategy::Fuzzy)?,
            match_cutoff: parse::<u8, _>(&var, "MATCH_CUTOFF", 70)?.min(100),
            max_alternates: parse(&var, "MAX_ALTERNATES", 2)?,
            max_input_chars: parse(&var, "MAX_INPUT_CHARS", 200)?,
        })
    }
}

/// Parse an optional variable, falling back to `default` when unset
fn parse<T, F>(var: &F, name: &str, default: T) -> Result<T, MedbotError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => raw
            .parse()
            .map_err(|e| MedbotError::Config(format!("{name}: {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, MedbotError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn missing_credentials_fail_at_startup() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, MedbotError::Config(_)));
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[("GROQ_API_KEY", "secret")]).unwrap();
        assert_eq!(config.llm.model, "llama-3.1-8b-instant");
        assert_eq!(config.llm.timeout, Duration::from_secs(20));
        assert_eq!(config.match_cutoff, 70);
        assert_eq!(config.max_alternates, 2);
        assert_eq!(config.max_input_chars, 200);
        assert_eq!(config.strategy, ResolverStrategy::Fuzzy);
        assert_eq!(
            config.store,
            StoreSettings::Csv {
                path: PathBuf::from("data/hospital_doctors.csv")
            }
        );
        assert_eq!(config.cors_origins, ["*"]);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("GROQ_API_KEY", "secret"),
            ("STORE_BACKEND", "postgres"),
            ("DATABASE_URL", "postgres://medbot@db/medbot"),
            ("RESOLVER_STRATEGY", "llm"),
            ("MATCH_CUTOFF", "80"),
            ("CORS_ORIGINS", "http://a.test, http://b.test"),
        ])
        .unwrap();
        assert_eq!(config.strategy, ResolverStrategy::Llm);
        assert_eq!(config.match_cutoff, 80);
        assert_eq!(config.cors_origins, ["http://a.test", "http://b.test"]);
        assert!(matches!(config.store, StoreSettings::Postgres { .. }));
    }

    #[test]
    fn bad_values_are_reported() {
        assert!(load(&[("GROQ_API_KEY", "k"), ("MAX_ALTERNATES", "two")]).is_err());
        assert!(load(&[("GROQ_API_KEY", "k"), ("STORE_BACKEND", "sqlite")]).is_err());
        assert!(load(&[("GROQ_API_KEY", "k"), ("RESOLVER_STRATEGY", "magic")]).is_err());
    }
}
