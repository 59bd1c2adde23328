//! medbot-server library crate
//!
//! Exposes `build_app`, `build_assistant` and `config` for the binaries and
//! integration tests. The HTTP entrypoint is in `main.rs`, the terminal
//! loop in `bin/repl.rs`.

pub mod ai;
pub mod config;
pub mod db;
pub mod error;
mod middleware;
mod routes;

use std::sync::Arc;

use axum::{Extension, Router, middleware as axum_mw, routing::get};
use medbot_core::{HospitalRegistry, MedbotError, Resolver, SymptomCatalog};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ai::{Assistant, ChatClient, TextGenerator};
use config::Config;
use db::{DoctorStore, Store};
use middleware::ApiKeyAuth;

/// Shared handler state
pub struct AppState<S, G> {
    pub assistant: Arc<Assistant<S, G>>,
    pub max_input_chars: usize,
}

impl<S, G> Clone for AppState<S, G> {
    fn clone(&self) -> Self {
        Self {
            assistant: Arc::clone(&self.assistant),
            max_input_chars: self.max_input_chars,
        }
    }
}

/// Wire the configured resolver, store and text-generation client.
///
/// Hospital names found in the store come first in the registry so that
/// resolved names match stored rows; the built-in list fills the rest.
pub async fn build_assistant(config: &Config, store: Store) -> Result<Assistant<Store, ChatClient>, MedbotError> {
    let symptoms = match &config.symptom_map_path {
        Some(path) => {
            let catalog = SymptomCatalog::from_csv_path(path)?;
            tracing::info!(path = %path.display(), entries = catalog.len(), "Loaded symptom map");
            catalog
        }
        None => SymptomCatalog::builtin(),
    };

    let mut hospitals = match store.hospital_names().await {
        Ok(names) => HospitalRegistry::new(names),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read hospital names from the store, using built-in list only");
            HospitalRegistry::default()
        }
    };
    hospitals.extend(HospitalRegistry::builtin().names());
    tracing::info!(hospitals = hospitals.len(), symptoms = symptoms.len(), "Resolver ready");

    let resolver = Resolver::new(symptoms, hospitals).with_cutoff(config.match_cutoff);
    let client = ChatClient::new(&config.llm)?;

    Ok(Assistant::new(resolver, store, client)
        .with_strategy(config.strategy)
        .with_max_alternates(config.max_alternates))
}

/// Build the full application router with all routes and middleware.
///
/// Extracted from `main()` so integration tests can construct the app
/// without binding to a TCP port.
pub fn build_app<S, G>(assistant: Assistant<S, G>, config: &Config) -> Router
where
    S: DoctorStore + 'static,
    G: TextGenerator + 'static,
{
    let state = AppState {
        assistant: Arc::new(assistant),
        max_input_chars: config.max_input_chars,
    };

    let auth = ApiKeyAuth::new(config.api_key.clone());
    let rate_limiter = middleware::create_rate_limiter(config.rate_limit_rps);

    // Protected routes (require auth)
    let chat_routes = routes::chat_routes::<S, G>()
        .layer(axum_mw::from_fn(middleware::auth_middleware))
        .layer(Extension(auth))
        .layer(axum_mw::from_fn(middleware::rate_limit_middleware))
        .layer(Extension(rate_limiter));

    // Repeated installs (integration tests) keep the first global recorder
    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    let prometheus_handle = recorder.handle();
    let _ = metrics::set_global_recorder(recorder);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(routes::ui::index))
        .route("/health", get(routes::health::check::<S, G>))
        .route("/metrics", get(routes::metrics::get))
        .layer(Extension(prometheus_handle));

    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(public_routes)
        .merge(chat_routes)
        .with_state(state)
        .layer(axum_mw::from_fn(middleware::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_mw::from_fn(middleware::metrics_middleware))
}
