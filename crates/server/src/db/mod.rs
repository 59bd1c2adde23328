//! Record store adapters
//!
//! Both backends answer the same two questions: which available doctors
//! match a specialty (split into primary and alternates), and which rows a
//! fixed-template `SelectQuery` returns.

mod csv_store;
mod pg_store;

pub use csv_store::CsvStore;
pub use pg_store::PgStore;

use std::collections::HashSet;
use std::future::Future;

use deadpool_postgres::{Config, Pool, Runtime};
use medbot_core::{DoctorMatches, DoctorRecord, MedbotError, Result, SelectQuery};
use tokio_postgres::NoTls;

use crate::config::StoreSettings;

/// Read-only access to doctor records
pub trait DoctorStore: Send + Sync {
    /// Available doctors for `specialty`, split by requested hospital
    fn find_doctors(
        &self,
        specialty: &str,
        hospital: Option<&str>,
        max_alternates: usize,
    ) -> impl Future<Output = Result<DoctorMatches>> + Send;

    /// Rows returned by a structured query, at most `query.limit()`
    fn select(&self, query: &SelectQuery) -> impl Future<Output = Result<Vec<DoctorRecord>>> + Send;

    /// Distinct hospital names present in the store, in order of first appearance
    fn hospital_names(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Cheap reachability check
    fn ping(&self) -> impl Future<Output = Result<()>> + Send;
}

/// Backend chosen at start-up
#[derive(Clone)]
pub enum Store {
    Csv(CsvStore),
    Postgres(PgStore),
}

impl DoctorStore for Store {
    async fn find_doctors(
        &self,
        specialty: &str,
        hospital: Option<&str>,
        max_alternates: usize,
    ) -> Result<DoctorMatches> {
        match self {
            Store::Csv(store) => store.find_doctors(specialty, hospital, max_alternates).await,
            Store::Postgres(store) => store.find_doctors(specialty, hospital, max_alternates).await,
        }
    }

    async fn select(&self, query: &SelectQuery) -> Result<Vec<DoctorRecord>> {
        match self {
            Store::Csv(store) => store.select(query).await,
            Store::Postgres(store) => store.select(query).await,
        }
    }

    async fn hospital_names(&self) -> Result<Vec<String>> {
        match self {
            Store::Csv(store) => store.hospital_names().await,
            Store::Postgres(store) => store.hospital_names().await,
        }
    }

    async fn ping(&self) -> Result<()> {
        match self {
            Store::Csv(store) => store.ping().await,
            Store::Postgres(store) => store.ping().await,
        }
    }
}

/// Create a connection pool from a database URL
pub async fn create_pool(database_url: &str) -> std::result::Result<Pool, deadpool_postgres::CreatePoolError> {
    let mut cfg = Config::new();
    cfg.url = Some(database_url.to_string());
    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
}

/// Open the configured backend. Connections are made lazily.
pub async fn connect(settings: &StoreSettings) -> Result<Store> {
    match settings {
        StoreSettings::Csv { path } => {
            tracing::info!(path = %path.display(), "Using CSV record store");
            Ok(Store::Csv(CsvStore::new(path.clone())))
        }
        StoreSettings::Postgres { database_url } => {
            let pool = create_pool(database_url)
                .await
                .map_err(|e| MedbotError::Config(format!("Failed to create database pool: {e}")))?;
            tracing::info!("Using Postgres record store");
            Ok(Store::Postgres(PgStore::new(pool)))
        }
    }
}

/// Drop repeated names, keeping the first appearance of each
fn distinct_in_order(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}
