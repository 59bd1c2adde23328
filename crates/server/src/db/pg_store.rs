use deadpool_postgres::Pool;
use medbot_core::record::COLUMNS;
use medbot_core::{
    DoctorMatches, DoctorRecord, MedbotError, Result, SelectQuery, ensure_read_only, partition_doctors,
};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

use super::{DoctorStore, distinct_in_order};

/// Relational backend over the `hospital_doctor_data` table
#[derive(Clone)]
pub struct PgStore {
    pool: Pool,
}

fn pool_error(err: deadpool_postgres::PoolError) -> MedbotError {
    tracing::error!(error = %err, "Database pool error");
    MedbotError::StoreUnavailable(format!("Database pool error: {err}"))
}

fn statement_error(err: tokio_postgres::Error) -> MedbotError {
    // Server-side errors mean the statement ran and failed; anything else is
    // a lost connection.
    if let Some(db_error) = err.as_db_error() {
        tracing::warn!(code = %db_error.code().code(), error = %db_error, "Statement failed");
        MedbotError::Query(db_error.message().to_string())
    } else {
        tracing::error!(error = %err, "Database connection error");
        MedbotError::StoreUnavailable(format!("Database error: {err}"))
    }
}

fn record_from_row(row: &Row) -> Result<DoctorRecord> {
    let count = |column: &str| -> Result<u32> {
        let value: i32 = row
            .try_get(column)
            .map_err(|e| MedbotError::Query(format!("{column}: {e}")))?;
        Ok(u32::try_from(value).unwrap_or(0))
    };
    let text = |column: &str| -> Result<String> {
        row.try_get(column)
            .map_err(|e| MedbotError::Query(format!("{column}: {e}")))
    };

    Ok(DoctorRecord {
        hospital_name: text("hospital_name")?,
        area: text("area")?,
        doctor_name: text("doctor_name")?,
        specialty: text("specialty")?,
        experience_years: count("experience_years")?,
        availability: row
            .try_get("availability")
            .map_err(|e| MedbotError::Query(format!("availability: {e}")))?,
        available_beds: count("available_beds")?,
    })
}

impl PgStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

impl DoctorStore for PgStore {
    async fn find_doctors(
        &self,
        specialty: &str,
        hospital: Option<&str>,
        max_alternates: usize,
    ) -> Result<DoctorMatches> {
        let client = self.pool.get().await.map_err(pool_error)?;
        let sql = format!(
            "SELECT {} FROM hospital_doctor_data WHERE lower(specialty) = lower($1) AND availability = TRUE",
            COLUMNS.join(", ")
        );
        let rows = client.query(&sql, &[&specialty]).await.map_err(statement_error)?;
        let records = rows.iter().map(record_from_row).collect::<Result<Vec<_>>>()?;

        Ok(partition_doctors(records, specialty, hospital, max_alternates))
    }

    async fn select(&self, query: &SelectQuery) -> Result<Vec<DoctorRecord>> {
        ensure_read_only(query.sql())?;

        let client = self.pool.get().await.map_err(pool_error)?;
        let params: Vec<&(dyn ToSql + Sync)> = query
            .params()
            .iter()
            .map(|p| p as &(dyn ToSql + Sync))
            .collect();
        let rows = client
            .query(query.sql(), &params)
            .await
            .map_err(statement_error)?;

        tracing::debug!(sql = %query.sql(), rows = rows.len(), "Structured query executed");
        rows.iter().map(record_from_row).collect()
    }

    async fn hospital_names(&self) -> Result<Vec<String>> {
        let client = self.pool.get().await.map_err(pool_error)?;
        // Physical row order stands in for insertion order in this append-only table
        let rows = client
            .query("SELECT hospital_name FROM hospital_doctor_data ORDER BY ctid", &[])
            .await
            .map_err(statement_error)?;
        Ok(distinct_in_order(rows.iter().map(|row| row.get(0))))
    }

    async fn ping(&self) -> Result<()> {
        let client = self.pool.get().await.map_err(pool_error)?;
        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(statement_error)?;
        Ok(())
    }
}
