//! Fixed SELECT template for `hospital_doctor_data` and its read-only guard

use serde::Serialize;

use crate::error::{MedbotError, Result};
use crate::intent::QueryIntent;
use crate::normalize::normalize_institution_name;
use crate::record::{COLUMNS, DoctorRecord};

/// Tables a statement may read from
pub const APPROVED_TABLES: [&str; 2] = ["hospital_doctor_data", "symptom_specialty"];

/// Keywords that never appear in a read-only statement
const FORBIDDEN_KEYWORDS: &[&str] = &[
    "insert", "update", "delete", "drop", "alter", "create", "truncate", "grant", "revoke",
    "copy", "into", "merge", "call", "execute", "vacuum",
];

/// A parameterized SELECT built from a `QueryIntent`.
///
/// User-supplied values only ever travel as `$n` parameters; the SQL text is
/// assembled from fixed fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectQuery {
    sql: String,
    params: Vec<String>,
    #[serde(skip)]
    intent: QueryIntent,
}

impl SelectQuery {
    pub fn from_intent(intent: &QueryIntent) -> Self {
        let mut params = vec![intent.specialty.trim().to_string()];
        let mut predicates = vec!["lower(specialty) = lower($1)".to_string()];

        if let Some(hospital) = &intent.hospital {
            params.push(hospital.trim().to_string());
            predicates.push(format!("lower(hospital_name) = lower(${})", params.len()));
        }
        if let Some(doctor) = &intent.doctor {
            params.push(doctor.trim().to_string());
            predicates.push(format!("strpos(lower(doctor_name), lower(${})) > 0", params.len()));
        }
        if intent.require_available {
            predicates.push("availability = TRUE".to_string());
        }

        let sql = format!(
            "SELECT {} FROM hospital_doctor_data WHERE {} LIMIT {}",
            COLUMNS.join(", "),
            predicates.join(" AND "),
            intent.limit()
        );

        Self {
            sql,
            params,
            intent: intent.clone(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn limit(&self) -> usize {
        self.intent.limit()
    }

    /// Evaluate the same filters in memory, for stores without SQL.
    ///
    /// Hospital names compare by institution key, a slightly looser test than
    /// the case-insensitive equality the SQL form uses.
    pub fn matches(&self, record: &DoctorRecord) -> bool {
        let intent = &self.intent;
        if !record.specialty.trim().eq_ignore_ascii_case(intent.specialty.trim()) {
            return false;
        }
        if let Some(hospital) = &intent.hospital {
            if normalize_institution_name(&record.hospital_name) != normalize_institution_name(hospital) {
                return false;
            }
        }
        if let Some(doctor) = &intent.doctor {
            if !record.doctor_name.to_lowercase().contains(&doctor.to_lowercase()) {
                return false;
            }
        }
        !intent.require_available || record.availability
    }
}

/// Reject anything but a single SELECT reading only approved tables
pub fn ensure_read_only(sql: &str) -> Result<()> {
    let reject = |reason: &str| Err(MedbotError::InvalidQuery(reason.to_string()));

    let statement = sql.trim();
    let statement = statement.strip_suffix(';').unwrap_or(statement);
    if statement.contains(';') {
        return reject("multiple statements");
    }
    if statement.contains("--") || statement.contains("/*") {
        return reject("comments are not allowed");
    }

    let lowered = statement.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.first() != Some(&"select") {
        return reject("not a SELECT statement");
    }
    if let Some(word) = tokens.iter().find(|t| FORBIDDEN_KEYWORDS.contains(t)) {
        return Err(MedbotError::InvalidQuery(format!("forbidden keyword '{word}'")));
    }

    let mut reads_table = false;
    for pair in tokens.windows(2) {
        if pair[0] == "from" || pair[0] == "join" {
            if !APPROVED_TABLES.contains(&pair[1]) {
                return Err(MedbotError::InvalidQuery(format!("table '{}' is not allowed", pair[1])));
            }
            reads_table = true;
        }
    }
    if !reads_table {
        return reject("no table referenced");
    }

    Ok(())
}
