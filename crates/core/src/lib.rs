//! medbot-core: domain logic for the symptom-to-doctor assistant
//!
//! Everything in this crate is synchronous and free of I/O except for
//! reading dataset files: text normalization, fuzzy matching, the symptom
//! catalog and hospital registry, doctor record partitioning, the fixed
//! SQL template used by the relational store, and synthetic demo rows.

pub mod catalog;
pub mod error;
pub mod intent;
pub mod lookup;
pub mod matcher;
pub mod normalize;
pub mod record;
pub mod resolve;
pub mod sql;
pub mod synthetic;

pub use catalog::{HospitalRegistry, SymptomCatalog};
pub use error::{MedbotError, Result};
pub use intent::{QueryIntent, QueryKind, implies_availability};
pub use lookup::{DoctorMatches, partition_doctors};
pub use matcher::{Scorer, WeightedRatio, best_match};
pub use normalize::{institution_phrase, normalize, normalize_institution_name};
pub use record::DoctorRecord;
pub use resolve::{ExtractedEntities, ResolvedQuery, Resolver};
pub use sql::{APPROVED_TABLES, SelectQuery, ensure_read_only};
