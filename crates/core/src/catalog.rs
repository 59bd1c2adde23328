//! Static lookup tables: symptom catalog and hospital registry

use std::path::Path;

use serde::Deserialize;

use crate::error::{MedbotError, Result};
use crate::normalize::{institution_phrase, normalize, normalize_institution_name};

/// Built-in symptom phrase to specialty table
const BUILTIN_SYMPTOMS: &[(&str, &str)] = &[
    ("chest pain", "Cardiology"),
    ("heart problem", "Cardiology"),
    ("cardiology", "Cardiology"),
    ("fracture", "Orthopedics"),
    ("bone pain", "Orthopedics"),
    ("orthopedics", "Orthopedics"),
    ("eye problem", "Ophthalmology"),
    ("vision issue", "Ophthalmology"),
    ("ophthalmology", "Ophthalmology"),
    ("stomach pain", "Gastroenterology"),
    ("gastro", "Gastroenterology"),
    ("gastroenterology", "Gastroenterology"),
    ("skin rash", "Dermatology"),
    ("dermatology", "Dermatology"),
    ("pregnancy", "Gynecology"),
    ("gynecology", "Gynecology"),
    ("fever", "General Medicine"),
    ("general medicine", "General Medicine"),
    ("nervous problem", "Neurology"),
    ("neurology", "Neurology"),
    ("headache", "Neurology"),
    ("seizure", "Neurology"),
    ("memory loss", "Neurology"),
    ("oncology", "Oncology"),
    ("cancer", "Oncology"),
    ("tumor", "Oncology"),
    ("chemotherapy", "Oncology"),
    ("radiation", "Oncology"),
];

/// Built-in hospital names used as the fuzzy-match universe
const BUILTIN_HOSPITALS: &[&str] = &[
    "Coimbatore Medical Center",
    "Kovai Medical College Hospital",
    "KG Hospital",
    "PSG Hospitals",
    "Sri Ramakrishna Hospital",
    "Ganga Hospital",
    "Gem Hospital",
    "Aravind Eye Hospital",
    "Sugam Hospital",
    "Vijaya Hospital",
    "Medwin Specialty Hospital",
    "Green Leaf Hospital",
    "Lotus Heart Center",
    "Sundaram Multispecialty",
    "Royal Care Super Specialty",
    "Trustwell Hospital",
    "New Life Hospital",
    "Wellbeing Hospital",
    "Hope Medical Center",
    "Bright Health Hospital",
];

/// Ordered symptom phrase → specialty mapping.
///
/// Keys are stored normalized and are unique; iteration order is insertion
/// order, which is also the tie-break order for fuzzy matching.
#[derive(Debug, Clone)]
pub struct SymptomCatalog {
    entries: Vec<(String, String)>,
}

/// Row shape of a symptom map file (same columns as `symptom_specialty`)
#[derive(Debug, Deserialize)]
struct SymptomRow {
    symptom_keyword: String,
    specialty: String,
}

impl SymptomCatalog {
    /// Build a catalog, rejecting empty or duplicate keys
    pub fn new<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut catalog = Self { entries: Vec::new() };
        for (key, specialty) in entries {
            let key = normalize(key.as_ref());
            let specialty = specialty.as_ref().trim().to_string();
            if key.is_empty() || specialty.is_empty() {
                return Err(MedbotError::Dataset(
                    "symptom map entries need a keyword and a specialty".to_string(),
                ));
            }
            if catalog.entries.iter().any(|(k, _)| *k == key) {
                return Err(MedbotError::Dataset(format!("duplicate symptom keyword '{key}'")));
            }
            catalog.entries.push((key, specialty));
        }
        Ok(catalog)
    }

    /// The table shipped with the service
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_SYMPTOMS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Load from a `symptom_keyword,specialty` CSV file
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path.as_ref())?;
        let mut rows = Vec::new();
        for row in reader.deserialize::<SymptomRow>() {
            let row = row?;
            rows.push((row.symptom_keyword, row.specialty));
        }
        Self::new(rows)
    }

    /// Symptom keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Key and specialty at a position returned by `best_match`
    pub fn entry(&self, index: usize) -> Option<(&str, &str)> {
        self.entries
            .get(index)
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Specialty mapped to a symptom key (case-insensitive)
    pub fn specialty_for(&self, symptom: &str) -> Option<&str> {
        let key = normalize(symptom);
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One registered hospital
#[derive(Debug, Clone)]
struct HospitalEntry {
    name: String,
    key: String,
    phrase: String,
}

/// Ordered set of canonical hospital names with their institution keys
#[derive(Debug, Clone, Default)]
pub struct HospitalRegistry {
    entries: Vec<HospitalEntry>,
}

impl HospitalRegistry {
    /// Build from names; later names sharing an institution key are skipped
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::default();
        registry.extend(names);
        registry
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_HOSPITALS.iter().copied())
    }

    /// Append names not already present (by institution key), keeping order
    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref().trim();
            let key = normalize_institution_name(name);
            if key.is_empty() || self.entries.iter().any(|e| e.key == key) {
                continue;
            }
            self.entries.push(HospitalEntry {
                name: name.to_string(),
                key,
                phrase: institution_phrase(name),
            });
        }
    }

    /// Stoplist-stripped names with word boundaries, in insertion order
    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.phrase.as_str())
    }

    /// Canonical (original-case) name at a position returned by `best_match`
    pub fn name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.name.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
