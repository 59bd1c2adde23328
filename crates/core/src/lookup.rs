//! Primary / alternate doctor selection shared by every store backend

use std::collections::HashSet;

use serde::Serialize;

use crate::normalize::normalize_institution_name;
use crate::record::DoctorRecord;

/// Default number of alternates offered
pub const DEFAULT_MAX_ALTERNATES: usize = 2;

/// Doctors found for one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DoctorMatches {
    /// Matching specialty at the requested hospital
    pub primary: Vec<DoctorRecord>,
    /// Matching specialty elsewhere, one per (hospital, area)
    pub alternates: Vec<DoctorRecord>,
}

impl DoctorMatches {
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.alternates.is_empty()
    }
}

/// Split available doctors of a specialty into primary and alternate lists.
///
/// Only available records are eligible and specialty comparison ignores case.
/// With a hospital, primary holds records whose institution key equals the
/// requested one; alternates hold records from other institutions. Without a
/// hospital, primary is empty and every matching record is an alternate
/// candidate. Alternates are deduplicated by (hospital, area), capped at
/// `max_alternates` and kept in store order.
pub fn partition_doctors<I>(
    records: I,
    specialty: &str,
    hospital: Option<&str>,
    max_alternates: usize,
) -> DoctorMatches
where
    I: IntoIterator<Item = DoctorRecord>,
{
    let specialty = specialty.trim().to_lowercase();
    let hospital_key = hospital
        .map(normalize_institution_name)
        .filter(|key| !key.is_empty());

    let mut matches = DoctorMatches::default();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for record in records {
        if !record.availability || record.specialty.trim().to_lowercase() != specialty {
            continue;
        }

        let record_key = normalize_institution_name(&record.hospital_name);
        if hospital_key.as_deref() == Some(record_key.as_str()) {
            matches.primary.push(record);
            continue;
        }

        if matches.alternates.len() >= max_alternates {
            continue;
        }
        let pair = (record.hospital_name.clone(), record.area.clone());
        if seen.insert(pair) {
            matches.alternates.push(record);
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor(hospital: &str, area: &str, name: &str, specialty: &str, available: bool) -> DoctorRecord {
        DoctorRecord {
            hospital_name: hospital.to_string(),
            area: area.to_string(),
            doctor_name: name.to_string(),
            specialty: specialty.to_string(),
            experience_years: 10,
            availability: available,
            available_beds: 50,
        }
    }

    fn dataset() -> Vec<DoctorRecord> {
        vec![
            doctor("Ganga Hospital", "Saibaba Colony", "Dr. A", "Cardiology", true),
            doctor("Ganga Hospital", "Saibaba Colony", "Dr. B", "Cardiology", false),
            doctor("KG Hospital", "Race Course", "Dr. C", "cardiology", true),
            doctor("KG Hospital", "Race Course", "Dr. D", "Cardiology", true),
            doctor("PSG Hospitals", "Peelamedu", "Dr. E", "Cardiology", true),
            doctor("Gem Hospital", "Ramanathapuram", "Dr. F", "Cardiology", true),
            doctor("Ganga", "Saibaba Colony", "Dr. G", "Cardiology", true),
            doctor("Ganga Hospital", "Saibaba Colony", "Dr. H", "Neurology", true),
        ]
    }

    #[test]
    fn primary_uses_institution_key() {
        let matches = partition_doctors(dataset(), "Cardiology", Some("ganga hospital"), 2);
        let names: Vec<_> = matches.primary.iter().map(|d| d.doctor_name.as_str()).collect();
        assert_eq!(names, ["Dr. A", "Dr. G"]);
    }

    #[test]
    fn primary_survives_alternate_cap() {
        let mut records = dataset();
        records.push(doctor("Ganga Hospital", "Saibaba Colony", "Dr. Z", "Cardiology", true));
        let matches = partition_doctors(records, "cardiology", Some("Ganga Hospital"), 1);
        assert_eq!(matches.primary.len(), 3);
        assert_eq!(matches.alternates.len(), 1);
    }

    #[test]
    fn never_returns_unavailable_doctors() {
        let matches = partition_doctors(dataset(), "Cardiology", Some("Ganga Hospital"), 10);
        assert!(matches.primary.iter().all(|d| d.availability));
        assert!(matches.alternates.iter().all(|d| d.availability));
    }

    #[test]
    fn alternates_are_deduplicated_and_capped() {
        let matches = partition_doctors(dataset(), "Cardiology", Some("Ganga Hospital"), 10);
        let names: Vec<_> = matches.alternates.iter().map(|d| d.doctor_name.as_str()).collect();
        assert_eq!(names, ["Dr. C", "Dr. E", "Dr. F"]);

        let capped = partition_doctors(dataset(), "Cardiology", Some("Ganga Hospital"), 2);
        assert_eq!(capped.alternates.len(), 2);

        let pairs: HashSet<_> = matches
            .alternates
            .iter()
            .map(|d| (d.hospital_name.clone(), d.area.clone()))
            .collect();
        assert_eq!(pairs.len(), matches.alternates.len());
    }

    #[test]
    fn no_hospital_means_alternates_only() {
        let matches = partition_doctors(dataset(), "Cardiology", None, 2);
        assert!(matches.primary.is_empty());
        let names: Vec<_> = matches.alternates.iter().map(|d| d.doctor_name.as_str()).collect();
        assert_eq!(names, ["Dr. A", "Dr. C"]);
    }

    #[test]
    fn unknown_specialty_is_empty_not_error() {
        let matches = partition_doctors(dataset(), "Dentistry", Some("Ganga Hospital"), 2);
        assert!(matches.is_empty());
    }
}
