//! Deterministic synthetic doctor rows for demo datasets
//!
//! Each extra hospital gets one area and five doctors with distinct
//! specialties. Values are derived from the hospital's and doctor's
//! positions, so the same base data always yields the same file.

use std::collections::HashSet;

use crate::normalize::normalize_institution_name;
use crate::record::DoctorRecord;

/// Doctors generated per hospital
pub const DOCTORS_PER_HOSPITAL: usize = 5;

/// Coimbatore neighbourhoods used for generated hospitals
pub const AREAS: &[&str] = &[
    "Gandhipuram",
    "Town Hall",
    "Singanallur",
    "Avinashi Road",
    "Ukkadam",
    "Saravanampatti",
    "Kalapatti",
    "Thudiyalur",
    "Ganapathy",
    "Selvapuram",
    "Kuniyamuthur",
    "Podanur",
    "Irugur",
    "Perur",
    "Chinniampalayam",
    "Sulur",
    "Marudamalai",
    "Kovaipudur",
];

const SPECIALTIES: &[&str] = &[
    "Cardiology",
    "Oncology",
    "Neurology",
    "Orthopedics",
    "Pediatrics",
    "Dermatology",
    "Gynecology",
    "General Medicine",
    "Gastroenterology",
    "Ophthalmology",
    "General Surgery",
];

const FIRST_NAMES: &[&str] = &[
    "Arun", "Priya", "Vijay", "Meena", "Suresh", "Divya", "Karthik", "Anitha", "Rajiv", "Sneha", "Naveen",
    "Deepa", "Rahul", "Kavitha", "Balaji", "Shalini", "Harini", "Varun", "Rohit", "Ashwin",
];

const LAST_NAMES: &[&str] = &[
    "Rao", "Iyer", "Menon", "Krishnan", "Sharma", "Pillai", "Kumar", "Reddy", "Prasad", "Nair",
];

/// Hospitals added on top of the seed dataset
pub const EXTRA_HOSPITALS: &[&str] = &[
    "Apollo Specialty Hospital",
    "Fortis Health Center",
    "Sri Krishna Medical College",
    "LifeLine Multispecialty",
    "Global Health City",
    "Velan Eye Hospital",
    "Shanthi Children's Hospital",
    "Bharathi Ortho Center",
    "Aruna Women's Clinic",
    "Coimbatore Neuro Care",
    "Sri Venkateswara Institute of Medical Sciences",
    "Nirmala General Hospital",
    "Metro Heart Institute",
    "Santhosh Medical College",
    "Lotus Women's Hospital",
    "Kovai Heart Institute",
    "Green Valley Health Center",
    "Hope Specialty Hospital",
    "Trinity Care Hospital",
    "Elite Health Care",
    "Rainbow Children's Hospital",
    "MediLife Multispecialty",
    "Vision Plus Eye Hospital",
    "Shree Balaji Medical Institute",
    "WellCare Hospital",
    "Sunshine Neuro Center",
    "Grace Medical College",
    "Prime Care Hospital",
    "Janani Women & Child Hospital",
    "Sundar Eye Institute",
    "Harmony Health Center",
    "Nova Medical College",
    "Sri Meenakshi Health Center",
    "Aster Specialty Hospital",
    "Sankara Neuro Institute",
    "Royal Heart Care",
    "LifeSpring Hospital",
    "Heritage Multispecialty",
    "Unity Medical Institute",
    "Sri Sai Health Center",
    "Healing Touch Hospital",
    "Sacred Heart Medical College",
    "Bluebell Hospital",
    "Skyline Health Institute",
    "Athena Women's Hospital",
    "Wellbeing Care Hospital",
    "MediTrust Hospital",
    "Sri Ramana Neuro Hospital",
    "Galaxy Specialty Clinic",
    "Om Shakthi Medical Center",
    "Starline Children's Hospital",
    "Brahma Ortho Institute",
    "Zenith Health College",
    "Veda Women's Hospital",
    "Sapphire Eye Hospital",
    "Amrita Specialty Hospital",
    "Phoenix Heart Institute",
    "Arcadia Health Center",
    "MedStar Multispecialty",
    "Vital Care Hospital",
    "Cosmos Medical Institute",
    "Emerald Eye Clinic",
    "Sterling Neuro Care",
    "Cura Medical College",
    "Radiant Health Care",
    "Pranav Children's Hospital",
    "Sri Ramana Eye Institute",
    "Omega Specialty Hospital",
    "Clover Medical Institute",
    "Vista Women's Hospital",
    "Pulse Heart Care",
    "Magnus General Hospital",
    "Beacon Health College",
    "Olive Health Center",
    "Infinity Medical College",
    "Medicover Specialty Hospital",
    "Summit Neuro Institute",
    "Serene Women's Hospital",
    "Zen Care Hospital",
    "Divine Health Center",
    "Grace Heart Institute",
    "Florence Eye Hospital",
    "Lifecare Children's Hospital",
];

/// Generated rows for every name in `hospitals` whose institution key is not
/// already used by a `base` record, in the order given.
pub fn synthetic_records<'a, I>(base: &[DoctorRecord], hospitals: I) -> Vec<DoctorRecord>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut taken: HashSet<String> = base
        .iter()
        .map(|record| normalize_institution_name(&record.hospital_name))
        .collect();

    let mut records = Vec::new();
    let fresh = hospitals
        .into_iter()
        .filter(|name| taken.insert(normalize_institution_name(name)));
    for (h, hospital) in fresh.enumerate() {
        let area = AREAS[(h * 7) % AREAS.len()];
        let beds = 80 + (h * 37) % 321;
        let first_specialty = (h * 3) % SPECIALTIES.len();

        for d in 0..DOCTORS_PER_HOSPITAL {
            records.push(DoctorRecord {
                hospital_name: hospital.to_string(),
                area: area.to_string(),
                doctor_name: format!(
                    "Dr. {} {}",
                    FIRST_NAMES[(h * 5 + d * 7) % FIRST_NAMES.len()],
                    LAST_NAMES[(h * 3 + d) % LAST_NAMES.len()]
                ),
                specialty: SPECIALTIES[(first_specialty + d) % SPECIALTIES.len()].to_string(),
                experience_years: (5 + (h * 7 + d * 11) % 21) as u32,
                availability: (h + d * 2) % 3 != 0,
                available_beds: beds as u32,
            });
        }
    }
    records
}
