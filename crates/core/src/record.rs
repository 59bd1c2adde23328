//! Doctor records as stored in the dataset

use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// Column order of the dataset file and of `hospital_doctor_data`
pub const COLUMNS: [&str; 7] = [
    "hospital_name",
    "area",
    "doctor_name",
    "specialty",
    "experience_years",
    "availability",
    "available_beds",
];

/// One doctor row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorRecord {
    pub hospital_name: String,
    pub area: String,
    pub doctor_name: String,
    pub specialty: String,
    pub experience_years: u32,
    #[serde(deserialize_with = "flexible_bool")]
    pub availability: bool,
    pub available_beds: u32,
}

/// Accept "true"/"false" in any letter case (generated datasets write "True")
fn flexible_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => Ok(b),
        Raw::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "invalid availability '{other}', expected true or false"
            ))),
        },
    }
}

impl DoctorRecord {
    /// Single-line rendering used in the fact block.
    ///
    /// `Doctor: <name> | Specialty: <s> | Experience: <n> yrs | Hospital: <h> (<area>) | Beds: <b>`
    pub fn fact_line(&self) -> String {
        format!(
            "Doctor: {} | Specialty: {} | Experience: {} yrs | Hospital: {} ({}) | Beds: {}",
            self.doctor_name,
            self.specialty,
            self.experience_years,
            self.hospital_name,
            self.area,
            self.available_beds
        )
    }

    /// Parse a line produced by `fact_line`.
    ///
    /// Fields are split at their labels rather than at every `" | "`, so a
    /// name may contain the separator; it may not contain the next label.
    /// Fact lines only ever list available doctors, so the parsed record is
    /// marked available.
    pub fn from_fact_line(line: &str) -> Option<Self> {
        let rest = line.trim().strip_prefix("Doctor: ")?;
        let (doctor_name, rest) = rest.split_once(" | Specialty: ")?;
        let (specialty, rest) = rest.split_once(" | Experience: ")?;
        let (experience, rest) = rest.split_once(" yrs | Hospital: ")?;
        let (hospital, beds) = rest.rsplit_once(" | Beds: ")?;
        let (hospital_name, area) = split_area(hospital)?;

        Some(Self {
            hospital_name: hospital_name.to_string(),
            area: area.to_string(),
            doctor_name: doctor_name.to_string(),
            specialty: specialty.to_string(),
            experience_years: experience.parse().ok()?,
            availability: true,
            available_beds: beds.parse().ok()?,
        })
    }

    /// Doctor name with a single "Dr." prefix
    pub fn display_name(&self) -> String {
        let name = self.doctor_name.trim();
        if name.to_ascii_lowercase().starts_with("dr.") {
            name.to_string()
        } else {
            format!("Dr. {name}")
        }
    }
}

/// Split `<name> (<area>)` at the parenthesis matching the final one, so
/// either part may carry its own balanced parentheses.
fn split_area(hospital: &str) -> Option<(&str, &str)> {
    let inner = hospital.strip_suffix(')')?;
    let mut depth = 0usize;
    for (index, c) in inner.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' if depth == 0 => {
                let name = inner[..index].strip_suffix(' ')?;
                return Some((name, &inner[index + 1..]));
            }
            '(' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Read every record from CSV data with the standard header
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<DoctorRecord>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut records = Vec::new();
    for row in reader.deserialize::<DoctorRecord>() {
        records.push(row?);
    }
    Ok(records)
}

/// Read every record from a CSV file
pub fn read_csv_path(path: impl AsRef<Path>) -> Result<Vec<DoctorRecord>> {
    let file = std::fs::File::open(path.as_ref()).map_err(|e| {
        crate::MedbotError::Dataset(format!("cannot open {}: {e}", path.as_ref().display()))
    })?;
    read_csv(file)
}

/// Write records as CSV with the standard header
pub fn write_csv<W: Write>(writer: W, records: &[DoctorRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .flush()
        .map_err(|e| crate::MedbotError::Dataset(format!("cannot write dataset: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
hospital_name,area,doctor_name,specialty,experience_years,availability,available_beds
Ganga Hospital,Saibaba Colony,Dr. Arjun Rao,Orthopedics,12,True,40
KG Hospital,Race Course,Dr. Priya Nair,Cardiology,9,false,15
";

    #[test]
    fn reads_csv_with_mixed_case_booleans() {
        let records = read_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].availability);
        assert!(!records[1].availability);
        assert_eq!(records[0].experience_years, 12);
        assert_eq!(records[1].available_beds, 15);
    }

    #[test]
    fn written_csv_has_standard_header_and_reads_back() {
        let records = read_csv(SAMPLE.as_bytes()).unwrap();
        let mut out = Vec::new();
        write_csv(&mut out, &records).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().next(), Some(COLUMNS.join(",").as_str()));
        assert_eq!(read_csv(text.as_bytes()).unwrap(), records);
    }

    #[test]
    fn rejects_unknown_availability_text() {
        let bad = "hospital_name,area,doctor_name,specialty,experience_years,availability,available_beds\n\
                   A,B,C,D,1,maybe,2\n";
        assert!(read_csv(bad.as_bytes()).is_err());
    }

    #[test]
    fn fact_line_parses_back() {
        let record = DoctorRecord {
            hospital_name: "Sri Ramakrishna Hospital".to_string(),
            area: "Sidhapudur".to_string(),
            doctor_name: "Dr. Meena Iyer".to_string(),
            specialty: "Neurology".to_string(),
            experience_years: 18,
            availability: true,
            available_beds: 220,
        };
        let line = record.fact_line();
        assert_eq!(
            line,
            "Doctor: Dr. Meena Iyer | Specialty: Neurology | Experience: 18 yrs | \
             Hospital: Sri Ramakrishna Hospital (Sidhapudur) | Beds: 220"
        );
        assert_eq!(DoctorRecord::from_fact_line(&line), Some(record));
    }

    #[test]
    fn parentheses_and_separators_survive_fact_lines() {
        let record = DoctorRecord {
            hospital_name: "Kovai Medical Center (KMCH)".to_string(),
            area: "Avinashi Road (East)".to_string(),
            doctor_name: "Dr. Anitha | Reddy".to_string(),
            specialty: "General Medicine".to_string(),
            experience_years: 7,
            availability: true,
            available_beds: 95,
        };
        assert_eq!(DoctorRecord::from_fact_line(&record.fact_line()), Some(record));
    }

    #[test]
    fn malformed_fact_line_is_rejected() {
        assert_eq!(DoctorRecord::from_fact_line("None available."), None);
        assert_eq!(
            DoctorRecord::from_fact_line("Doctor: X | Specialty: Y | Experience: many yrs | Hospital: H (A) | Beds: 1"),
            None
        );
        assert_eq!(
            DoctorRecord::from_fact_line("Doctor: X | Specialty: Y | Experience: 3 yrs | Hospital: H A) | Beds: 1"),
            None
        );
        assert_eq!(
            DoctorRecord::from_fact_line("Doctor: X | Specialty: Y | Experience: 3 yrs | Hospital: H (A) | Beds: 1 | Extra: 2"),
            None
        );
    }

    #[test]
    fn display_name_adds_single_prefix() {
        let mut record = read_csv(SAMPLE.as_bytes()).unwrap().remove(0);
        assert_eq!(record.display_name(), "Dr. Arjun Rao");
        record.doctor_name = "Kavitha Menon".to_string();
        assert_eq!(record.display_name(), "Dr. Kavitha Menon");
    }
}
