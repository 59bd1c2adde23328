use std::path::PathBuf;

use medbot_core::record::read_csv_path;
use medbot_core::{DoctorMatches, DoctorRecord, MedbotError, Result, SelectQuery, partition_doctors};

use super::{DoctorStore, distinct_in_order};

/// Flat-file backend; the file is opened and read on every call
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<Vec<DoctorRecord>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_csv_path(&path))
            .await
            .map_err(|e| MedbotError::StoreUnavailable(format!("dataset reader task failed: {e}")))?
            .map_err(|e| {
                tracing::error!(error = %e, path = %self.path.display(), "Failed to read dataset");
                MedbotError::StoreUnavailable(e.to_string())
            })
    }
}

impl DoctorStore for CsvStore {
    async fn find_doctors(
        &self,
        specialty: &str,
        hospital: Option<&str>,
        max_alternates: usize,
    ) -> Result<DoctorMatches> {
        let records = self.load().await?;
        Ok(partition_doctors(records, specialty, hospital, max_alternates))
    }

    async fn select(&self, query: &SelectQuery) -> Result<Vec<DoctorRecord>> {
        let records = self.load().await?;
        Ok(records
            .into_iter()
            .filter(|record| query.matches(record))
            .take(query.limit())
            .collect())
    }

    async fn hospital_names(&self) -> Result<Vec<String>> {
        let records = self.load().await?;
        Ok(distinct_in_order(records.into_iter().map(|record| record.hospital_name)))
    }

    async fn ping(&self) -> Result<()> {
        self.load().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medbot_core::QueryIntent;
    use std::io::Write;

    const DATA: &str = "\
hospital_name,area,doctor_name,specialty,experience_years,availability,available_beds
Ganga Hospital,Saibaba Colony,Dr. Arun Kumar,Cardiology,14,True,120
KG Hospital,Race Course,Dr. Priya Nair,Cardiology,9,True,80
KG Hospital,Race Course,Dr. Latha S,Cardiology,11,True,80
PSG Hospitals,Peelamedu,Dr. Ravi Menon,Neurology,20,False,200
Gem Hospital,Ramanathapuram,Dr. Meena Iyer,Neurology,7,True,60
";

    fn dataset() -> (tempfile::NamedTempFile, CsvStore) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DATA.as_bytes()).unwrap();
        let store = CsvStore::new(file.path());
        (file, store)
    }

    #[tokio::test]
    async fn finds_primary_and_alternates() {
        let (_file, store) = dataset();
        let matches = store.find_doctors("cardiology", Some("Ganga Hospital"), 2).await.unwrap();
        assert_eq!(matches.primary.len(), 1);
        assert_eq!(matches.primary[0].doctor_name, "Dr. Arun Kumar");
        assert_eq!(matches.alternates.len(), 1);
        assert_eq!(matches.alternates[0].hospital_name, "KG Hospital");
    }

    #[tokio::test]
    async fn select_applies_template_filters() {
        let (_file, store) = dataset();
        let query = SelectQuery::from_intent(&QueryIntent::new("Neurology").with_availability(true));
        let rows = store.select(&query).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].doctor_name, "Dr. Meena Iyer");

        let query = SelectQuery::from_intent(&QueryIntent::new("Neurology"));
        assert_eq!(store.select(&query).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn hospital_names_are_distinct_in_file_order() {
        let (_file, store) = dataset();
        let names = store.hospital_names().await.unwrap();
        assert_eq!(names, ["Ganga Hospital", "KG Hospital", "PSG Hospitals", "Gem Hospital"]);
    }

    #[tokio::test]
    async fn missing_file_is_store_unavailable() {
        let store = CsvStore::new("/nonexistent/hospital_doctors.csv");
        let err = store.find_doctors("Cardiology", None, 2).await.unwrap_err();
        assert!(matches!(err, MedbotError::StoreUnavailable(_)));
        assert!(store.ping().await.is_err());
    }
}
