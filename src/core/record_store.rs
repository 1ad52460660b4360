use crate::domain::model::{HospitalRecord, LoadPolicy, ResourceField};
use crate::utils::error::{AnalyticsError, Result};
use std::io::Read;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Store shared between the scheduler and interactive actions.
pub type SharedStore = Arc<Mutex<RecordStore>>;

/// Hospital records in CSV row order. Row position is the identity used by
/// every mutating operation; names may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: Vec<HospitalRecord>,
}

impl RecordStore {
    pub fn new(records: Vec<HospitalRecord>) -> Self {
        Self { records }
    }

    /// Builds a store from raw rows. The first row is the header and is dropped.
    pub fn load<I, R>(rows: I, policy: LoadPolicy) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[String]>,
    {
        let mut rows = rows.into_iter();
        if rows.next().is_none() {
            tracing::warn!("Data source is empty, not even a header row");
            return Ok(Self::default());
        }

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for (index, row) in rows.enumerate() {
            match parse_row(index, row.as_ref()) {
                Ok(record) => records.push(record),
                Err(e) if policy == LoadPolicy::SkipInvalid => {
                    tracing::warn!("⚠️ Skipping data row {}: {}", index, e);
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        tracing::debug!("Parsed {} records ({} skipped)", records.len(), skipped);
        Ok(Self { records })
    }

    pub fn from_reader<R: Read>(reader: R, policy: LoadPolicy) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows: Vec<Vec<String>> = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Self::load(rows, policy)
    }

    pub fn from_csv_bytes(bytes: &[u8], policy: LoadPolicy) -> Result<Self> {
        Self::from_reader(bytes, policy)
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[HospitalRecord] {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut [HospitalRecord] {
        &mut self.records
    }

    pub fn check_index(&self, row: usize) -> Result<()> {
        if row >= self.records.len() {
            return Err(AnalyticsError::index(format!(
                "row {} is out of range, the table has {} rows",
                row,
                self.records.len()
            )));
        }
        Ok(())
    }

    pub fn get(&self, row: usize) -> Result<&HospitalRecord> {
        self.check_index(row)?;
        Ok(&self.records[row])
    }

    pub fn set(&mut self, row: usize, field: ResourceField, value: i64) -> Result<()> {
        self.check_index(row)?;
        self.records[row].set(field, value);
        Ok(())
    }

    /// Cell edit as typed by a user; the text is parsed once here.
    pub fn set_text(&mut self, row: usize, field: ResourceField, text: &str) -> Result<()> {
        self.check_index(row)?;
        let value = parse_count(row, field, text)?;
        self.records[row].set(field, value);
        Ok(())
    }
}

impl From<Vec<HospitalRecord>> for RecordStore {
    fn from(records: Vec<HospitalRecord>) -> Self {
        Self::new(records)
    }
}

pub(crate) fn parse_count(row: usize, field: ResourceField, text: &str) -> Result<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| AnalyticsError::ParseError {
            row,
            column: field.key().to_string(),
            value: text.to_string(),
        })
}

fn parse_row(row: usize, fields: &[String]) -> Result<HospitalRecord> {
    let cell = |field: ResourceField| -> Result<i64> {
        let text = fields.get(field.column()).map(String::as_str).unwrap_or("");
        parse_count(row, field, text)
    };

    Ok(HospitalRecord {
        name: fields.first().cloned().unwrap_or_default(),
        staff: cell(ResourceField::Staff)?,
        doctors: cell(ResourceField::Doctors)?,
        beds: cell(ResourceField::Beds)?,
        ct_scanners: cell(ResourceField::CtScanners)?,
        mri_machines: cell(ResourceField::MriMachines)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "name,staff,doctors,beds,ct,mri\nA,5,2,10,1,1\nB,20,5,15,2,2\n";

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_load_discards_header_and_keeps_order() {
        let store = RecordStore::from_csv_bytes(SAMPLE.as_bytes(), LoadPolicy::FailFast).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap(), &HospitalRecord::new("A", 5, 2, 10, 1, 1));
        assert_eq!(store.get(1).unwrap(), &HospitalRecord::new("B", 20, 5, 15, 2, 2));
    }

    #[test]
    fn test_load_from_rows() {
        let data = rows(&[
            &["Hospital Name", "Staff", "Doctors", "Beds", "CT", "MRI"],
            &["North", "12", "4", "30", "1", "0"],
        ]);
        let store = RecordStore::load(data, LoadPolicy::FailFast).unwrap();
        assert_eq!(store.records()[0].name, "North");
        assert_eq!(store.records()[0].beds, 30);
    }

    #[test]
    fn test_empty_source_gives_empty_store() {
        let store = RecordStore::from_csv_bytes(b"", LoadPolicy::FailFast).unwrap();
        assert!(store.is_empty());

        let header_only = RecordStore::from_csv_bytes(b"name,staff\n", LoadPolicy::FailFast).unwrap();
        assert!(header_only.is_empty());
    }

    #[test]
    fn test_fail_fast_reports_bad_cell() {
        let data = "h\nA,5,2,10,1,1\nB,lots,5,15,2,2\n";
        let err = RecordStore::from_csv_bytes(data.as_bytes(), LoadPolicy::FailFast).unwrap_err();

        match err {
            AnalyticsError::ParseError { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "staff");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_skip_invalid_drops_row() {
        let data = "h\nA,5,2,10,1,1\nB,20,five,15,2,2\nC,1,1,1,1\nD,7,7,7,7,7\n";
        let store = RecordStore::from_csv_bytes(data.as_bytes(), LoadPolicy::SkipInvalid).unwrap();

        let names: Vec<&str> = store.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "D"]);
    }

    #[test]
    fn test_numeric_cells_tolerate_whitespace() {
        let data = "h\nSt. Mary , 5 ,2,10,1, 1\n";
        let store = RecordStore::from_csv_bytes(data.as_bytes(), LoadPolicy::FailFast).unwrap();
        assert_eq!(store.records()[0].name, "St. Mary ");
        assert_eq!(store.records()[0].staff, 5);
        assert_eq!(store.records()[0].mri_machines, 1);
    }

    #[test]
    fn test_index_errors() {
        let mut store = RecordStore::from_csv_bytes(SAMPLE.as_bytes(), LoadPolicy::FailFast).unwrap();

        assert!(matches!(store.get(2), Err(AnalyticsError::IndexError { .. })));
        assert!(matches!(
            store.set(5, ResourceField::Beds, 1),
            Err(AnalyticsError::IndexError { .. })
        ));
    }

    #[test]
    fn test_set_and_set_text() {
        let mut store = RecordStore::from_csv_bytes(SAMPLE.as_bytes(), LoadPolicy::FailFast).unwrap();

        store.set(0, ResourceField::Beds, 42).unwrap();
        assert_eq!(store.get(0).unwrap().beds, 42);

        store.set_text(1, ResourceField::MriMachines, " -3 ").unwrap();
        assert_eq!(store.get(1).unwrap().mri_machines, -3);

        let err = store.set_text(1, ResourceField::Staff, "many").unwrap_err();
        assert!(matches!(err, AnalyticsError::ParseError { .. }));
        assert_eq!(store.get(1).unwrap().staff, 20);
    }
}
