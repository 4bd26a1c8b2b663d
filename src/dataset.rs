//! The compound table: one row per ChEMBL compound/target pair, loaded from
//! CSV once at startup and read-only afterwards.

use crate::axes::NumericField;
use crate::error::ExplorerError;
use csv::{ReaderBuilder, StringRecord};
use itertools::Itertools;
use std::fs;

/// One compound measured against one target. Immutable after load.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompoundRow {
    pub cmpd_chemblid: String,
    pub target_chemblid: String,
    pub target: String,
    pub molecular_species: String,
    pub full_molformula: String,
    pub molregno: f64,
    pub alogp: f64,
    pub psa: f64,
    pub mw_freebase: f64,
    pub max_phase: f64,
    pub le: f64,
    pub lle: f64,
}

impl CompoundRow {
    pub fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Molregno => self.molregno,
            NumericField::AlogP => self.alogp,
            NumericField::Psa => self.psa,
            NumericField::MwFreebase => self.mw_freebase,
            NumericField::MaxPhase => self.max_phase,
            NumericField::Le => self.le,
            NumericField::Lle => self.lle,
        }
    }

    /// Clinical phase 4 means the compound is an approved drug.
    pub fn is_approved_drug(&self) -> bool {
        self.max_phase == 4.0
    }
}

/// Column positions within one concrete CSV file.
///
/// The raw ChEMBL export repeats the join columns (`target_chemblid`,
/// `molregno`) at the end of each row; taking the first occurrence of every
/// header drops the duplicates, like the original data preparation did.
struct ColumnIndex {
    cmpd_chemblid: usize,
    target_chemblid: usize,
    target: usize,
    molecular_species: usize,
    full_molformula: usize,
    numeric: [(NumericField, usize); 7],
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, ExplorerError> {
        let col = |name: &str| -> Result<usize, ExplorerError> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ExplorerError::FieldNotFound(name.to_owned()))
        };
        let mut numeric = [(NumericField::Molregno, 0); 7];
        for (slot, field) in numeric.iter_mut().zip(NumericField::ALL) {
            *slot = (field, col(field.column())?);
        }
        Ok(Self {
            cmpd_chemblid: col("cmpd_chemblid")?,
            target_chemblid: col("target_chemblid")?,
            target: col("target")?,
            molecular_species: col("molecular_species")?,
            full_molformula: col("full_molformula")?,
            numeric,
        })
    }
}

#[derive(Clone, Debug)]
pub struct Dataset {
    rows: Vec<CompoundRow>,
}

impl Dataset {
    /// Parses a whole CSV text. Any missing column or unparseable numeric
    /// cell is an error; charts must never see a half-loaded table.
    pub fn from_csv_text(text: &str) -> Result<Self, ExplorerError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());
        let headers = rdr.headers()?.clone();
        let columns = ColumnIndex::from_headers(&headers)?;

        let cell = |record: &StringRecord, idx: usize| -> String {
            record.get(idx).unwrap_or_default().trim().to_string()
        };

        let mut rows = vec![];
        for (line, record) in rdr.records().enumerate() {
            let record = record?;
            let mut row = CompoundRow {
                cmpd_chemblid: cell(&record, columns.cmpd_chemblid),
                target_chemblid: cell(&record, columns.target_chemblid),
                target: cell(&record, columns.target),
                molecular_species: cell(&record, columns.molecular_species),
                full_molformula: cell(&record, columns.full_molformula),
                ..Default::default()
            };
            if row.cmpd_chemblid.is_empty() {
                return Err(format!("Data row {}: empty cmpd_chemblid", line + 1).into());
            }
            for (field, idx) in columns.numeric {
                let raw = cell(&record, idx);
                let value: f64 = raw.parse().map_err(|_| {
                    ExplorerError::String(format!(
                        "Data row {}: column {} is not a number: {raw:?}",
                        line + 1,
                        field.column()
                    ))
                })?;
                match field {
                    NumericField::Molregno => row.molregno = value,
                    NumericField::AlogP => row.alogp = value,
                    NumericField::Psa => row.psa = value,
                    NumericField::MwFreebase => row.mw_freebase = value,
                    NumericField::MaxPhase => row.max_phase = value,
                    NumericField::Le => row.le = value,
                    NumericField::Lle => row.lle = value,
                }
            }
            rows.push(row);
        }
        Ok(Self { rows })
    }

    pub fn from_file(path: &str) -> Result<Self, ExplorerError> {
        let text = fs::read_to_string(path)?;
        Self::from_csv_text(&text)
    }

    pub fn rows(&self) -> &[CompoundRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Unique target names, in first-seen order.
    pub fn targets(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.target.clone())
            .unique()
            .collect()
    }

    /// The Target Group for a set of target names. The result borrows the
    /// dataset; nothing is copied or written back.
    pub fn rows_for_targets<'a>(&'a self, targets: &[String]) -> Vec<&'a CompoundRow> {
        self.rows
            .iter()
            .filter(|row| targets.iter().any(|t| *t == row.target))
            .collect()
    }

    pub fn target_chemblid(&self, target_name: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.target == target_name)
            .map(|row| row.target_chemblid.as_str())
    }
}

impl Default for Dataset {
    /// The bundled demo table; startup is fatal if it does not parse.
    fn default() -> Self {
        let text = include_str!("../assets/lle_data.csv");
        Self::from_csv_text(text).expect("Bundled lle_data.csv does not parse")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_CSV: &str = "\
target_chemblid,molregno,cmpd_chemblid,target,molecular_species,full_molformula,alogp,psa,mw_freebase,max_phase,le,lle,target_chemblid,molregno
CHEMBL202,1,CHEMBL1,Dihydrofolate reductase,BASE,C10H10N2O2,1.5,80.0,300.0,4,0.4,3.0,CHEMBL202,1
CHEMBL202,2,CHEMBL2,Dihydrofolate reductase,ACID,C11H12N2O3,2.5,90.0,310.0,0,0.3,2.0,CHEMBL202,2
CHEMBL203,3,CHEMBL3,Epidermal growth factor receptor erbB1,NEUTRAL,C12H14N4O2,3.5,100.0,320.0,1,0.2,1.0,CHEMBL203,3
";

    #[test]
    fn test_load_and_field_access() {
        let dataset = Dataset::from_csv_text(TEST_CSV).unwrap();
        assert_eq!(dataset.len(), 3);
        let row = &dataset.rows()[0];
        assert_eq!(row.cmpd_chemblid, "CHEMBL1");
        assert_eq!(row.numeric(NumericField::Le), 0.4);
        assert_eq!(row.numeric(NumericField::MaxPhase), 4.0);
        assert!(row.is_approved_drug());
        assert!(!dataset.rows()[1].is_approved_drug());
    }

    #[test]
    fn test_molregno_loads_as_numeric_field() {
        let dataset = Dataset::from_csv_text(TEST_CSV).unwrap();
        assert_eq!(dataset.rows()[0].numeric(NumericField::Molregno), 1.0);
        assert_eq!(dataset.rows()[2].numeric(NumericField::Molregno), 3.0);
    }

    #[test]
    fn test_duplicate_join_columns_are_ignored() {
        // First occurrence of target_chemblid wins over the trailing repeat.
        let dataset = Dataset::from_csv_text(TEST_CSV).unwrap();
        assert_eq!(dataset.rows()[2].target_chemblid, "CHEMBL203");
    }

    #[test]
    fn test_targets_first_seen_order() {
        let dataset = Dataset::from_csv_text(TEST_CSV).unwrap();
        assert_eq!(
            dataset.targets(),
            vec![
                "Dihydrofolate reductase".to_string(),
                "Epidermal growth factor receptor erbB1".to_string()
            ]
        );
    }

    #[test]
    fn test_rows_for_targets() {
        let dataset = Dataset::from_csv_text(TEST_CSV).unwrap();
        let group = dataset.rows_for_targets(&["Dihydrofolate reductase".to_string()]);
        assert_eq!(group.len(), 2);
        assert!(dataset
            .rows_for_targets(&["No such target".to_string()])
            .is_empty());
    }

    #[test]
    fn test_missing_column_fails_at_load() {
        let err = Dataset::from_csv_text("cmpd_chemblid,target\nCHEMBL1,DHFR\n").unwrap_err();
        assert!(matches!(err, ExplorerError::FieldNotFound(_)));
    }

    #[test]
    fn test_bad_numeric_cell_fails_at_load() {
        let bad = TEST_CSV.replace("1.5", "n/a");
        let err = Dataset::from_csv_text(&bad).unwrap_err();
        assert!(err.to_string().contains("alogp"));
    }

    #[test]
    fn test_bundled_dataset_parses() {
        let dataset = Dataset::default();
        assert!(!dataset.is_empty());
        assert!(dataset.targets().len() >= 2);
        // The compound shown on startup must exist in the bundled table.
        assert!(dataset
            .rows()
            .iter()
            .any(|row| row.cmpd_chemblid == "CHEMBL34259"));
    }

    #[test]
    fn test_from_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TEST_CSV.as_bytes()).unwrap();
        let dataset = Dataset::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert!(Dataset::from_file("/no/such/lle_data.csv").is_err());
    }
}
