//! Loading and holding the constituency impact table.
//!
//! The dataset is precomputed by the modeling pipeline and shipped as a
//! static `constituency.csv`: one row per modeled household record per
//! projection year, keyed by constituency. It is fetched once per session
//! and read-only thereafter.
//!
//! A failed fetch is not fatal: [`ImpactDataset::load_or_empty`] logs the
//! problem and hands back an empty dataset, which downstream renders as
//! "no data yet" rather than an error.

use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::constituency::{code_is_well_formed, ConstituencyRef};
use crate::error::{BudgetResult, DataError};
use crate::table::{Row, Table};

/// Required identity columns.
pub const COL_CONSTITUENCY_CODE: &str = "constituency_code";
/// Display-name column.
pub const COL_CONSTITUENCY_NAME: &str = "constituency_name";
/// Projection-year column.
pub const COL_YEAR: &str = "year";
/// Family-type bucket column.
pub const COL_FAMILY_TYPE: &str = "family_type";
/// Income-decile bucket column (1–10).
pub const COL_INCOME_DECILE: &str = "income_decile";
/// Gross household income column.
pub const COL_HOUSEHOLD_INCOME: &str = "household_income";

const REQUIRED_COLUMNS: [&str; 2] = [COL_CONSTITUENCY_CODE, COL_CONSTITUENCY_NAME];

/// Stable content hash of the raw dataset bytes.
///
/// Lets consumers detect dataset replacement cheaply without comparing rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    fn of(bytes: &[u8]) -> Self {
        Self(*blake3::hash(bytes).as_bytes())
    }

    /// Lowercase hex rendering of the hash.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// The in-memory impact table plus derived constituency list.
#[derive(Debug, Clone)]
pub struct ImpactDataset {
    table: Table,
    constituencies: Vec<ConstituencyRef>,
    fingerprint: Fingerprint,
    loaded_at: DateTime<Utc>,
}

impl ImpactDataset {
    /// Parses a dataset from raw CSV text.
    ///
    /// # Errors
    ///
    /// Returns `DataError::EmptyInput` for empty input and
    /// `DataError::MissingColumn` if a required identity column is absent
    /// from the header.
    pub fn from_csv_str(text: &str) -> BudgetResult<Self> {
        let table = Table::parse(text)?;

        for column in REQUIRED_COLUMNS {
            if !table.has_column(column) {
                return Err(DataError::MissingColumn {
                    column: column.to_string(),
                }
                .into());
            }
        }

        let constituencies = derive_constituencies(&table.rows);

        Ok(Self {
            table,
            constituencies,
            fingerprint: Fingerprint::of(text.as_bytes()),
            loaded_at: Utc::now(),
        })
    }

    /// Reads and parses a dataset from any reader.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Io` on read failure, plus everything
    /// [`Self::from_csv_str`] can return.
    pub fn from_reader(mut reader: impl Read) -> BudgetResult<Self> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(DataError::from)?;
        Self::from_csv_str(&text)
    }

    /// Reads and parses a dataset file.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Io` if the file cannot be read, plus everything
    /// [`Self::from_csv_str`] can return.
    pub fn from_path(path: impl AsRef<Path>) -> BudgetResult<Self> {
        let text = fs::read_to_string(path).map_err(DataError::from)?;
        Self::from_csv_str(&text)
    }

    /// Loads a dataset file, degrading to an empty dataset on failure.
    ///
    /// The failure is logged to the operator console; selectors downstream
    /// render empty rather than crashing.
    #[must_use]
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_path(path) {
            Ok(dataset) => dataset,
            Err(err) => {
                log::warn!("failed to load dataset {}: {err}", path.display());
                Self::empty()
            }
        }
    }

    /// An empty dataset ("no data yet").
    #[must_use]
    pub fn empty() -> Self {
        Self {
            table: Table {
                headers: Vec::new(),
                rows: Vec::new(),
            },
            constituencies: Vec::new(),
            fingerprint: Fingerprint::of(b""),
            loaded_at: Utc::now(),
        }
    }

    /// All parsed rows, in file order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.table.rows
    }

    /// De-duplicated constituencies, ordered lexicographically by name.
    #[must_use]
    pub fn constituencies(&self) -> &[ConstituencyRef] {
        &self.constituencies
    }

    /// Looks up a constituency by code.
    #[must_use]
    pub fn constituency_by_code(&self, code: &str) -> Option<&ConstituencyRef> {
        self.constituencies.iter().find(|c| c.code == code)
    }

    /// Content fingerprint of the raw bytes this dataset was parsed from.
    #[must_use]
    pub const fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// When this dataset was loaded.
    #[must_use]
    pub const fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.rows.len()
    }

    /// True if the dataset holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.rows.is_empty()
    }
}

/// One entry per distinct code, first-seen name wins, sorted by name.
fn derive_constituencies(rows: &[Row]) -> Vec<ConstituencyRef> {
    let mut seen = std::collections::BTreeMap::new();

    for row in rows {
        let Some(code) = row.get(COL_CONSTITUENCY_CODE) else {
            continue;
        };
        if code.is_empty() || seen.contains_key(code) {
            continue;
        }
        if !code_is_well_formed(code) {
            log::warn!("constituency code '{code}' is not a well-formed GSS code");
        }
        let name = row.get(COL_CONSTITUENCY_NAME).unwrap_or(code);
        seen.insert(code.to_string(), name.to_string());
    }

    let mut list: Vec<ConstituencyRef> = seen
        .into_iter()
        .map(|(code, name)| ConstituencyRef::new(code, name))
        .collect();
    list.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code)));
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
constituency_code,constituency_name,year,family_type,income_decile,household_income,two_child_limit
E14001234,Holborn and St Pancras,2029,couple_with_children,4,31000,520.0
E14000530,Aldershot,2029,single,2,18000,0.0
E14001234,Holborn and St Pancras,2029,single,3,24000,0.0
";

    #[test]
    fn test_constituencies_deduplicated_and_sorted_by_name() {
        let dataset = ImpactDataset::from_csv_str(SAMPLE).unwrap();
        let names: Vec<_> = dataset
            .constituencies()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Aldershot", "Holborn and St Pancras"]);
        assert_eq!(dataset.len(), 3);
    }

    #[test]
    fn test_missing_required_column_is_an_error() {
        let result = ImpactDataset::from_csv_str("constituency_code,year\nE14001234,2029\n");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("constituency_name"));
    }

    #[test]
    fn test_lookup_by_code() {
        let dataset = ImpactDataset::from_csv_str(SAMPLE).unwrap();
        let found = dataset.constituency_by_code("E14001234").unwrap();
        assert_eq!(found.name, "Holborn and St Pancras");
        assert!(dataset.constituency_by_code("E99999999").is_none());
    }

    #[test]
    fn test_load_or_empty_degrades_on_missing_file() {
        let dataset = ImpactDataset::load_or_empty("/nonexistent/constituency.csv");
        assert!(dataset.is_empty());
        assert!(dataset.constituencies().is_empty());
    }

    #[test]
    fn test_from_path_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("constituency.csv");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let dataset = ImpactDataset::from_path(&path).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(
            dataset.fingerprint(),
            ImpactDataset::from_csv_str(SAMPLE).unwrap().fingerprint()
        );
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = ImpactDataset::from_csv_str(SAMPLE).unwrap();
        let mut changed = SAMPLE.to_string();
        changed.push_str("E14000001,Altrincham and Sale West,2029,single,5,40000,0.0\n");
        let b = ImpactDataset::from_csv_str(&changed).unwrap();

        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().to_hex().len(), 64);
    }
}
