use crate::error::{Result, SheetError};
use crate::table::CleanedTable;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Cleaned sheets of one spreadsheet file, in workbook order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    source: Option<PathBuf>,
    sheets: IndexMap<String, CleanedTable>,
}

impl Workbook {
    /// Create a new empty workbook
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty workbook remembering the file it was read from
    #[must_use]
    pub fn with_source(path: &Path) -> Self {
        Workbook {
            source: Some(path.to_path_buf()),
            sheets: IndexMap::new(),
        }
    }

    /// The file this workbook was read from, if any
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Add or replace a sheet, returning the previous table under that name.
    pub fn insert(&mut self, name: &str, table: CleanedTable) -> Option<CleanedTable> {
        self.sheets.insert(name.to_string(), table)
    }

    /// Get a sheet by name
    pub fn get(&self, name: &str) -> Result<&CleanedTable> {
        self.sheets.get(name).ok_or_else(|| SheetError::SheetNotFound {
            name: name.to_string(),
        })
    }

    /// Get all sheet names in order
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    /// Iterate `(name, table)` pairs in order
    pub fn sheets(&self) -> impl Iterator<Item = (&str, &CleanedTable)> {
        self.sheets.iter().map(|(name, table)| (name.as_str(), table))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Compare sheet contents only, ignoring where each workbook came from.
    #[must_use]
    pub fn same_sheets(&self, other: &Workbook) -> bool {
        self.sheets == other.sheets
    }
}
