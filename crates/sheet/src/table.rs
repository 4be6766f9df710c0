use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use serde::Serialize;

const PLACEHOLDER_PREFIX: &str = "Unnamed: ";

/// Label given to a column that has no header of its own.
#[must_use]
pub fn placeholder_name(index: usize) -> String {
    format!("{PLACEHOLDER_PREFIX}{index}")
}

/// Whether a column name is empty or a generated placeholder.
#[must_use]
pub fn is_placeholder_name(name: &str) -> bool {
    name.is_empty() || name.starts_with(PLACEHOLDER_PREFIX)
}

/// A sheet exactly as read from a spreadsheet: rows of cells, no header.
///
/// Ragged input is padded with `Null` so every row has the same width.
/// Column `i` is labelled [`placeholder_name`]`(i)` until a header is promoted.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    name: String,
    rows: Vec<Vec<CellValue>>,
}

impl RawSheet {
    /// Create a raw sheet, padding short rows with nulls.
    #[must_use]
    pub fn new(name: &str, mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, CellValue::Null);
        }
        RawSheet {
            name: name.to_string(),
            rows,
        }
    }

    /// Create an unnamed raw sheet from a 2D vector of values
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(data: Vec<Vec<T>>) -> Self {
        let rows = data
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        Self::new("Sheet1", rows)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

/// A normalized sheet: uniquely named columns over row-major data.
///
/// Produced only by [`crate::clean`]; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl CleanedTable {
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == columns.len()));
        CleanedTable { columns, rows }
    }

    /// Column names in order
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows (the header is not included)
    #[must_use]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    /// True when the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the column index by name
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of one column, in row order.
    pub fn column_by_name(&self, name: &str) -> Result<Vec<&CellValue>> {
        let index = self
            .column_index(name)
            .ok_or_else(|| SheetError::ColumnNotFound {
                name: name.to_string(),
            })?;
        Ok(self.rows.iter().map(|row| &row[index]).collect())
    }

    /// The table as it lands in a spreadsheet: a header row, then the data.
    #[must_use]
    pub fn to_raw(&self, name: &str) -> RawSheet {
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        if !self.columns.is_empty() {
            rows.push(
                self.columns
                    .iter()
                    .map(|c| CellValue::String(c.clone()))
                    .collect(),
            );
        }
        rows.extend(self.rows.iter().cloned());
        RawSheet::new(name, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_sheet_pads_ragged_rows() {
        let raw = RawSheet::new(
            "Data",
            vec![vec![CellValue::Int(1)], vec![CellValue::Int(2), CellValue::Int(3)]],
        );
        assert_eq!(raw.width(), 2);
        assert_eq!(raw.rows()[0][1], CellValue::Null);
        assert_eq!(raw.name(), "Data");
    }

    #[test]
    fn test_placeholder_names() {
        assert_eq!(placeholder_name(3), "Unnamed: 3");
        assert!(is_placeholder_name("Unnamed: 0"));
        assert!(is_placeholder_name(""));
        assert!(!is_placeholder_name("Product"));
    }

    #[test]
    fn test_column_by_name() {
        let table = CleanedTable::from_parts(
            vec!["a".into(), "b".into()],
            vec![
                vec![CellValue::Int(1), CellValue::from("x")],
                vec![CellValue::Int(2), CellValue::from("y")],
            ],
        );
        let b = table.column_by_name("b").unwrap();
        assert_eq!(b, vec![&CellValue::from("x"), &CellValue::from("y")]);
        assert!(matches!(
            table.column_by_name("c"),
            Err(SheetError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_to_raw_prepends_header() {
        let table = CleanedTable::from_parts(vec!["a".into()], vec![vec![CellValue::Int(1)]]);
        let raw = table.to_raw("S");
        assert_eq!(raw.row_count(), 2);
        assert_eq!(raw.rows()[0][0], CellValue::from("a"));
    }
}
