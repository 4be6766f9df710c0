//! Numeric coercion of spreadsheet cells.

use serde::Serialize;
use sheetviz_sheet::CellValue;

/// Numbers extracted from a column, keyed by their row index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericColumn {
    pub points: Vec<(usize, f64)>,
    /// Non-empty cells that could not be read as a number.
    pub dropped: usize,
}

impl NumericColumn {
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|&(_, v)| v).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Non-fatal notice that a numeric column contained unusable cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnCoercionWarning {
    pub sheet: String,
    pub column: String,
    pub dropped: usize,
}

/// Read a cell as a finite number. Booleans, blanks and text that does not
/// parse are missing rather than errors.
#[must_use]
pub fn to_number(cell: &CellValue) -> Option<f64> {
    let value = match cell {
        CellValue::Int(i) => *i as f64,
        CellValue::Float(f) => *f,
        CellValue::String(s) => s.trim().parse::<f64>().ok()?,
        CellValue::Bool(_) | CellValue::Null => return None,
    };
    value.is_finite().then_some(value)
}

/// Coerce a column, counting the non-empty cells that were discarded.
#[must_use]
pub fn coerce_numeric<'a, I>(cells: I) -> NumericColumn
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let mut column = NumericColumn::default();
    for (row, cell) in cells.into_iter().enumerate() {
        match to_number(cell) {
            Some(value) => column.points.push((row, value)),
            None if !cell.is_empty() => column.dropped += 1,
            None => {}
        }
    }
    column
}
