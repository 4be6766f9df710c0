use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a cell value in a sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl CellValue {
    /// Build a numeric cell, keeping integral values as `Int`.
    ///
    /// Spreadsheet files store every number as a double; folding whole
    /// numbers back to `Int` keeps a written-then-read table equal to itself.
    #[must_use]
    pub fn number(f: f64) -> Self {
        // 2^63 is exactly representable; anything at or above it overflows i64
        const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
        if f.is_finite() && f.fract() == 0.0 && f >= -I64_BOUND && f < I64_BOUND {
            CellValue::Int(f as i64)
        } else {
            CellValue::Float(f)
        }
    }

    /// Null or an empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Get the value as a string
    #[must_use]
    pub fn as_str(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::String(s) => s.clone(),
        }
    }

    /// Stable text key used for row identity (duplicate detection).
    pub(crate) fn key(&self) -> String {
        match self {
            CellValue::Null => "N".to_string(),
            CellValue::Bool(b) => format!("B{b}"),
            CellValue::Int(i) => format!("I{i}"),
            CellValue::Float(f) => format!("F{f:?}"),
            CellValue::String(s) => format!("S{s}"),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Null
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, ""),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(fl) => write!(f, "{fl}"),
            CellValue::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Int(i64::from(i))
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_folds_integral_values() {
        assert_eq!(CellValue::number(42.0), CellValue::Int(42));
        assert_eq!(CellValue::number(-3.0), CellValue::Int(-3));
        assert_eq!(CellValue::number(2.5), CellValue::Float(2.5));
        assert!(matches!(CellValue::number(f64::NAN), CellValue::Float(_)));
        assert_eq!(CellValue::number(1e300), CellValue::Float(1e300));
    }

    #[test]
    fn test_is_empty() {
        assert!(CellValue::Null.is_empty());
        assert!(CellValue::from("").is_empty());
        assert!(!CellValue::from(" ").is_empty());
        assert!(!CellValue::Int(0).is_empty());
        assert!(!CellValue::Bool(false).is_empty());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(CellValue::Float(2.0).as_str(), "2");
        assert_eq!(CellValue::Null.as_str(), "");
    }

    #[test]
    fn test_key_distinguishes_types() {
        assert_ne!(CellValue::Int(1).key(), CellValue::from("1").key());
        assert_ne!(CellValue::Int(1).key(), CellValue::Float(1.5).key());
        assert_eq!(CellValue::from("a").key(), CellValue::from("a").key());
    }
}
