//! Spreadsheet normalization for sheetviz
//!
//! Reads every sheet of a spreadsheet file, cleans each one into a
//! [`CleanedTable`] with uniquely named columns, and writes the cleaned
//! workbook back out.
//!
//! # Examples
//!
//! ## Cleaning a sheet
//!
//! ```
//! use sheetviz_sheet::{clean, CellValue, RawSheet};
//!
//! let table = clean(&RawSheet::from_data(vec![
//!     vec!["", "Product", "Qty"],
//!     vec!["", "pen", "3"],
//!     vec!["", "pen", "3"],
//!     vec!["", "ink", "5"],
//! ]));
//!
//! assert_eq!(table.columns(), ["Product", "Qty"]);
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(table.rows()[1][0], CellValue::from("ink"));
//! ```
//!
//! ## Processing a file
//!
//! ```no_run
//! use sheetviz_sheet::WorkbookProcessor;
//! use std::path::Path;
//!
//! let processor = WorkbookProcessor::new("uploads");
//! let (book, cleaned_path) = processor.process_file(Path::new("sales.xlsx")).unwrap();
//! println!("{} sheets -> {}", book.len(), cleaned_path.display());
//! ```

mod book;
mod cell;
mod clean;
mod error;
mod processor;
mod table;
mod xlsx;

/// Re-export workbook type.
pub use book::Workbook;
/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export the sheet cleaner.
pub use clean::clean;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export the workbook processor.
pub use processor::{WorkbookProcessor, CLEANED_SUFFIX};
/// Re-export table types.
pub use table::{is_placeholder_name, placeholder_name, CleanedTable, RawSheet};
/// Re-export spreadsheet I/O.
pub use xlsx::{read_raw_sheets, write_workbook};
