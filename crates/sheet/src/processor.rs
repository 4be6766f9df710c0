use crate::book::Workbook;
use crate::clean::clean;
use crate::error::Result;
use crate::xlsx::{read_raw_sheets, write_workbook};
use std::path::{Path, PathBuf};

/// Suffix appended to the input's file stem for the cleaned copy.
pub const CLEANED_SUFFIX: &str = "_Cleaned";

/// Reads a spreadsheet, cleans every sheet, and writes cleaned copies.
#[derive(Debug, Clone)]
pub struct WorkbookProcessor {
    output_dir: PathBuf,
}

impl WorkbookProcessor {
    /// Create a processor that writes cleaned workbooks under `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        WorkbookProcessor {
            output_dir: output_dir.into(),
        }
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Read every sheet of `input` and clean it, keyed by the original sheet name.
    pub fn process_all(&self, input: &Path) -> Result<Workbook> {
        let raw_sheets = read_raw_sheets(input)?;
        let mut book = Workbook::with_source(input);

        for raw in &raw_sheets {
            let table = clean(raw);
            tracing::debug!(
                sheet = raw.name(),
                rows = table.row_count(),
                cols = table.col_count(),
                "sheet processed"
            );
            book.insert(raw.name(), table);
        }

        tracing::info!(
            input = %input.display(),
            sheets = book.len(),
            "workbook cleaned"
        );
        Ok(book)
    }

    /// Write the workbook to `output`, one worksheet per cleaned table.
    pub fn persist(&self, book: &Workbook, output: &Path) -> Result<()> {
        write_workbook(book, output)?;
        tracing::info!(output = %output.display(), "cleaned workbook written");
        Ok(())
    }

    /// `{output_dir}/{stem}_Cleaned.xlsx` for a given input file.
    #[must_use]
    pub fn cleaned_output_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "workbook".to_string());
        self.output_dir.join(format!("{stem}{CLEANED_SUFFIX}.xlsx"))
    }

    /// Clean `input` and save the cleaned copy, returning both.
    pub fn process_file(&self, input: &Path) -> Result<(Workbook, PathBuf)> {
        let book = self.process_all(input)?;
        let output = self.cleaned_output_path(input);
        self.persist(&book, &output)?;
        Ok((book, output))
    }
}
