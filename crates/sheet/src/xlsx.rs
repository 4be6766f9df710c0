use crate::book::Workbook;
use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::table::RawSheet;
use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Worksheet;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::number(*f),
        Data::String(s) => CellValue::String(s.clone()),
        // Excel serial date (days since 1899-12-30)
        Data::DateTime(dt) => CellValue::number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

/// Read every sheet of a spreadsheet file, in workbook order.
///
/// Accepts any format calamine detects from the extension (xlsx, xlsm,
/// xlsb, xls, ods). Anything unreadable is a [`SheetError::Format`].
pub fn read_raw_sheets<P: AsRef<Path>>(path: P) -> Result<Vec<RawSheet>> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path).map_err(|e| SheetError::format(path, e))?;

    let sheet_names = workbook.sheet_names();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for sheet_name in sheet_names {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| SheetError::format(path, format!("sheet '{sheet_name}': {e}")))?;

        // calamine trims the range to its used area; restore the leading
        // offset so column positions match the file.
        let (row_offset, col_offset) = range
            .start()
            .map_or((0, 0), |(row, col)| (row as usize, col as usize));

        let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); row_offset];
        for row in range.rows() {
            let mut row_data = vec![CellValue::Null; col_offset];
            row_data.extend(row.iter().map(data_to_cell_value));
            rows.push(row_data);
        }

        sheets.push(RawSheet::new(&sheet_name, rows));
    }

    Ok(sheets)
}

/// Write every table as one worksheet: a header row, then data rows.
///
/// The file is assembled in memory and renamed into place, so a reader never
/// sees a partially written workbook. Missing parent directories are created.
pub fn write_workbook<P: AsRef<Path>>(book: &Workbook, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut workbook = rust_xlsxwriter::Workbook::new();

    for (name, table) in book.sheets() {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(name)
            .map_err(|e| SheetError::write(path, e))?;

        for (col_idx, column) in table.columns().iter().enumerate() {
            let col_num = column_number(path, col_idx)?;
            worksheet
                .write_string(0, col_num, column)
                .map_err(|e| SheetError::write(path, e))?;
        }

        for (row_idx, row) in table.rows().iter().enumerate() {
            let row_num = u32::try_from(row_idx + 1)
                .map_err(|_| SheetError::write(path, "Row index overflow"))?;
            for (col_idx, cell) in row.iter().enumerate() {
                write_cell(worksheet, row_num, column_number(path, col_idx)?, cell)
                    .map_err(|e| SheetError::write(path, e))?;
            }
        }
    }

    let bytes = workbook
        .save_to_buffer()
        .map_err(|e| SheetError::write(path, e))?;
    write_atomic(path, &bytes)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = tempfile::Builder::new()
        .prefix(".")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| SheetError::Io(e.error))?;
    Ok(())
}

fn column_number(path: &Path, col_idx: usize) -> Result<u16> {
    u16::try_from(col_idx).map_err(|_| SheetError::write(path, "Column index overflow"))
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
) -> std::result::Result<(), rust_xlsxwriter::XlsxError> {
    match cell {
        CellValue::Null => {} // Leave empty
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        CellValue::Int(i) => {
            // Stored as f64: exact only up to 2^53 in magnitude.
            worksheet.write_number(row, col, *i as f64)?;
        }
        CellValue::Float(f) => {
            worksheet.write_number(row, col, *f)?;
        }
        CellValue::String(s) => {
            worksheet.write_string(row, col, s)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean;
    use tempfile::tempdir;

    #[test]
    fn test_integers_round_trip_up_to_two_pow_53() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ints.xlsx");
        let limit = 1_i64 << 53;

        let mut book = Workbook::new();
        book.insert(
            "Ints",
            clean(&RawSheet::new(
                "Ints",
                vec![
                    vec!["n".into()],
                    vec![CellValue::Int(limit)],
                    vec![CellValue::Int(-limit)],
                ],
            )),
        );
        write_workbook(&book, &path).unwrap();

        let sheets = read_raw_sheets(&path).unwrap();
        let rows = sheets[0].rows();
        assert_eq!(rows[1][0], CellValue::Int(limit));
        assert_eq!(rows[2][0], CellValue::Int(-limit));
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.xlsx");

        let mut book = Workbook::new();
        book.insert(
            "Numbers",
            clean(&RawSheet::new(
                "Numbers",
                vec![
                    vec!["n".into(), "label".into(), "ok".into()],
                    vec![CellValue::Int(1), "one".into(), CellValue::Bool(true)],
                    vec![CellValue::Float(2.5), CellValue::Null, CellValue::Bool(false)],
                ],
            )),
        );
        book.insert("Letters", clean(&RawSheet::from_data(vec![vec!["a", "b"]])));

        write_workbook(&book, &path).unwrap();
        let sheets = read_raw_sheets(&path).unwrap();

        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].name(), "Numbers");
        assert_eq!(sheets[1].name(), "Letters");

        let numbers = sheets[0].rows();
        assert_eq!(numbers[0][0], CellValue::from("n"));
        assert_eq!(numbers[1][0], CellValue::Int(1));
        assert_eq!(numbers[2][0], CellValue::Float(2.5));
        assert_eq!(numbers[2][1], CellValue::Null);
        assert_eq!(numbers[1][2], CellValue::Bool(true));
    }

    #[test]
    fn test_leading_blank_area_is_preserved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("offset.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(2, 1, "Name").unwrap();
        worksheet.write_string(3, 1, "pen").unwrap();
        workbook.save(&path).unwrap();

        let sheets = read_raw_sheets(&path).unwrap();
        let rows = sheets[0].rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2][1], CellValue::from("Name"));
        assert!(rows[0].iter().all(|cell| *cell == CellValue::Null));
    }

    #[test]
    fn test_unreadable_input_is_format_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.xlsx");
        std::fs::write(&path, b"definitely not a zip archive").unwrap();

        let err = read_raw_sheets(&path).unwrap_err();
        match err {
            SheetError::Format { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
