//! Sheet normalization.
//!
//! [`clean`] turns a ragged, header-less [`RawSheet`] into a [`CleanedTable`].
//! The steps run in a fixed order, each on the output of the previous one:
//!
//! 1. drop columns, then rows, that are empty everywhere
//! 2. re-index the surviving rows densely
//! 3. promote row 0 to the header when none of its cells is empty
//! 4. when the first column carries a real name, drop rows with no value in it
//! 5. drop exact duplicate rows, keeping the first occurrence

use crate::cell::CellValue;
use crate::table::{is_placeholder_name, placeholder_name, CleanedTable, RawSheet};
use std::collections::HashSet;

/// Normalize one raw sheet. Never fails; an all-empty sheet yields an empty table.
#[must_use]
pub fn clean(raw: &RawSheet) -> CleanedTable {
    let kept_cols: Vec<usize> = (0..raw.width())
        .filter(|&col| raw.rows().iter().any(|row| !row[col].is_empty()))
        .collect();

    // Rows come out densely indexed; empty strings are folded into Null.
    let mut rows: Vec<Vec<CellValue>> = raw
        .rows()
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .map(|row| {
            kept_cols
                .iter()
                .map(|&col| match &row[col] {
                    cell if cell.is_empty() => CellValue::Null,
                    cell => cell.clone(),
                })
                .collect()
        })
        .collect();
    let mut columns: Vec<String> = kept_cols.iter().map(|&col| placeholder_name(col)).collect();

    let dropped_cols = raw.width() - kept_cols.len();
    let dropped_rows = raw.row_count() - rows.len();

    let promoted = !columns.is_empty()
        && rows
            .first()
            .is_some_and(|first| first.iter().all(|cell| !cell.is_empty()));
    if promoted {
        let header = rows.remove(0);
        columns = dedupe_names(header.iter().map(CellValue::as_str).collect());
    }

    let before_key = rows.len();
    if columns.first().is_some_and(|name| !is_placeholder_name(name)) {
        rows.retain(|row| !row[0].is_empty());
    }
    let missing_key = before_key - rows.len();

    let duplicates = remove_duplicate_rows(&mut rows);

    tracing::debug!(
        sheet = raw.name(),
        dropped_cols,
        dropped_rows,
        promoted,
        missing_key,
        duplicates,
        rows = rows.len(),
        cols = columns.len(),
        "cleaned sheet"
    );

    CleanedTable::from_parts(columns, rows)
}

/// Suffix repeated names with `.1`, `.2`, ... skipping suffixes already taken.
fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = names.iter().cloned().collect();
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        if seen.insert(name.clone()) {
            out.push(name);
            continue;
        }
        let mut n = 1usize;
        let unique = loop {
            let candidate = format!("{name}.{n}");
            if !taken.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        taken.insert(unique.clone());
        seen.insert(unique.clone());
        out.push(unique);
    }
    out
}

/// Returns the number of rows removed.
fn remove_duplicate_rows(rows: &mut Vec<Vec<CellValue>>) -> usize {
    let before = rows.len();
    let mut seen = HashSet::new();
    rows.retain(|row| {
        let mut key = String::new();
        for cell in row {
            key.push_str(&cell.key());
            key.push('\x1f');
        }
        seen.insert(key)
    });
    before - rows.len()
}
