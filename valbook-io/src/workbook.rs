//! Workbook imports via calamine (`.xlsx`, `.xls`, `.xlsm`).
//!
//! The first row of a sheet is its header; cells under headers that match
//! the serialized field names feed the normalizer, other columns are
//! ignored.

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::{debug, info, warn};
use valbook_core::{RawField, RawRow, Record, normalize_row};

use crate::dedupe_first_wins;
use crate::error::ImportError;

/// Read one sheet of a workbook (the single-sheet import path).
///
/// With `sheet = None` and exactly one sheet, that sheet is read. With
/// several sheets and no name, `SheetChoiceRequired` carries the sheet
/// names so the caller can have the user pick exactly one.
pub fn read_workbook_sheet(
    path: &Path,
    sheet: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Vec<Record>, ImportError> {
    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names().to_vec();
    if names.is_empty() {
        return Err(ImportError::NoSheets);
    }

    let name = match sheet {
        Some(n) => {
            if !names.iter().any(|s| s == n) {
                return Err(ImportError::NoSuchSheet(n.to_string()));
            }
            n.to_string()
        }
        None if names.len() == 1 => names[0].clone(),
        None => return Err(ImportError::SheetChoiceRequired(names)),
    };

    let range = workbook.worksheet_range(&name)?;
    let records = sheet_records(&name, &range, now)?;
    info!(sheet = %name, count = records.len(), "imported worksheet");
    Ok(records)
}

/// Read every sheet of a workbook (the bulk import path).
///
/// Sheets that normalize to zero valid rows are dropped; at least one
/// sheet must qualify. Sheet order follows the workbook.
pub fn read_workbook_all(
    path: &Path,
    now: DateTime<Utc>,
) -> Result<IndexMap<String, Vec<Record>>, ImportError> {
    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names().to_vec();
    if names.is_empty() {
        return Err(ImportError::NoSheets);
    }

    let mut sheets = IndexMap::new();
    for name in names {
        let range = workbook.worksheet_range(&name)?;
        match sheet_records(&name, &range, now) {
            Ok(records) => {
                info!(sheet = %name, count = records.len(), "imported worksheet");
                sheets.insert(name, records);
            }
            Err(ImportError::EmptySheet(_)) | Err(ImportError::NoValidRecords) => {
                warn!(sheet = %name, "skipping sheet with no valid rows");
            }
            Err(e) => return Err(e),
        }
    }
    if sheets.is_empty() {
        return Err(ImportError::NoValidRecords);
    }
    Ok(sheets)
}

fn sheet_records(
    name: &str,
    range: &Range<Data>,
    now: DateTime<Utc>,
) -> Result<Vec<Record>, ImportError> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Err(ImportError::EmptySheet(name.to_string()));
    };
    let headers: Vec<String> = header.iter().map(|c| cell_text(c).trim().to_string()).collect();

    let mut data_rows = 0usize;
    let mut records = Vec::new();
    for cells in rows {
        data_rows += 1;
        let mut row = RawRow::new();
        for (header, cell) in headers.iter().zip(cells) {
            if header.is_empty() {
                continue;
            }
            row.insert(header.clone(), cell_to_field(cell));
        }
        match normalize_row(&row, now) {
            Some(rec) => records.push(rec),
            None => debug!(sheet = %name, "dropping row missing required fields"),
        }
    }

    if data_rows == 0 {
        return Err(ImportError::EmptySheet(name.to_string()));
    }
    if records.is_empty() {
        return Err(ImportError::NoValidRecords);
    }
    Ok(dedupe_first_wins(records))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn cell_to_field(cell: &Data) -> RawField {
    match cell {
        Data::Empty => RawField::Empty,
        Data::String(s) => RawField::Text(s.clone()),
        Data::Float(f) => RawField::Number(*f),
        Data::Int(i) => RawField::Number(*i as f64),
        Data::Bool(b) => RawField::Bool(*b),
        // Date cells surface as ISO text so the lenient instant parser
        // picks them up.
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => RawField::Text(naive.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => RawField::Empty,
        },
        Data::DateTimeIso(s) => RawField::Text(s.clone()),
        Data::DurationIso(s) => RawField::Text(s.clone()),
        Data::Error(_) => RawField::Empty,
    }
}
