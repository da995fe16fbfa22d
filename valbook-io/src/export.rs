//! Workbook and CSV exports.
//!
//! Dates render in the fixed dd/MM/yyyy display form; monetary fields are
//! written as raw numbers so spreadsheet formulas can recompute; the two
//! system timestamps stay RFC 3339 so a round-trip import preserves them.

use std::path::Path;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rust_xlsxwriter::Workbook;
use tracing::info;
use valbook_core::{FIELD_NAMES, Record, dates};

use crate::error::ExportError;

/// Default export file name, e.g. `valuation_records_2025-06-01.xlsx`.
pub fn default_file_name(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{prefix}_{}.xlsx", now.format("%Y-%m-%d"))
}

/// Write one worksheet per logical sheet, in insertion order, each with a
/// header row of the serialized field names.
pub fn write_workbook(
    path: &Path,
    sheets: &IndexMap<String, Vec<Record>>,
) -> Result<(), ExportError> {
    if sheets.values().all(Vec::is_empty) {
        return Err(ExportError::NoRecords);
    }

    let mut workbook = Workbook::new();
    for (name, records) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;
        for (col, field) in FIELD_NAMES.iter().enumerate() {
            sheet.write_string(0, col as u16, *field)?;
        }
        for (i, rec) in records.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write_string(row, 0, rec.hec_ref_no.as_str())?;
            sheet.write_string(row, 1, dates::format_fixed(&rec.date))?;
            sheet.write_string(row, 2, rec.client_name.as_str())?;
            sheet.write_string(row, 3, rec.address.as_str())?;
            sheet.write_string(row, 4, rec.contact_no.as_str())?;
            sheet.write_string(row, 5, rec.type_of_report.label())?;
            sheet.write_string(row, 6, rec.bank_name.as_str())?;
            sheet.write_string(row, 7, rec.branch.as_str())?;
            sheet.write_number(row, 8, rec.fmv_amount)?;
            sheet.write_number(row, 9, rec.dv_amount)?;
            sheet.write_number(row, 10, rec.bill_amount)?;
            sheet.write_number(row, 11, rec.advance_payment)?;
            sheet.write_number(row, 12, rec.paid_amount)?;
            sheet.write_string(row, 13, rec.payment_status.label())?;
            sheet.write_string(row, 14, rec.created_at.to_rfc3339())?;
            sheet.write_string(row, 15, rec.updated_at.to_rfc3339())?;
        }
    }
    workbook.save(path)?;
    info!(path = %path.display(), "exported workbook");
    Ok(())
}

/// Write the given records as CSV with the same header contract as the
/// workbook export.
pub fn write_csv(path: &Path, records: &[Record]) -> Result<(), ExportError> {
    if records.is_empty() {
        return Err(ExportError::NoRecords);
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(FIELD_NAMES)?;
    for rec in records {
        let row = [
            rec.hec_ref_no.clone(),
            dates::format_fixed(&rec.date),
            rec.client_name.clone(),
            rec.address.clone(),
            rec.contact_no.clone(),
            rec.type_of_report.label().to_string(),
            rec.bank_name.clone(),
            rec.branch.clone(),
            rec.fmv_amount.to_string(),
            rec.dv_amount.to_string(),
            rec.bill_amount.to_string(),
            rec.advance_payment.to_string(),
            rec.paid_amount.to_string(),
            rec.payment_status.label().to_string(),
            rec.created_at.to_rfc3339(),
            rec.updated_at.to_rfc3339(),
        ];
        writer.write_record(&row)?;
    }
    writer.flush()?;
    info!(path = %path.display(), count = records.len(), "exported CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;
    use valbook_core::RecordDraft;

    fn sample() -> Record {
        RecordDraft {
            hec_ref_no: "A".into(),
            client_name: "Acme".into(),
            date_text: "15/01/2025".into(),
            bill_amount: 1200.5,
            ..Default::default()
        }
        .build(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(), None)
    }

    #[test]
    fn csv_export_uses_the_field_name_contract() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&path, &[sample()]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), FIELD_NAMES.to_vec());

        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[0], "A");
        assert_eq!(&row[1], "15/01/2025");
        assert_eq!(&row[10], "1200.5"); // raw number, no grouping
    }

    #[test]
    fn exports_refuse_empty_collections() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            write_csv(&dir.path().join("e.csv"), &[]),
            Err(ExportError::NoRecords)
        ));
        let mut sheets = IndexMap::new();
        sheets.insert("Valuations".to_string(), Vec::new());
        assert!(matches!(
            write_workbook(&dir.path().join("e.xlsx"), &sheets),
            Err(ExportError::NoRecords)
        ));
    }

    #[test]
    fn default_file_name_carries_prefix_and_date() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(
            default_file_name("valuation_records", now),
            "valuation_records_2025-06-01.xlsx"
        );
    }
}
