//! Total normalization of arbitrary imported rows into records.
//!
//! Import sources (JSON arrays, workbook sheets) reduce every cell to a
//! `RawField` scalar; `normalize_row` then either produces a valid `Record`
//! or `None`, never an error. Malformed values degrade to defaults so one
//! bad cell cannot sink a whole import batch.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::amount::{non_negative, parse_amount};
use crate::dates;
use crate::record::{PaymentStatus, Record, ReportType};

/// One imported cell, reduced to the scalar shapes imports can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum RawField {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

/// An imported row: serialized field name to raw value, insertion-ordered.
/// Keys that are not record fields are carried but never consulted.
pub type RawRow = IndexMap<String, RawField>;

impl RawField {
    /// Display-string coercion. Numbers and bools render to their text
    /// form first, so a numeric reference cell still imports as a
    /// reference.
    fn to_text(&self) -> String {
        match self {
            RawField::Text(s) => s.clone(),
            RawField::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            RawField::Bool(b) => b.to_string(),
            RawField::Empty => String::new(),
        }
    }

    /// Non-negative monetary coercion: text goes through `parse_amount`,
    /// numbers clamp, anything else is 0.
    fn to_amount(&self) -> f64 {
        match self {
            RawField::Text(s) => parse_amount(s),
            RawField::Number(n) => non_negative(*n),
            RawField::Bool(_) | RawField::Empty => 0.0,
        }
    }
}

fn text(row: &RawRow, key: &str) -> String {
    row.get(key)
        .map(|f| f.to_text().trim().to_string())
        .unwrap_or_default()
}

fn amount(row: &RawRow, key: &str) -> f64 {
    row.get(key).map(RawField::to_amount).unwrap_or(0.0)
}

/// Normalize one imported row into a record, or `None` when the required
/// fields (`hecRefNo`, `clientName`) are missing after trimming.
///
/// Total for any input row: dates fall back to `now`, unknown report types
/// to Final Report, anything but the literal "Paid" to Not Paid, amounts
/// to 0, and `createdAt`/`updatedAt` each keep their supplied value only
/// if it parses as an instant.
pub fn normalize_row(row: &RawRow, now: DateTime<Utc>) -> Option<Record> {
    let hec_ref_no = text(row, "hecRefNo");
    let client_name = text(row, "clientName");
    if hec_ref_no.is_empty() || client_name.is_empty() {
        return None;
    }

    Some(Record {
        hec_ref_no,
        date: dates::normalize_date(&text(row, "date"), now),
        client_name,
        address: text(row, "address"),
        contact_no: text(row, "contactNo"),
        type_of_report: ReportType::from_label(&text(row, "typeOfReport")).unwrap_or_default(),
        bank_name: text(row, "bankName"),
        branch: text(row, "branch"),
        fmv_amount: amount(row, "fmvAmount"),
        dv_amount: amount(row, "dvAmount"),
        bill_amount: amount(row, "billAmount"),
        advance_payment: amount(row, "advancePayment"),
        paid_amount: amount(row, "paidAmount"),
        payment_status: PaymentStatus::from_label(&text(row, "paymentStatus")),
        created_at: dates::parse_instant(&text(row, "createdAt")).unwrap_or(now),
        updated_at: dates::parse_instant(&text(row, "updatedAt")).unwrap_or(now),
    })
}
