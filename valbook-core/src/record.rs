//! Valuation record model.
//!
//! A `Record` is one valuation/billing entry, keyed by its HEC reference
//! number. Serialized field names are the external contract: JSON imports,
//! workbook headers and the persisted store file all use them verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::amount::non_negative;
use crate::dates;

/// Serialized field names, in export column order.
pub const FIELD_NAMES: [&str; 16] = [
    "hecRefNo",
    "date",
    "clientName",
    "address",
    "contactNo",
    "typeOfReport",
    "bankName",
    "branch",
    "fmvAmount",
    "dvAmount",
    "billAmount",
    "advancePayment",
    "paidAmount",
    "paymentStatus",
    "createdAt",
    "updatedAt",
];

/// Closed set of valuation report types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportType {
    #[serde(rename = "Preliminary valuation")]
    PreliminaryValuation,
    #[serde(rename = "Revaluation")]
    Revaluation,
    #[serde(rename = "Reconfirmation")]
    Reconfirmation,
    #[serde(rename = "Building estimation/valuation")]
    BuildingEstimation,
    #[default]
    #[serde(rename = "Final Report")]
    FinalReport,
    #[serde(rename = "Interim Report")]
    InterimReport,
}

impl ReportType {
    pub const ALL: [ReportType; 6] = [
        ReportType::PreliminaryValuation,
        ReportType::Revaluation,
        ReportType::Reconfirmation,
        ReportType::BuildingEstimation,
        ReportType::FinalReport,
        ReportType::InterimReport,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReportType::PreliminaryValuation => "Preliminary valuation",
            ReportType::Revaluation => "Revaluation",
            ReportType::Reconfirmation => "Reconfirmation",
            ReportType::BuildingEstimation => "Building estimation/valuation",
            ReportType::FinalReport => "Final Report",
            ReportType::InterimReport => "Interim Report",
        }
    }

    /// Exact label match against the closed set; anything else is `None`.
    pub fn from_label(label: &str) -> Option<ReportType> {
        Self::ALL.iter().copied().find(|t| t.label() == label)
    }
}

/// Whether the bill has been settled. Only the exact literal "Paid" counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "Paid")]
    Paid,
    #[default]
    #[serde(rename = "Not Paid")]
    NotPaid,
}

impl PaymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::NotPaid => "Not Paid",
        }
    }

    /// Total mapping: "Paid" maps to Paid, everything else to Not Paid.
    pub fn from_label(label: &str) -> PaymentStatus {
        if label == "Paid" {
            PaymentStatus::Paid
        } else {
            PaymentStatus::NotPaid
        }
    }
}

/// One valuation entry.
///
/// Timestamps are UTC instants; `created_at` never changes after the record
/// is first built, `updated_at` moves on every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique reference within a sheet (case-sensitive).
    #[serde(rename = "hecRefNo")]
    pub hec_ref_no: String,
    /// Valuation date, canonicalized to midnight UTC when entered as
    /// dd/MM/yyyy text.
    pub date: DateTime<Utc>,
    #[serde(rename = "clientName")]
    pub client_name: String,
    pub address: String,
    #[serde(rename = "contactNo")]
    pub contact_no: String,
    #[serde(rename = "typeOfReport")]
    pub type_of_report: ReportType,
    #[serde(rename = "bankName")]
    pub bank_name: String,
    pub branch: String,
    /// Fair market value. All monetary fields are non-negative.
    #[serde(rename = "fmvAmount")]
    pub fmv_amount: f64,
    /// Distress value.
    #[serde(rename = "dvAmount")]
    pub dv_amount: f64,
    #[serde(rename = "billAmount")]
    pub bill_amount: f64,
    #[serde(rename = "advancePayment")]
    pub advance_payment: f64,
    #[serde(rename = "paidAmount")]
    pub paid_amount: f64,
    #[serde(rename = "paymentStatus")]
    pub payment_status: PaymentStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Form-level values for building a record by hand (the Add/Update path).
///
/// Amounts are already numeric here; the date is still display text so the
/// fixed-format-first fallback chain applies exactly once, at build time.
#[derive(Debug, Clone, Default)]
pub struct RecordDraft {
    pub hec_ref_no: String,
    pub date_text: String,
    pub client_name: String,
    pub address: String,
    pub contact_no: String,
    pub type_of_report: ReportType,
    pub bank_name: String,
    pub branch: String,
    pub fmv_amount: f64,
    pub dv_amount: f64,
    pub bill_amount: f64,
    pub advance_payment: f64,
    pub paid_amount: f64,
    pub payment_status: PaymentStatus,
}

impl RecordDraft {
    /// Build a full record from form values.
    ///
    /// `base` is the record being replaced, if any: its `created_at` is
    /// carried over. Monetary fields clamp to zero, an unparsable date
    /// falls back to `now`, and `updated_at` is always `now`.
    pub fn build(self, now: DateTime<Utc>, base: Option<&Record>) -> Record {
        let created_at = base.map(|b| b.created_at).unwrap_or(now);
        let date = dates::normalize_date(&self.date_text, now);

        Record {
            hec_ref_no: self.hec_ref_no,
            date,
            client_name: self.client_name,
            address: self.address,
            contact_no: self.contact_no,
            type_of_report: self.type_of_report,
            bank_name: self.bank_name,
            branch: self.branch,
            fmv_amount: non_negative(self.fmv_amount),
            dv_amount: non_negative(self.dv_amount),
            bill_amount: non_negative(self.bill_amount),
            advance_payment: non_negative(self.advance_payment),
            paid_amount: non_negative(self.paid_amount),
            payment_status: self.payment_status,
            created_at,
            updated_at: now,
        }
    }
}
