//! Derived views over the record collection: AND-ed filters plus a
//! single-key sort, recomputed from the full collection on every call.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::dates;
use crate::record::Record;

/// Filter values as entered: empty text means "no filter" on that
/// condition, matching the form fields this derives from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    /// Case-insensitive substring of the client name.
    pub client_name: String,
    /// Case-insensitive substring of the bank name.
    pub bank_name: String,
    /// Inclusive lower date bound, dd/MM/yyyy. Invalid text is an open side.
    pub from: String,
    /// Inclusive upper date bound, dd/MM/yyyy.
    pub to: String,
}

impl Filters {
    pub fn matches(&self, record: &Record) -> bool {
        let client = self.client_name.trim();
        if !client.is_empty()
            && !record
                .client_name
                .to_lowercase()
                .contains(&client.to_lowercase())
        {
            return false;
        }
        let bank = self.bank_name.trim();
        if !bank.is_empty()
            && !record
                .bank_name
                .to_lowercase()
                .contains(&bank.to_lowercase())
        {
            return false;
        }

        let from = self.from.trim();
        let to = self.to.trim();
        if from.is_empty() && to.is_empty() {
            return true;
        }
        dates::in_range(
            record.date,
            (!from.is_empty()).then_some(from),
            (!to.is_empty()).then_some(to),
        )
    }
}

/// Sortable record field. Parses from the serialized field names, so the
/// CLI's `--sort` vocabulary is the same as the import/export contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    HecRefNo,
    Date,
    ClientName,
    Address,
    ContactNo,
    TypeOfReport,
    BankName,
    Branch,
    FmvAmount,
    DvAmount,
    BillAmount,
    AdvancePayment,
    PaidAmount,
    PaymentStatus,
    CreatedAt,
    UpdatedAt,
}

impl SortKey {
    pub const ALL: [SortKey; 16] = [
        SortKey::HecRefNo,
        SortKey::Date,
        SortKey::ClientName,
        SortKey::Address,
        SortKey::ContactNo,
        SortKey::TypeOfReport,
        SortKey::BankName,
        SortKey::Branch,
        SortKey::FmvAmount,
        SortKey::DvAmount,
        SortKey::BillAmount,
        SortKey::AdvancePayment,
        SortKey::PaidAmount,
        SortKey::PaymentStatus,
        SortKey::CreatedAt,
        SortKey::UpdatedAt,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SortKey::HecRefNo => "hecRefNo",
            SortKey::Date => "date",
            SortKey::ClientName => "clientName",
            SortKey::Address => "address",
            SortKey::ContactNo => "contactNo",
            SortKey::TypeOfReport => "typeOfReport",
            SortKey::BankName => "bankName",
            SortKey::Branch => "branch",
            SortKey::FmvAmount => "fmvAmount",
            SortKey::DvAmount => "dvAmount",
            SortKey::BillAmount => "billAmount",
            SortKey::AdvancePayment => "advancePayment",
            SortKey::PaidAmount => "paidAmount",
            SortKey::PaymentStatus => "paymentStatus",
            SortKey::CreatedAt => "createdAt",
            SortKey::UpdatedAt => "updatedAt",
        }
    }

    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match self {
            SortKey::FmvAmount => a.fmv_amount.total_cmp(&b.fmv_amount),
            SortKey::DvAmount => a.dv_amount.total_cmp(&b.dv_amount),
            SortKey::BillAmount => a.bill_amount.total_cmp(&b.bill_amount),
            SortKey::AdvancePayment => a.advance_payment.total_cmp(&b.advance_payment),
            SortKey::PaidAmount => a.paid_amount.total_cmp(&b.paid_amount),
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortKey::HecRefNo => ci_cmp(&a.hec_ref_no, &b.hec_ref_no),
            SortKey::ClientName => ci_cmp(&a.client_name, &b.client_name),
            SortKey::Address => ci_cmp(&a.address, &b.address),
            SortKey::ContactNo => ci_cmp(&a.contact_no, &b.contact_no),
            SortKey::BankName => ci_cmp(&a.bank_name, &b.bank_name),
            SortKey::Branch => ci_cmp(&a.branch, &b.branch),
            SortKey::TypeOfReport => ci_cmp(a.type_of_report.label(), b.type_of_report.label()),
            SortKey::PaymentStatus => ci_cmp(a.payment_status.label(), b.payment_status.label()),
        }
    }
}

fn ci_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown sort key {s:?}"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortDir {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDir::Asc),
            "desc" => Ok(SortDir::Desc),
            other => Err(format!("unknown sort direction {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub key: SortKey,
    pub dir: SortDir,
}

/// Newest entries first, the listing default.
impl Default for Sort {
    fn default() -> Self {
        Sort {
            key: SortKey::CreatedAt,
            dir: SortDir::Desc,
        }
    }
}

/// Filter then sort, as one derived pass over the full collection.
///
/// Pure: identical inputs give identical output, and ties keep their
/// prior relative order (`sort_by` is stable).
pub fn apply_query<'a>(records: &'a [Record], filters: &Filters, sort: &Sort) -> Vec<&'a Record> {
    let mut view: Vec<&Record> = records.iter().filter(|r| filters.matches(r)).collect();
    view.sort_by(|a, b| {
        let ord = sort.key.compare(a, b);
        match sort.dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordDraft;
    use chrono::{DateTime, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn rec(ref_no: &str, client: &str, bank: &str, date: &str, bill: f64) -> Record {
        RecordDraft {
            hec_ref_no: ref_no.into(),
            client_name: client.into(),
            bank_name: bank.into(),
            date_text: date.into(),
            bill_amount: bill,
            ..Default::default()
        }
        .build(now(), None)
    }

    fn sample() -> Vec<Record> {
        vec![
            rec("R1", "Ace Holdings", "First Bank", "05/01/2025", 300.0),
            rec("R2", "Grace Estates", "Metro Bank", "20/01/2025", 100.0),
            rec("R3", "Bolt Ltd", "First Bank", "10/01/2025", 200.0),
            rec("R4", "ACE Motors", "Metro Bank", "15/02/2025", 500.0),
            rec("R5", "Crown Villas", "Union Bank", "28/01/2025", 400.0),
        ]
    }

    fn refs(view: &[&Record]) -> Vec<String> {
        view.iter().map(|r| r.hec_ref_no.clone()).collect()
    }

    #[test]
    fn combined_client_and_date_filter() {
        let records = sample();
        let filters = Filters {
            client_name: "ace".into(),
            from: "01/01/2025".into(),
            to: "31/01/2025".into(),
            ..Default::default()
        };
        let view = apply_query(&records, &filters, &Sort::default());
        let mut got = refs(&view);
        got.sort();
        // "Ace Holdings" and "Grace Estates" match in January; "ACE Motors"
        // matches the text but falls outside the range.
        assert_eq!(got, vec!["R1", "R2"]);
    }

    #[test]
    fn empty_filters_pass_everything_through() {
        let records = sample();
        let view = apply_query(&records, &Filters::default(), &Sort::default());
        assert_eq!(view.len(), records.len());
    }

    #[test]
    fn bank_filter_is_case_insensitive_substring() {
        let records = sample();
        let filters = Filters {
            bank_name: "metro".into(),
            ..Default::default()
        };
        let view = apply_query(&records, &filters, &Sort::default());
        assert!(view.iter().all(|r| r.bank_name == "Metro Bank"));
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn invalid_date_bound_filters_nothing_on_that_side() {
        let records = sample();
        let filters = Filters {
            from: "garbage".into(),
            to: "31/01/2025".into(),
            ..Default::default()
        };
        let view = apply_query(&records, &filters, &Sort::default());
        // Only R4 (February) is excluded.
        assert_eq!(view.len(), 4);
    }

    #[test]
    fn numeric_ascending_sort_is_non_decreasing() {
        let records = sample();
        let sort = Sort {
            key: SortKey::BillAmount,
            dir: SortDir::Asc,
        };
        let view = apply_query(&records, &Filters::default(), &sort);
        let bills: Vec<f64> = view.iter().map(|r| r.bill_amount).collect();
        assert!(bills.windows(2).all(|w| w[0] <= w[1]), "not sorted: {bills:?}");
    }

    #[test]
    fn date_sort_orders_by_instant() {
        let records = sample();
        let sort = Sort {
            key: SortKey::Date,
            dir: SortDir::Asc,
        };
        let view = apply_query(&records, &Filters::default(), &sort);
        assert_eq!(refs(&view), vec!["R1", "R3", "R2", "R5", "R4"]);
    }

    #[test]
    fn string_sort_ignores_case() {
        let records = sample();
        let sort = Sort {
            key: SortKey::ClientName,
            dir: SortDir::Asc,
        };
        let view = apply_query(&records, &Filters::default(), &sort);
        // "ACE Motors" sorts with "Ace Holdings", not before all lowercase.
        assert_eq!(refs(&view), vec!["R1", "R4", "R3", "R5", "R2"]);
    }

    #[test]
    fn query_is_pure_and_idempotent() {
        let records = sample();
        let filters = Filters {
            bank_name: "bank".into(),
            ..Default::default()
        };
        let sort = Sort {
            key: SortKey::BillAmount,
            dir: SortDir::Desc,
        };
        let a = refs(&apply_query(&records, &filters, &sort));
        let b = refs(&apply_query(&records, &filters, &sort));
        assert_eq!(a, b);
    }

    #[test]
    fn sort_keys_parse_from_serialized_field_names() {
        assert_eq!("billAmount".parse::<SortKey>(), Ok(SortKey::BillAmount));
        assert_eq!("createdat".parse::<SortKey>(), Ok(SortKey::CreatedAt));
        assert!("bogus".parse::<SortKey>().is_err());
        assert_eq!("asc".parse::<SortDir>(), Ok(SortDir::Asc));
        assert!("up".parse::<SortDir>().is_err());
    }
}
