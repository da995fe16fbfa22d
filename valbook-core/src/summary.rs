//! Totals over a (usually filtered) view of records.

use crate::record::Record;

/// Sums of the three headline amounts, shown under every listing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub fmv: f64,
    pub dv: f64,
    pub bill: f64,
}

impl Totals {
    pub fn of<'a, I>(rows: I) -> Totals
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut totals = Totals::default();
        for rec in rows {
            totals.fmv += rec.fmv_amount;
            totals.dv += rec.dv_amount;
            totals.bill += rec.bill_amount;
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordDraft;
    use chrono::{TimeZone, Utc};

    #[test]
    fn sums_the_headline_amounts() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let records: Vec<Record> = [(100.0, 80.0, 10.0), (50.0, 40.0, 5.0)]
            .iter()
            .enumerate()
            .map(|(i, (fmv, dv, bill))| {
                RecordDraft {
                    hec_ref_no: format!("R{i}"),
                    client_name: "Acme".into(),
                    fmv_amount: *fmv,
                    dv_amount: *dv,
                    bill_amount: *bill,
                    ..Default::default()
                }
                .build(now, None)
            })
            .collect();

        let totals = Totals::of(&records);
        assert_eq!(totals.fmv, 150.0);
        assert_eq!(totals.dv, 120.0);
        assert_eq!(totals.bill, 15.0);

        let empty: Vec<Record> = Vec::new();
        assert_eq!(Totals::of(&empty), Totals::default());
    }
}
