//! Merge-mode imports: fold incoming records into an existing collection,
//! consulting the caller once per reference collision.

use std::collections::HashSet;

use tracing::debug;
use valbook_core::Record;

/// Answer for one reference collision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Resolution {
    /// Leave the existing record as-is (the default answer).
    #[default]
    Skip,
    /// Replace the existing record with the incoming one, wholesale.
    Overwrite,
    /// Keep both; the incoming copy gets a suffixed reference.
    KeepBoth,
}

/// Asked once per collision. The CLI prompts the user; tests pass
/// closures.
pub trait ResolveConflict {
    fn resolve(&mut self, existing: &Record, incoming: &Record) -> Resolution;
}

impl<F> ResolveConflict for F
where
    F: FnMut(&Record, &Record) -> Resolution,
{
    fn resolve(&mut self, existing: &Record, incoming: &Record) -> Resolution {
        self(existing, incoming)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub added: usize,
    pub overwritten: usize,
    pub skipped: usize,
    pub renamed: usize,
}

/// Merge `incoming` into `existing`. Pure apart from the resolver calls:
/// non-colliding records append in input order, collisions follow the
/// resolver's answer.
pub fn merge_records(
    existing: Vec<Record>,
    incoming: Vec<Record>,
    resolver: &mut dyn ResolveConflict,
) -> (Vec<Record>, MergeSummary) {
    let mut out = existing;
    let mut summary = MergeSummary::default();

    for mut rec in incoming {
        let Some(pos) = out.iter().position(|r| r.hec_ref_no == rec.hec_ref_no) else {
            out.push(rec);
            summary.added += 1;
            continue;
        };
        match resolver.resolve(&out[pos], &rec) {
            Resolution::Skip => {
                debug!(ref_no = %rec.hec_ref_no, "skipping colliding record");
                summary.skipped += 1;
            }
            Resolution::Overwrite => {
                out[pos] = rec;
                summary.overwritten += 1;
            }
            Resolution::KeepBoth => {
                rec.hec_ref_no = copy_ref(&rec.hec_ref_no, &out);
                out.push(rec);
                summary.renamed += 1;
            }
        }
    }
    (out, summary)
}

/// First free suffixed reference: `<ref>-copy`, then `<ref>-copy-2`,
/// `<ref>-copy-3`, … against the evolving collection.
fn copy_ref(base: &str, existing: &[Record]) -> String {
    let taken: HashSet<&str> = existing.iter().map(|r| r.hec_ref_no.as_str()).collect();
    let first = format!("{base}-copy");
    if !taken.contains(first.as_str()) {
        return first;
    }
    let mut counter = 2u32;
    loop {
        let candidate = format!("{base}-copy-{counter}");
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use valbook_core::RecordDraft;

    fn rec(ref_no: &str, bill: f64) -> Record {
        RecordDraft {
            hec_ref_no: ref_no.into(),
            client_name: "Acme".into(),
            bill_amount: bill,
            ..Default::default()
        }
        .build(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(), None)
    }

    #[test]
    fn non_colliding_records_append() {
        let mut always_skip = |_: &Record, _: &Record| Resolution::Skip;
        let (merged, summary) =
            merge_records(vec![rec("A", 100.0)], vec![rec("B", 200.0)], &mut always_skip);
        assert_eq!(merged.len(), 2);
        assert_eq!(summary.added, 1);
        assert_eq!(summary.skipped, 0);
    }

    #[test]
    fn skip_keeps_the_existing_record() {
        let mut always_skip = |_: &Record, _: &Record| Resolution::Skip;
        let (merged, summary) =
            merge_records(vec![rec("A", 100.0)], vec![rec("A", 200.0)], &mut always_skip);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].bill_amount, 100.0);
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn overwrite_replaces_in_place() {
        let mut always_overwrite = |_: &Record, _: &Record| Resolution::Overwrite;
        let (merged, summary) = merge_records(
            vec![rec("A", 100.0), rec("B", 50.0)],
            vec![rec("A", 200.0)],
            &mut always_overwrite,
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].hec_ref_no, "A");
        assert_eq!(merged[0].bill_amount, 200.0);
        assert_eq!(summary.overwritten, 1);
    }

    #[test]
    fn keep_both_appends_a_suffixed_copy() {
        let mut keep_both = |_: &Record, _: &Record| Resolution::KeepBoth;
        let (merged, summary) =
            merge_records(vec![rec("A", 100.0)], vec![rec("A", 200.0)], &mut keep_both);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].bill_amount, 100.0);
        assert_eq!(merged[1].hec_ref_no, "A-copy");
        assert_eq!(merged[1].bill_amount, 200.0);
        assert_eq!(summary.renamed, 1);
    }

    #[test]
    fn copy_suffix_deduplicates_with_a_counter() {
        let mut keep_both = |_: &Record, _: &Record| Resolution::KeepBoth;
        let (merged, _) = merge_records(
            vec![rec("A", 1.0), rec("A-copy", 2.0), rec("A-copy-2", 3.0)],
            vec![rec("A", 4.0)],
            &mut keep_both,
        );
        assert_eq!(merged.last().unwrap().hec_ref_no, "A-copy-3");

        // Repeated collisions inside one merge keep counting up.
        let (merged, _) = merge_records(
            vec![rec("A", 1.0)],
            vec![rec("A", 2.0), rec("A", 3.0)],
            &mut keep_both,
        );
        let refs: Vec<&str> = merged.iter().map(|r| r.hec_ref_no.as_str()).collect();
        assert_eq!(refs, vec!["A", "A-copy", "A-copy-2"]);
    }

    #[test]
    fn resolver_sees_both_sides_of_the_collision() {
        let mut prefer_bigger_bill = |existing: &Record, incoming: &Record| {
            if incoming.bill_amount > existing.bill_amount {
                Resolution::Overwrite
            } else {
                Resolution::Skip
            }
        };
        let (merged, summary) = merge_records(
            vec![rec("A", 100.0), rec("B", 500.0)],
            vec![rec("A", 200.0), rec("B", 50.0)],
            &mut prefer_bigger_bill,
        );
        assert_eq!(merged[0].bill_amount, 200.0);
        assert_eq!(merged[1].bill_amount, 500.0);
        assert_eq!(summary.overwritten, 1);
        assert_eq!(summary.skipped, 1);
    }
}
