//! valbook-io: import/export adapters and the persisted store file.
//!
//! Imports (JSON arrays, xlsx/xls/xlsm workbooks) run every row through
//! the valbook-core normalizer; exports render records back into
//! workbooks or CSV with the same field-name contract.

pub mod error;
pub mod export;
pub mod json;
pub mod merge;
pub mod store_file;
pub mod workbook;

pub use error::{ExportError, ImportError};
pub use merge::{MergeSummary, Resolution, ResolveConflict, merge_records};

use std::collections::HashSet;

use tracing::warn;
use valbook_core::Record;

/// Drop later occurrences of a reference inside one import batch.
///
/// Replace-mode results land in the store wholesale, so the batch itself
/// must already satisfy the uniqueness invariant. First occurrence wins.
pub fn dedupe_first_wins(records: Vec<Record>) -> Vec<Record> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    let mut out = Vec::with_capacity(records.len());
    for rec in records {
        if seen.insert(rec.hec_ref_no.clone()) {
            out.push(rec);
        } else {
            warn!(ref_no = %rec.hec_ref_no, "dropping duplicate reference in import batch");
        }
    }
    out
}
