//! valbook-core: record model, normalization, storage and querying for
//! valuation/billing entries.

pub mod amount;
pub mod dates;
pub mod normalize;
pub mod query;
pub mod record;
pub mod store;
pub mod summary;

pub use normalize::{RawField, RawRow, normalize_row};
pub use query::{Filters, Sort, SortDir, SortKey, apply_query};
pub use record::{FIELD_NAMES, PaymentStatus, Record, RecordDraft, ReportType};
pub use store::{DEFAULT_SHEET, RecordStore, StoreError};
pub use summary::Totals;
