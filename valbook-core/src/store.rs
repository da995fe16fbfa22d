//! In-memory record storage: an ordered map of named sheets plus the
//! active-sheet and selection state.
//!
//! The single-collection product variant is the degenerate case of one
//! sheet named [`DEFAULT_SHEET`]. Selection (the record "being edited") is
//! transient UI state that happens to persist with the store so
//! select-then-update workflows span invocations; it never leaks into the
//! record data itself.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::record::Record;

/// Sheet name used when no explicit sheet exists.
pub const DEFAULT_SHEET: &str = "Valuations";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("reference number must not be empty")]
    EmptyRefNo,
    #[error("a record with reference {0:?} already exists")]
    DuplicateRefNo(String),
    #[error("no record with reference {0:?}")]
    NotFound(String),
    #[error("no sheet named {0:?}")]
    NoSuchSheet(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordStore {
    sheets: IndexMap<String, Vec<Record>>,
    #[serde(rename = "activeSheet")]
    active_sheet: String,
    #[serde(default)]
    selection: Option<String>,
}

impl Default for RecordStore {
    fn default() -> Self {
        let mut sheets = IndexMap::new();
        sheets.insert(DEFAULT_SHEET.to_string(), Vec::new());
        Self {
            sheets,
            active_sheet: DEFAULT_SHEET.to_string(),
            selection: None,
        }
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records of the active sheet.
    pub fn records(&self) -> &[Record] {
        self.sheets
            .get(&self.active_sheet)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All sheets in insertion order, for export.
    pub fn sheets(&self) -> &IndexMap<String, Vec<Record>> {
        &self.sheets
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    pub fn active_sheet(&self) -> &str {
        &self.active_sheet
    }

    /// Record count of the active sheet.
    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// Record count across all sheets.
    pub fn total_len(&self) -> usize {
        self.sheets.values().map(Vec::len).sum()
    }

    pub fn get(&self, ref_no: &str) -> Option<&Record> {
        self.records().iter().find(|r| r.hec_ref_no == ref_no)
    }

    /// Append a record to the active sheet. The store is left untouched on
    /// an empty or duplicate reference.
    pub fn add(&mut self, record: Record) -> Result<(), StoreError> {
        if record.hec_ref_no.trim().is_empty() {
            return Err(StoreError::EmptyRefNo);
        }
        if self.get(&record.hec_ref_no).is_some() {
            return Err(StoreError::DuplicateRefNo(record.hec_ref_no));
        }
        self.active_records_mut().push(record);
        Ok(())
    }

    /// Replace the record matching `original_ref` with `record`, wholesale.
    ///
    /// `created_at` is carried over from the record being replaced and
    /// `updated_at` is stamped with `now`, whatever the caller supplied.
    /// Fails when the new reference collides with a different record. If
    /// the selection pointed at `original_ref` and the reference changed,
    /// the selection clears.
    pub fn update(
        &mut self,
        original_ref: &str,
        mut record: Record,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        if record.hec_ref_no.trim().is_empty() {
            return Err(StoreError::EmptyRefNo);
        }
        let Some(pos) = self
            .records()
            .iter()
            .position(|r| r.hec_ref_no == original_ref)
        else {
            return Err(StoreError::NotFound(original_ref.to_string()));
        };
        let renamed = record.hec_ref_no != original_ref;
        if renamed && self.get(&record.hec_ref_no).is_some() {
            return Err(StoreError::DuplicateRefNo(record.hec_ref_no));
        }

        let records = self.active_records_mut();
        record.created_at = records[pos].created_at;
        record.updated_at = now;
        records[pos] = record;

        if renamed && self.selection.as_deref() == Some(original_ref) {
            self.selection = None;
        }
        Ok(())
    }

    /// Remove the record with the given reference. Idempotent: returns
    /// whether anything was removed. Clears the selection when it pointed
    /// at the removed record.
    pub fn delete(&mut self, ref_no: &str) -> bool {
        let records = self.active_records_mut();
        let before = records.len();
        records.retain(|r| r.hec_ref_no != ref_no);
        let removed = self.records().len() < before;
        if removed && self.selection.as_deref() == Some(ref_no) {
            self.selection = None;
        }
        removed
    }

    pub fn select(&mut self, ref_no: &str) -> Result<(), StoreError> {
        if self.get(ref_no).is_none() {
            return Err(StoreError::NotFound(ref_no.to_string()));
        }
        self.selection = Some(ref_no.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// Switch the active sheet. Moving to a different sheet clears the
    /// selection; re-selecting the current sheet is a no-op.
    pub fn set_active_sheet(&mut self, name: &str) -> Result<(), StoreError> {
        if name == self.active_sheet {
            return Ok(());
        }
        if !self.sheets.contains_key(name) {
            return Err(StoreError::NoSuchSheet(name.to_string()));
        }
        self.active_sheet = name.to_string();
        self.selection = None;
        Ok(())
    }

    /// Wholesale replacement of the active sheet (import replace mode).
    /// The selection survives only if its reference still exists.
    pub fn replace_records(&mut self, records: Vec<Record>) {
        *self.active_records_mut() = records;
        if let Some(sel) = self.selection.clone() {
            if self.get(&sel).is_none() {
                self.selection = None;
            }
        }
    }

    /// Wholesale multi-sheet replacement (bulk workbook import). The first
    /// sheet becomes active and the selection clears. An empty map falls
    /// back to one empty default sheet.
    pub fn replace_all_sheets(&mut self, sheets: IndexMap<String, Vec<Record>>) {
        if sheets.is_empty() {
            *self = Self::default();
            return;
        }
        self.active_sheet = sheets.keys().next().cloned().unwrap_or_default();
        self.sheets = sheets;
        self.selection = None;
    }

    /// Repair a store deserialized from an untrusted file: the active
    /// sheet must exist and the selection must point at a real record.
    pub fn ensure_consistent(&mut self) {
        if self.sheets.is_empty() {
            self.sheets.insert(DEFAULT_SHEET.to_string(), Vec::new());
        }
        if !self.sheets.contains_key(&self.active_sheet) {
            let first = self.sheets.keys().next().cloned().unwrap_or_default();
            warn!(
                active = %self.active_sheet,
                fallback = %first,
                "persisted active sheet does not exist"
            );
            self.active_sheet = first;
            self.selection = None;
        }
        if let Some(sel) = self.selection.clone() {
            if self.get(&sel).is_none() {
                self.selection = None;
            }
        }
    }

    fn active_records_mut(&mut self) -> &mut Vec<Record> {
        self.sheets.entry(self.active_sheet.clone()).or_default()
    }
}
