use thiserror::Error;

/// Structural import failures. Each of these aborts the whole import with
/// the store untouched; individually invalid rows are dropped before any
/// of these can surface (unless every row was invalid).
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("top-level JSON must be an array of row objects")]
    NotAnArray,
    #[error("workbook has no sheets")]
    NoSheets,
    #[error("no sheet named {0:?} in the workbook")]
    NoSuchSheet(String),
    #[error("workbook has several sheets, pick one of: {}", .0.join(", "))]
    SheetChoiceRequired(Vec<String>),
    #[error("sheet {0:?} has no data rows")]
    EmptySheet(String),
    #[error("no valid records in the import")]
    NoValidRecords,
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    NoRecords,
    #[error("failed to write workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
