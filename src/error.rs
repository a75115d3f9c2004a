use thiserror::Error;

/// Everything that can abort a report run.
///
/// An empty result after filtering is not represented here: it produces an
/// empty report instead of an error.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("missing required column `{column}` (columns found: {found})")]
    Schema { column: String, found: String },

    #[error("row {row}: cannot parse `{column}` value {value:?} as a date (claim {claim_id})")]
    DataFormat {
        row: usize,
        column: String,
        value: String,
        claim_id: String,
    },

    #[error("failed to render report: {0}")]
    Render(String),

    #[error("failed to read spreadsheet {path}: {message}")]
    Spreadsheet { path: String, message: String },

    #[error("unsupported input format: {0} (expected .xlsx, .xlsm, .xlsb, .xls, .ods or .csv)")]
    UnsupportedFormat(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
