use serde::Serialize;

use crate::error::{ReportError, Result};
use crate::reader::{Cell, Table};

pub const STATUS_COLUMN: &str = "claimStatus";
pub const DOCTOR_COLUMN: &str = "assigned_to_doctor";
pub const CLAIM_ID_COLUMN: &str = "claim_id";
pub const UPDATED_AT_COLUMN: &str = "last_updated_at";

pub const IN_PROGRESS: &str = "in progress";

/// A claim row as it came out of the spreadsheet
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimRecord {
    pub row: usize,
    pub claim_id: String,
    pub assigned_to_doctor: String,
    pub claim_status: String,
    pub last_updated_at: Cell,
}

impl ClaimRecord {
    pub fn is_in_progress(&self) -> bool {
        self.claim_status.trim().to_lowercase() == IN_PROGRESS
    }
}

/// An in-progress claim with its pending age
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedClaim {
    pub assigned_to_doctor: String,
    pub claim_id: String,
    pub days_since_updated: i64,
}

impl EnrichedClaim {
    pub fn is_overdue(&self, threshold: i64) -> bool {
        is_overdue(self.days_since_updated, threshold)
    }
}

/// The one overdue predicate. Summary counts and row highlights both use it.
pub fn is_overdue(days_since_updated: i64, threshold: i64) -> bool {
    days_since_updated > threshold
}

/// Bind the required columns and pull one [`ClaimRecord`] per table row.
pub fn records_from_table(table: &Table) -> Result<Vec<ClaimRecord>> {
    let column = |name: &str| {
        table.column_index(name).ok_or_else(|| ReportError::Schema {
            column: name.to_string(),
            found: table.headers.join(", "),
        })
    };
    let status_idx = column(STATUS_COLUMN)?;
    let doctor_idx = column(DOCTOR_COLUMN)?;
    let claim_idx = column(CLAIM_ID_COLUMN)?;
    let updated_idx = column(UPDATED_AT_COLUMN)?;

    Ok(table
        .rows
        .iter()
        .map(|row| ClaimRecord {
            row: row.line,
            claim_id: row.cells[claim_idx].to_string(),
            assigned_to_doctor: row.cells[doctor_idx].to_string(),
            claim_status: row.cells[status_idx].to_string(),
            last_updated_at: row.cells[updated_idx].clone(),
        })
        .collect())
}

/// Mock claim record for testing
#[cfg(test)]
pub fn mock_record(claim_id: &str, doctor: &str, status: &str, updated: &str) -> ClaimRecord {
    ClaimRecord {
        row: 2,
        claim_id: claim_id.to_string(),
        assigned_to_doctor: doctor.to_string(),
        claim_status: status.to_string(),
        last_updated_at: Cell::Text(updated.to_string()),
    }
}

/// Mock enriched claim for testing
#[cfg(test)]
pub fn mock_enriched(claim_id: &str, doctor: &str, days: i64) -> EnrichedClaim {
    EnrichedClaim {
        assigned_to_doctor: doctor.to_string(),
        claim_id: claim_id.to_string(),
        days_since_updated: days,
    }
}
