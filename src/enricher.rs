use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{ReportError, Result};
use crate::logging::log_claim_event;
use crate::reader::Cell;
use crate::schema::{ClaimRecord, EnrichedClaim, UPDATED_AT_COLUMN};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y", "%B %d, %Y"];

/// Keep in-progress claims and compute how long each has been pending.
///
/// `today` is the single reference date for the whole batch. Output is sorted
/// by doctor ascending, then days pending descending; the sort is stable so
/// ties keep their input order.
pub fn filter_and_enrich(
    records: Vec<ClaimRecord>,
    today: NaiveDate,
) -> Result<Vec<EnrichedClaim>> {
    let total = records.len();
    let mut claims = Vec::with_capacity(total);

    for record in records {
        if !record.is_in_progress() {
            log_claim_event(
                "enricher",
                &record.claim_id,
                "filtered_out",
                &format!("Dropped claim with status {:?}", record.claim_status),
            );
            continue;
        }

        let last_updated =
            parse_update_date(&record.last_updated_at).ok_or_else(|| ReportError::DataFormat {
                row: record.row,
                column: UPDATED_AT_COLUMN.to_string(),
                value: record.last_updated_at.to_string(),
                claim_id: record.claim_id.clone(),
            })?;
        let days_since_updated = (today - last_updated).num_days();

        log_claim_event(
            "enricher",
            &record.claim_id,
            "enriched",
            &format!("Pending {days_since_updated} days since {last_updated}"),
        );
        claims.push(EnrichedClaim {
            assigned_to_doctor: record.assigned_to_doctor,
            claim_id: record.claim_id,
            days_since_updated,
        });
    }

    claims.sort_by(|a, b| {
        a.assigned_to_doctor
            .cmp(&b.assigned_to_doctor)
            .then_with(|| b.days_since_updated.cmp(&a.days_since_updated))
    });

    tracing::debug!(dropped = total - claims.len(), "dropped claims not in progress");
    tracing::info!(kept = claims.len(), %today, "filtered in-progress claims");
    Ok(claims)
}

/// Parse an update timestamp into a calendar date, dropping the time of day.
pub fn parse_update_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::DateTime(dt) => Some(dt.date()),
        Cell::Text(text) => parse_date_text(text.trim()),
        _ => None,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        })
}
