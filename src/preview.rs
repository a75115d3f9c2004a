use std::path::Path;

use prettytable::{Cell, Row, Table, format, row};

use crate::aggregator::DoctorSummary;
use crate::document::summary_header;
use crate::error::Result;
use crate::schema::EnrichedClaim;

/// Doctor-wise summary as a terminal table.
pub fn summary_table(summaries: &[DoctorSummary], threshold: i64) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    let [doctor, total, overdue] = summary_header(threshold);
    table.set_titles(row![b->doctor, b->total, b->overdue]);
    for summary in summaries {
        table.add_row(row![
            summary.assigned_to_doctor,
            r->summary.total_claims,
            r->summary.overdue_claims
        ]);
    }
    table
}

/// Processed claims, overdue rows in red.
pub fn claims_table(claims: &[EnrichedClaim], threshold: i64) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(row![b->"assigned_to_doctor", b->"claim_id", b->"days_since_updated"]);
    for claim in claims {
        let spec = if claim.is_overdue(threshold) { "Fr" } else { "" };
        table.add_row(Row::new(vec![
            Cell::new(&claim.assigned_to_doctor).style_spec(spec),
            Cell::new(&claim.claim_id).style_spec(spec),
            Cell::new(&claim.days_since_updated.to_string()).style_spec(&format!("{spec}r")),
        ]));
    }
    table
}

pub fn print_preview(summaries: &[DoctorSummary], claims: &[EnrichedClaim], threshold: i64) {
    println!("\n--- Summary (Doctor-wise) ---");
    summary_table(summaries, threshold).printstd();
    println!("\n--- Processed Data ---");
    claims_table(claims, threshold).printstd();
    println!();
}

/// Write the processed claims in the same columns as the terminal preview.
pub fn write_csv(claims: &[EnrichedClaim], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for claim in claims {
        writer.serialize(claim)?;
    }
    writer.flush()?;
    Ok(())
}
