use std::collections::BTreeMap;

use serde::Serialize;

use crate::schema::EnrichedClaim;

/// Per-doctor claim counts for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoctorSummary {
    pub assigned_to_doctor: String,
    pub total_claims: usize,
    pub overdue_claims: usize,
}

/// Group claims by doctor (exact name match) and count overdue ones.
///
/// Summaries come back in ascending doctor order.
pub fn summarize(claims: &[EnrichedClaim], threshold: i64) -> Vec<DoctorSummary> {
    #[derive(Default)]
    struct Tally {
        total: usize,
        overdue: usize,
    }

    let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();
    for claim in claims {
        let entry = tallies.entry(claim.assigned_to_doctor.as_str()).or_default();
        entry.total += 1;
        if claim.is_overdue(threshold) {
            entry.overdue += 1;
        }
    }

    let summaries: Vec<DoctorSummary> = tallies
        .into_iter()
        .map(|(doctor, tally)| DoctorSummary {
            assigned_to_doctor: doctor.to_string(),
            total_claims: tally.total,
            overdue_claims: tally.overdue,
        })
        .collect();

    tracing::info!(doctors = summaries.len(), threshold, "summarized claims per doctor");
    summaries
}
