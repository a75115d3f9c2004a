//! Renderer-agnostic model of the pending-claims report.
//!
//! The overdue decision lives on each [`DetailRow`] as a flag so renderers
//! style rows from data, never from the text they print.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregator::DoctorSummary;
use crate::schema::EnrichedClaim;

pub const REPORT_TITLE: &str = "Pending on Doctors - Report";
pub const SUMMARY_HEADING: &str = "Summary Overview";
pub const DETAIL_HEADER: [&str; 2] = ["Claim ID", "Days since updated"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDocument {
    pub title: String,
    pub threshold: i64,
    pub summary: SummaryTable,
    pub sections: Vec<DoctorSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryTable {
    pub heading: String,
    pub header: [String; 3],
    pub rows: Vec<SummaryRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub doctor: String,
    pub total_claims: usize,
    pub overdue_claims: usize,
}

impl SummaryRow {
    pub fn cells(&self) -> [String; 3] {
        [
            self.doctor.clone(),
            self.total_claims.to_string(),
            self.overdue_claims.to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoctorSection {
    pub doctor: String,
    pub header: [String; 2],
    pub rows: Vec<DetailRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    pub claim_id: String,
    pub days_since_updated: i64,
    pub overdue: bool,
}

impl ReportDocument {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

pub fn summary_header(threshold: i64) -> [String; 3] {
    [
        "Doctor".to_string(),
        "Total Claims".to_string(),
        format!("Pending > {threshold} days"),
    ]
}

/// Assemble the report from the summaries and the sorted claim list.
///
/// Summary rows keep the order of `summaries`. Sections are ordered by doctor
/// name; rows within a section keep the order of `claims`.
pub fn build_report(
    summaries: &[DoctorSummary],
    claims: &[EnrichedClaim],
    threshold: i64,
) -> ReportDocument {
    let summary = SummaryTable {
        heading: SUMMARY_HEADING.to_string(),
        header: summary_header(threshold),
        rows: summaries
            .iter()
            .map(|s| SummaryRow {
                doctor: s.assigned_to_doctor.clone(),
                total_claims: s.total_claims,
                overdue_claims: s.overdue_claims,
            })
            .collect(),
    };

    let mut grouped: BTreeMap<&str, Vec<DetailRow>> = BTreeMap::new();
    for claim in claims {
        grouped
            .entry(claim.assigned_to_doctor.as_str())
            .or_default()
            .push(DetailRow {
                claim_id: claim.claim_id.clone(),
                days_since_updated: claim.days_since_updated,
                overdue: claim.is_overdue(threshold),
            });
    }

    let sections = grouped
        .into_iter()
        .map(|(doctor, rows)| DoctorSection {
            doctor: doctor.to_string(),
            header: DETAIL_HEADER.map(str::to_string),
            rows,
        })
        .collect();

    ReportDocument {
        title: REPORT_TITLE.to_string(),
        threshold,
        summary,
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::summarize;
    use crate::schema::mock_enriched;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_report_scenario() {
        let claims = vec![mock_enriched("1", "Dr. A", 40), mock_enriched("2", "Dr. A", 5)];
        let summaries = summarize(&claims, 30);
        let doc = build_report(&summaries, &claims, 30);

        assert_eq!(doc.title, "Pending on Doctors - Report");
        assert_eq!(
            doc.summary.header,
            ["Doctor", "Total Claims", "Pending > 30 days"].map(str::to_string)
        );
        assert_eq!(
            doc.summary.rows,
            vec![SummaryRow {
                doctor: "Dr. A".to_string(),
                total_claims: 2,
                overdue_claims: 1,
            }]
        );
        assert_eq!(
            doc.sections,
            vec![DoctorSection {
                doctor: "Dr. A".to_string(),
                header: ["Claim ID", "Days since updated"].map(str::to_string),
                rows: vec![
                    DetailRow {
                        claim_id: "1".to_string(),
                        days_since_updated: 40,
                        overdue: true,
                    },
                    DetailRow {
                        claim_id: "2".to_string(),
                        days_since_updated: 5,
                        overdue: false,
                    },
                ],
            }]
        );
    }

    #[test]
    fn test_threshold_boundary_not_overdue() {
        let claims = vec![mock_enriched("1", "Dr. A", 30), mock_enriched("2", "Dr. A", 31)];
        let doc = build_report(&summarize(&claims, 30), &claims, 30);
        let flags: Vec<_> = doc.sections[0].rows.iter().map(|r| r.overdue).collect();
        assert_eq!(flags, vec![false, true]);
    }

    #[test]
    fn test_sections_follow_doctor_order() {
        let claims = vec![
            mock_enriched("z1", "Dr. Z", 9),
            mock_enriched("a1", "Dr. A", 7),
            mock_enriched("a2", "Dr. A", 3),
        ];
        let doc = build_report(&summarize(&claims, 5), &claims, 5);
        let doctors: Vec<_> = doc.sections.iter().map(|s| s.doctor.as_str()).collect();
        assert_eq!(doctors, vec!["Dr. A", "Dr. Z"]);
        let ids: Vec<_> = doc.sections[0].rows.iter().map(|r| r.claim_id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2"]);
    }

    /// Highlight flags and summary counts agree for every doctor.
    #[test]
    fn test_flags_match_summary_counts() {
        let claims: Vec<_> = (0..40)
            .map(|i| {
                let doctor = ["Dr. A", "Dr. B", "Dr. C"][i as usize % 3];
                mock_enriched(&i.to_string(), doctor, i * 2)
            })
            .collect();
        let doc = build_report(&summarize(&claims, 25), &claims, 25);
        for (row, section) in doc.summary.rows.iter().zip(&doc.sections) {
            assert_eq!(row.doctor, section.doctor);
            assert_eq!(row.total_claims, section.rows.len());
            assert_eq!(row.overdue_claims, section.rows.iter().filter(|r| r.overdue).count());
        }
    }

    #[test]
    fn test_empty_report() {
        let doc = build_report(&[], &[], 30);
        assert!(doc.is_empty());
        assert!(doc.summary.rows.is_empty());
        assert_eq!(doc.summary.header[2], "Pending > 30 days");
    }

    #[test]
    fn test_build_is_deterministic() {
        let claims = vec![mock_enriched("1", "Dr. B", 12), mock_enriched("2", "Dr. A", 50)];
        let summaries = summarize(&claims, 10);
        assert_eq!(
            build_report(&summaries, &claims, 10),
            build_report(&summaries, &claims, 10)
        );
    }

    #[test]
    fn test_summary_row_cells() {
        let row = SummaryRow {
            doctor: "Dr. A".to_string(),
            total_claims: 4,
            overdue_claims: 2,
        };
        assert_eq!(row.cells(), ["Dr. A", "4", "2"].map(str::to_string));
    }
}
