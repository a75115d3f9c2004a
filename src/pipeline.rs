use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use tempfile::NamedTempFile;

use crate::aggregator::{DoctorSummary, summarize};
use crate::config::Config;
use crate::document::{ReportDocument, build_report};
use crate::enricher::filter_and_enrich;
use crate::error::Result;
use crate::preview;
use crate::reader::{Table, load_table};
use crate::renderer::render_pdf;
use crate::schema::{EnrichedClaim, records_from_table};

/// Everything one run computes before rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRun {
    pub today: NaiveDate,
    pub threshold: i64,
    pub claims: Vec<EnrichedClaim>,
    pub summaries: Vec<DoctorSummary>,
    pub document: ReportDocument,
}

impl ReportRun {
    pub fn render(&self) -> Result<Vec<u8>> {
        render_pdf(&self.document)
    }
}

/// Filter, enrich, aggregate and lay out one loaded table.
pub fn process(table: &Table, threshold: i64, today: NaiveDate) -> Result<ReportRun> {
    let records = records_from_table(table)?;
    let claims = filter_and_enrich(records, today)?;
    let summaries = summarize(&claims, threshold);
    let document = build_report(&summaries, &claims, threshold);
    Ok(ReportRun {
        today,
        threshold,
        claims,
        summaries,
        document,
    })
}

/// Full run for a config: load the file, process it, write the PDF and any
/// requested side outputs.
pub fn run(config: &Config) -> anyhow::Result<ReportRun> {
    let today = config.today();
    let table = load_table(&config.file_path, config.sheet.as_deref())
        .with_context(|| format!("Failed loading claims from {}", config.file_path.display()))?;
    let report = process(&table, config.threshold, today)
        .with_context(|| format!("Failed processing claims from {}", config.file_path.display()))?;

    let pdf = report.render()?;
    write_atomically(&config.output, &pdf)
        .with_context(|| format!("Failed writing report to {}", config.output.display()))?;

    if let Some(path) = &config.preview_csv {
        preview::write_csv(&report.claims, path)
            .with_context(|| format!("Failed writing preview CSV {}", path.display()))?;
    }
    if let Some(path) = &config.json {
        let json = serde_json::to_string_pretty(&report.document)?;
        fs::write(path, json)
            .with_context(|| format!("Failed writing report JSON {}", path.display()))?;
    }
    if config.preview {
        preview::print_preview(&report.summaries, &report.claims, report.threshold);
    }
    Ok(report)
}

/// Write through a temp file in the destination directory so a failed run
/// never leaves a truncated file behind.
fn write_atomically(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}
