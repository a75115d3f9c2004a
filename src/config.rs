use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Parser;

pub const DEFAULT_THRESHOLD: i64 = 30;
pub const DEFAULT_OUTPUT: &str = crate::renderer::REPORT_FILE_NAME;

/// Application configuration for one report run
#[derive(Parser, Debug, Clone)]
#[command(name = "pendingdoctors")]
#[command(
    version,
    about = "Summarise in-progress OPD claims per doctor and export a PDF report"
)]
pub struct Config {
    /// Claims spreadsheet (.xlsx, .xlsm, .xlsb, .xls, .ods or .csv)
    pub file_path: PathBuf,

    /// Highlight claims pending more than this many days
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_THRESHOLD,
        value_parser = clap::value_parser!(i64).range(1..=365)
    )]
    pub threshold: i64,

    /// Where to write the PDF report
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Reference date (YYYY-MM-DD) used instead of today's local date
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Worksheet to read (defaults to the first one)
    #[arg(long)]
    pub sheet: Option<String>,

    /// Print the doctor summary and processed claims to the terminal
    #[arg(long)]
    pub preview: bool,

    /// Also write the processed claims as CSV
    #[arg(long, value_name = "PATH")]
    pub preview_csv: Option<PathBuf>,

    /// Also write the report document as JSON
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Enable detailed logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Config with defaults for everything but the input path.
    pub fn for_file(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            threshold: DEFAULT_THRESHOLD,
            output: PathBuf::from(DEFAULT_OUTPUT),
            today: None,
            sheet: None,
            preview: false,
            preview_csv: None,
            json: None,
            verbose: false,
        }
    }

    /// The single reference date shared by every row of the run.
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Parse command line arguments to create application configuration
pub fn config() -> Config {
    Config::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["pendingdoctors", "claims.xlsx"]).unwrap();
        assert_eq!(config.file_path, PathBuf::from("claims.xlsx"));
        assert_eq!(config.threshold, 30);
        assert_eq!(config.output, PathBuf::from("pending_on_doctors.pdf"));
        assert_eq!(
            Config::for_file("claims.xlsx").output,
            PathBuf::from(crate::renderer::REPORT_FILE_NAME)
        );
        assert!(config.today.is_none());
        assert!(!config.preview);
        assert!(!config.verbose);
    }

    #[test]
    fn test_all_flags() {
        let config = Config::try_parse_from([
            "pendingdoctors",
            "claims.csv",
            "-t",
            "45",
            "-o",
            "out.pdf",
            "--today",
            "2025-03-01",
            "--sheet",
            "OPD",
            "--preview",
            "--preview-csv",
            "preview.csv",
            "--json",
            "report.json",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.threshold, 45);
        assert_eq!(config.output, PathBuf::from("out.pdf"));
        assert_eq!(config.today(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(config.sheet.as_deref(), Some("OPD"));
        assert!(config.preview);
        assert_eq!(config.preview_csv, Some(PathBuf::from("preview.csv")));
        assert_eq!(config.json, Some(PathBuf::from("report.json")));
        assert!(config.verbose);
    }

    /// The CLI keeps the threshold inside [1, 365]; the core accepts anything.
    #[test]
    fn test_threshold_range() {
        assert!(Config::try_parse_from(["pendingdoctors", "c.csv", "-t", "0"]).is_err());
        assert!(Config::try_parse_from(["pendingdoctors", "c.csv", "-t", "366"]).is_err());
        assert!(Config::try_parse_from(["pendingdoctors", "c.csv", "-t", "1"]).is_ok());
        assert!(Config::try_parse_from(["pendingdoctors", "c.csv", "-t", "365"]).is_ok());
    }

    #[test]
    fn test_invalid_today() {
        let result = Config::try_parse_from(["pendingdoctors", "c.csv", "--today", "yesterday"]);
        assert!(result.is_err());
    }
}
