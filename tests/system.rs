use chrono::NaiveDate;
use pendingdoctors::config::Config;
use pendingdoctors::pipeline::run;
use std::fs;
use std::path::Path;

fn write_claims(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("opd_claims.csv");
    fs::write(
        &path,
        "claim_id,patient_name,assigned_to_doctor,claimStatus,last_updated_at\n\
         A-100,Jane Doe,Dr. Rao,In Progress,2025-05-01 10:15:00\n\
         A-101,John Roe,Dr. Rao,In Progress,2025-06-25\n\
         A-102,Ann Lee,Dr. Mehta,IN PROGRESS,05/15/2025\n\
         A-103,Bo Chan,Dr. Mehta,Approved,2024-01-01\n\
         A-104,Cy Diaz,Dr. Khan,in progress,2025-06-30T08:00:00\n",
    )
    .unwrap();
    path
}

fn config_in(dir: &Path) -> Config {
    let mut config = Config::for_file(write_claims(dir));
    config.output = dir.join("pending_on_doctors.pdf");
    config.today = NaiveDate::from_ymd_opt(2025, 6, 30);
    config
}

/// Test a full run from a claims file on disk to a PDF on disk.
/// Expected: the PDF exists and the run reports per-doctor counts.
#[test]
fn test_full_run_happy_path() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let report = run(&config).expect("run should succeed");

    let pdf = fs::read(&config.output).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    assert_eq!(report.claims.len(), 4);

    let summaries: Vec<_> = report
        .summaries
        .iter()
        .map(|s| (s.assigned_to_doctor.as_str(), s.total_claims, s.overdue_claims))
        .collect();
    assert_eq!(
        summaries,
        vec![("Dr. Khan", 1, 0), ("Dr. Mehta", 1, 1), ("Dr. Rao", 2, 1)]
    );
}

/// Test that the preview CSV and JSON dump are written alongside the PDF.
/// Expected: both files describe the same processed claims.
#[test]
fn test_full_run_side_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.preview_csv = Some(dir.path().join("preview.csv"));
    config.json = Some(dir.path().join("report.json"));
    config.threshold = 45;

    run(&config).unwrap();

    let csv = fs::read_to_string(dir.path().join("preview.csv")).unwrap();
    assert_eq!(
        csv,
        "assigned_to_doctor,claim_id,days_since_updated\n\
         Dr. Khan,A-104,0\n\
         Dr. Mehta,A-102,46\n\
         Dr. Rao,A-100,60\n\
         Dr. Rao,A-101,5\n"
    );

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("report.json")).unwrap()).unwrap();
    assert_eq!(json["title"], "Pending on Doctors - Report");
    assert_eq!(json["summary"]["header"][2], "Pending > 45 days");
    assert_eq!(json["sections"].as_array().unwrap().len(), 3);
    assert_eq!(json["sections"][2]["doctor"], "Dr. Rao");
    assert_eq!(json["sections"][2]["rows"][0]["overdue"], true);
    assert_eq!(json["sections"][2]["rows"][1]["overdue"], false);
}

/// Test that a failing run leaves no report file behind.
/// Expected: an error naming the missing column and no PDF on disk.
#[test]
fn test_full_run_schema_error_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.csv");
    fs::write(&input, "claim_id,claimStatus,last_updated_at\n1,In Progress,2025-01-01\n").unwrap();
    let mut config = Config::for_file(&input);
    config.output = dir.path().join("pending_on_doctors.pdf");

    let err = run(&config).unwrap_err();
    assert!(format!("{err:#}").contains("assigned_to_doctor"));
    assert!(!config.output.exists());
}

/// Test that an unsupported input extension is rejected up front.
/// Expected: an error mentioning the unsupported format.
#[test]
fn test_full_run_unsupported_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("claims.json");
    fs::write(&input, "[]").unwrap();
    let mut config = Config::for_file(&input);
    config.output = dir.path().join("out.pdf");

    let err = run(&config).unwrap_err();
    assert!(format!("{err:#}").contains("unsupported input format"));
    assert!(!config.output.exists());
}
