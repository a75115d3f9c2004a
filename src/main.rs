use colored::Colorize;

use pendingdoctors::renderer::REPORT_MIME_TYPE;
use pendingdoctors::{config, logging, pipeline};

fn main() {
    let config = config::config();
    logging::init(config.verbose);

    match pipeline::run(&config) {
        Ok(report) => {
            let overdue: usize = report.summaries.iter().map(|s| s.overdue_claims).sum();
            println!(
                "{} {} in-progress claims across {} doctors, {} pending > {} days (as of {})",
                "File processed successfully!".green().bold(),
                report.claims.len(),
                report.summaries.len(),
                overdue,
                report.threshold,
                report.today,
            );
            println!(
                "Report written to {} ({})",
                config.output.display().to_string().bold(),
                REPORT_MIME_TYPE
            );
        }
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            std::process::exit(1);
        }
    }
}
