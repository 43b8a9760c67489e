use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};

use movie_index_loader::{Dependencies, LoaderError, Settings};
use movie_index_pipeline::orchestrator::RunReport;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = match Settings::try_parse() {
        Ok(settings) => settings,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(Settings::parse_error_exit_code(&e));
        }
    };

    match run(&settings).await {
        Ok(report) => {
            if report.rejected > 0 {
                warn!(
                    rejected = report.rejected,
                    "Some documents were rejected by the search service"
                );
            }
            println!(
                "\nSuccessfully inserted {} records into the search index!",
                report.indexed_count
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Load failed");
            let mut lines = e.report_lines().into_iter();
            if let Some(message) = lines.next() {
                eprintln!("An error occurred: {}", message);
            }
            for cause in lines {
                eprintln!("  Caused by: {}", cause);
            }

            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(settings: &Settings) -> Result<RunReport, LoaderError> {
    let mut deps = Dependencies::new(settings).await?;
    let report = deps.orchestrator.run().await?;

    info!(
        fetched = report.fetched,
        submitted = report.submitted,
        rejected = report.rejected,
        indexed = report.indexed_count,
        "Load complete"
    );
    Ok(report)
}
