use clap::Parser;
use launcher::cli::LaunchArgs;
use launcher::supervisor::{launch, LaunchPlan};
use service_core::observability::init_tracing;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = LaunchArgs::parse();
    init_tracing("launcher", "info", None);

    let result = match LaunchPlan::from_args(&args) {
        Ok(plan) => launch(plan).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            tracing::error!(error = %e, "Launcher failed");
            ExitCode::FAILURE
        }
    }
}
