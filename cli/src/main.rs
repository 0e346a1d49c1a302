use colored::Colorize;
use presentation::cli::{describe_error, Cli, CliApp};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_with_dotenv(std::env::args_os());
    shared::telemetry::init_tracing(cli.verbose);

    let app = CliApp::from_cli(&cli);
    match app.run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "submission failed");
            eprintln!("{}", describe_error(&err).red());
            ExitCode::FAILURE
        }
    }
}
