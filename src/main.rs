use clap::Parser;
use std::process::ExitCode;
use vigil::cli::Cli;
use vigil::{logging, output};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let structured = cli.wants_json();

    // Keep stderr quiet when stdout carries machine-readable output.
    logging::init(logging::level_for(cli.verbose, cli.quiet || structured));

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            if structured {
                let _ = output::print_envelope(&output::Envelope::failure(e.to_string()));
            } else {
                output::print_error(&e.to_string());
            }
            ExitCode::FAILURE
        }
    }
}
