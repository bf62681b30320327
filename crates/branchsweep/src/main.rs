//! branchsweep CLI - find and delete merged, squash-merged, and stale branches

mod cli;
mod colors;
mod commands;
mod interaction;
mod logging;
mod output;

use std::process::ExitCode;

use branchsweep_core::SweepError;

use output::{JsonIssue, JsonResponse, print_json};

fn main() -> ExitCode {
    let cli = match cli::parse() {
        Ok(cli) => cli,
        Err(e) => {
            // help and version print to stdout and succeed
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    logging::init(cli.verbose, cli.quiet);

    match commands::run_sweep(&cli) {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => ExitCode::from(report_error(&e, cli.json) as u8),
    }
}

/// Print a failed run and pick its exit code
fn report_error(e: &anyhow::Error, json: bool) -> i32 {
    let sweep_error = e.downcast_ref::<SweepError>();
    if let Some(SweepError::Cancelled) = sweep_error {
        eprintln!("cancelled");
    } else if json {
        let code = sweep_error.map(|se| se.code()).unwrap_or("E000");
        let issue = JsonIssue::error(code, format!("{:#}", e));
        print_json(&JsonResponse::error("sweep", (), vec![issue]));
    } else {
        eprintln!("error: {:#}", e);
    }
    sweep_error.map(|se| se.exit_code()).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use branchsweep_core::InteractionError;
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        crate::cli::Cli::command().debug_assert();
    }

    #[test]
    fn test_cancel_exits_zero() {
        let e = anyhow::Error::from(SweepError::from(InteractionError::Cancelled));
        assert_eq!(report_error(&e, false), 0);
    }

    #[test]
    fn test_errors_exit_one() {
        let e = anyhow::Error::from(SweepError::NotAGitRepository);
        assert_eq!(report_error(&e, false), 1);

        let e = anyhow::Error::from(SweepError::from(InteractionError::Io("closed".to_string())));
        assert_eq!(e.downcast_ref::<SweepError>().map(|se| se.code()), Some("E021"));
        assert_eq!(report_error(&e, false), 1);

        assert_eq!(report_error(&anyhow::anyhow!("plain"), false), 1);
    }
}
