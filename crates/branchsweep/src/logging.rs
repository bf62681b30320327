//! Tracing setup
//!
//! Logs go to stderr so stdout stays clean for `--json`. `RUST_LOG` wins
//! over the verbosity flags when set.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
fn default_filter(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "branchsweep=debug,branchsweep_core=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}

pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, quiet)));

    // a second init (tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert!(default_filter(true, false).contains("branchsweep_core=debug"));
        assert_eq!(default_filter(false, true), "error");
        assert_eq!(default_filter(false, false), "warn");
    }
}
