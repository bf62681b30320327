//! CLI argument parsing with clap derive

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use branchsweep_core::Category;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// branchsweep - find and delete merged, squash-merged, and stale git branches
#[derive(Parser, Debug)]
#[command(name = "branchsweep")]
#[command(version = VERSION)]
#[command(about = "Find and delete merged, squash-merged, and stale git branches")]
#[command(long_about = "Classifies every local branch except trunk and the checked-out branch.\n\nStatuses:\n  deprecated  merged into trunk, or squash-merged (best-effort guess)\n  stale       no commits for --days, or more than --behind commits behind\n              trunk with nothing of its own\n  active      everything else (not shown)\n\nIn a terminal a menu offers deletion by category, per branch, or a dry run.\nBranches are deleted with `git branch -d`; unmerged branches are only\nforce-deleted after confirmation or with --force.\n\nSettings can also live in .branchsweep.toml under [sweep].")]
pub struct Cli {
    /// Force-delete unmerged branches without asking
    #[arg(short, long)]
    pub force: bool,

    /// Days without commits before a branch is stale
    #[arg(short, long, value_name = "DAYS")]
    pub days: Option<u32>,

    /// Commits behind trunk (with none ahead) before a branch is stale
    #[arg(short, long, value_name = "COMMITS")]
    pub behind: Option<u32>,

    /// Trunk branch (detected from the remote HEAD, main, or master)
    #[arg(long, value_name = "BRANCH")]
    pub trunk: Option<String>,

    /// Remote checked for branch presence
    #[arg(long, value_name = "NAME")]
    pub remote: Option<String>,

    /// Skip `git fetch --prune` before classifying
    #[arg(long)]
    pub no_fetch: bool,

    /// Check out trunk and fast-forward it before classifying
    #[arg(long)]
    pub update_trunk: bool,

    /// Disable squash-merge detection
    #[arg(long)]
    pub no_squash: bool,

    /// Show what would be deleted and exit
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Delete a category without showing the menu
    #[arg(long, value_enum, value_name = "CATEGORY")]
    pub auto: Option<CategoryArg>,

    /// Output in JSON format (never interactive)
    #[arg(long)]
    pub json: bool,

    /// Increase output verbosity
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Run as if started in PATH
    #[arg(short = 'C', value_name = "PATH")]
    pub directory: Option<PathBuf>,
}

/// Branch categories accepted by `--auto`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    All,
    Deprecated,
    Stale,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::All => Category::All,
            CategoryArg::Deprecated => Category::Deprecated,
            CategoryArg::Stale => Category::Stale,
        }
    }
}

/// Parse the command line without exiting on error
pub fn parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from(["branchsweep", "-f", "-d", "30", "-b", "10", "-n"])
            .expect("flags should parse");
        assert!(cli.force);
        assert_eq!(cli.days, Some(30));
        assert_eq!(cli.behind, Some(10));
        assert!(cli.dry_run);
        assert!(cli.auto.is_none());
    }

    #[test]
    fn test_auto_category() {
        let cli = Cli::try_parse_from(["branchsweep", "--auto", "deprecated"]).unwrap();
        assert_eq!(cli.auto, Some(CategoryArg::Deprecated));
        assert_eq!(Category::from(CategoryArg::Stale), Category::Stale);

        assert!(Cli::try_parse_from(["branchsweep", "--auto", "everything"]).is_err());
    }

    #[test]
    fn test_rejects_bad_threshold() {
        assert!(Cli::try_parse_from(["branchsweep", "--days", "soon"]).is_err());
        assert!(Cli::try_parse_from(["branchsweep", "-v", "-q"]).is_err());
    }
}
