//! The sweep run: discover, classify, report, then delete what was chosen

use std::io::IsTerminal;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use branchsweep_core::{
    Category, Classifier, ClassifyReport, DeletePolicy, GitBackend, GitCli, InteractionError,
    MenuOutcome, NonInteractive, SweepConfig, SweepError, delete_branches, detect_trunk, run_menu,
};

use crate::cli::Cli;
use crate::colors::colors_enabled;
use crate::interaction::{CliAdapter, TerminalHooks, is_cancelled, setup_ctrl_c_handler};
use crate::output::{
    print_json, render_dry_run, render_report, render_summary, sweep_response,
};

/// Run a sweep; returns the process exit code
pub fn run_sweep(cli: &Cli) -> Result<i32> {
    let start = match &cli.directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("cannot read current directory")?,
    };
    let git = GitCli::discover(&start)?;
    tracing::debug!(root = %git.repo_root().display(), "repository");

    let mut config = SweepConfig::load(git.repo_root())?;
    apply_overrides(&mut config, cli);

    let trunk = detect_trunk(&git, config.trunk.as_deref(), &config.remote)?;
    prepare(&git, &config, &trunk, cli.update_trunk);

    let report = classify(&git, &trunk, &config, show_progress(cli))?;
    let policy = DeletePolicy {
        dry_run: cli.dry_run,
        force: cli.force,
    };

    if cli.json {
        let deletions = cli.auto.map(|category| {
            let names = Category::from(category).select(&report.records);
            delete_branches(&git, &trunk, &names, policy, &mut NonInteractive)
        });
        print_json(&sweep_response(report, deletions));
        return Ok(0);
    }

    let color = colors_enabled();
    if !cli.quiet {
        print!("{}", render_report(&report, color));
    }
    if report.records.is_empty() {
        if !cli.quiet {
            println!("Nothing to clean up.");
        }
        return Ok(0);
    }

    let mut adapter = None;
    let outcome = if let Some(category) = cli.auto {
        let names = Category::from(category).select(&report.records);
        if cli.dry_run {
            MenuOutcome::DryRun(names)
        } else {
            MenuOutcome::Delete(names)
        }
    } else if cli.dry_run {
        MenuOutcome::DryRun(Category::All.select(&report.records))
    } else {
        let cli_adapter = adapter.insert(CliAdapter::new());
        match run_menu(cli_adapter, &report.records) {
            Ok(outcome) => outcome,
            Err(InteractionError::NonInteractive) => {
                if !cli.quiet {
                    println!("Not a terminal: rerun with --auto <all|deprecated|stale> to delete.");
                }
                return Ok(0);
            }
            Err(e) => return Err(SweepError::from(e).into()),
        }
    };

    match outcome {
        MenuOutcome::Quit => Ok(0),
        MenuOutcome::DryRun(names) => {
            if !cli.quiet {
                print!("{}", render_dry_run(&report.records, &names, color));
            }
            Ok(0)
        }
        MenuOutcome::Delete(names) => {
            if names.is_empty() {
                if !cli.quiet {
                    println!("No branches selected.");
                }
                return Ok(0);
            }
            setup_ctrl_c_handler();
            let mut hooks = TerminalHooks::new(adapter.as_mut(), color, cli.quiet);
            let deletions = delete_branches(&git, &trunk, &names, policy, &mut hooks);
            if !cli.quiet {
                println!("{}", render_summary(&deletions));
            }
            if is_cancelled() {
                return Err(SweepError::Cancelled.into());
            }
            Ok(0)
        }
    }
}

/// Command-line flags win over every config file
fn apply_overrides(config: &mut SweepConfig, cli: &Cli) {
    if let Some(days) = cli.days {
        config.thresholds.stale_days = days;
    }
    if let Some(behind) = cli.behind {
        config.thresholds.behind_commits = behind;
    }
    if let Some(trunk) = &cli.trunk {
        config.trunk = Some(trunk.clone());
    }
    if let Some(remote) = &cli.remote {
        config.remote = remote.clone();
    }
    if cli.no_fetch {
        config.fetch = false;
    }
    if cli.no_squash {
        config.squash_detection = false;
    }
}

/// Fetch and optionally fast-forward trunk; failures only warn
fn prepare(git: &GitCli, config: &SweepConfig, trunk: &str, update_trunk: bool) {
    let has_remote = git
        .list_remotes()
        .map(|remotes| remotes.contains(&config.remote))
        .unwrap_or(false);

    if config.fetch && has_remote {
        if let Err(e) = git.fetch_prune(&config.remote) {
            tracing::warn!(remote = %config.remote, error = %e, "fetch failed, using local state");
        }
    }

    if update_trunk {
        if let Err(e) = git.checkout(trunk) {
            tracing::warn!(%trunk, error = %e, "could not check out trunk");
            return;
        }
        if has_remote {
            if let Err(e) = git.pull_ff_only() {
                tracing::warn!(%trunk, error = %e, "could not fast-forward trunk");
            }
        }
    }
}

fn show_progress(cli: &Cli) -> bool {
    !cli.json && !cli.quiet && std::io::stderr().is_terminal()
}

fn classify(
    git: &GitCli,
    trunk: &str,
    config: &SweepConfig,
    progress: bool,
) -> Result<ClassifyReport> {
    let classifier = Classifier::new(git, trunk, config);
    if !progress {
        return Ok(classifier.run(|_| {})?);
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("invalid spinner template")?
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let report = classifier.run(|name| spinner.set_message(format!("checking {}", name)));
    spinner.finish_and_clear();
    Ok(report?)
}
