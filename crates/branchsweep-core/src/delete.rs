//! Deletion executor
//!
//! Deletes a confirmed list of branches one at a time. Each branch is first
//! deleted with `git branch -d`. Git judges "merged" against HEAD, so when it
//! refuses, the branch is checked against trunk: one already in trunk is
//! removed with `-D` and counts as a plain delete. Anything else gets `-D`
//! only if the unsafe flag is set or the operator agrees. A failure on one
//! branch never stops the batch.

use serde::Serialize;

use crate::error::SweepError;
use crate::git::GitBackend;

/// How deletions are carried out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletePolicy {
    /// Report what would happen without touching the repository
    pub dry_run: bool,
    /// Force-delete unmerged branches without asking
    pub force: bool,
}

/// What happened to one branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted,
    ForceDeleted,
    Skipped { reason: String },
    Failed { error: String },
}

impl std::fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteOutcome::Deleted => write!(f, "deleted"),
            DeleteOutcome::ForceDeleted => write!(f, "force deleted"),
            DeleteOutcome::Skipped { reason } => write!(f, "skipped: {}", reason),
            DeleteOutcome::Failed { error } => write!(f, "failed: {}", error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteResult {
    pub branch: String,
    #[serde(flatten)]
    pub outcome: DeleteOutcome,
}

/// Per-branch results, in the order the branches were given
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteReport {
    pub dry_run: bool,
    pub results: Vec<DeleteResult>,
}

impl DeleteReport {
    /// Branches actually removed, forced or not
    pub fn deleted(&self) -> usize {
        self.results
            .iter()
            .filter(|r| {
                matches!(
                    r.outcome,
                    DeleteOutcome::Deleted | DeleteOutcome::ForceDeleted
                )
            })
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, DeleteOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, DeleteOutcome::Failed { .. }))
            .count()
    }
}

/// Callbacks the executor consults while working through a batch
pub trait DeleteHooks {
    /// Asked when `git branch -d` refused an unmerged branch
    fn confirm_force(&mut self, _branch: &str) -> bool {
        false
    }

    /// Polled before each branch; once true the rest are skipped
    fn cancelled(&self) -> bool {
        false
    }

    /// Called as soon as a branch is finished
    fn on_result(&mut self, _result: &DeleteResult) {}
}

/// Hooks for non-interactive runs: never force, never cancel
#[derive(Debug, Default)]
pub struct NonInteractive;

impl DeleteHooks for NonInteractive {}

/// Delete `branches` according to `policy`
///
/// `trunk` decides what counts as merged, whatever is checked out.
pub fn delete_branches(
    git: &impl GitBackend,
    trunk: &str,
    branches: &[String],
    policy: DeletePolicy,
    hooks: &mut impl DeleteHooks,
) -> DeleteReport {
    let mut report = DeleteReport {
        dry_run: policy.dry_run,
        results: Vec::with_capacity(branches.len()),
    };

    for branch in branches {
        let outcome = if hooks.cancelled() {
            DeleteOutcome::Skipped {
                reason: "cancelled".to_string(),
            }
        } else if policy.dry_run {
            DeleteOutcome::Skipped {
                reason: "dry run".to_string(),
            }
        } else {
            delete_one(git, trunk, branch, policy, hooks)
        };

        let result = DeleteResult {
            branch: branch.clone(),
            outcome,
        };
        hooks.on_result(&result);
        report.results.push(result);
    }

    report
}

fn delete_one(
    git: &impl GitBackend,
    trunk: &str,
    branch: &str,
    policy: DeletePolicy,
    hooks: &mut impl DeleteHooks,
) -> DeleteOutcome {
    match git.delete_branch(branch, false) {
        Ok(()) => {
            tracing::info!(%branch, "deleted");
            DeleteOutcome::Deleted
        }
        Err(SweepError::NotFullyMerged { .. }) => {
            match git.is_ancestor(branch, trunk) {
                Ok(true) => {
                    tracing::debug!(%branch, %trunk, "refused by HEAD but merged into trunk");
                    return match git.delete_branch(branch, true) {
                        Ok(()) => {
                            tracing::info!(%branch, "deleted");
                            DeleteOutcome::Deleted
                        }
                        Err(e) => failed(branch, e),
                    };
                }
                Ok(false) => {}
                Err(e) => return failed(branch, e),
            }
            if !policy.force && !hooks.confirm_force(branch) {
                tracing::debug!(%branch, "unmerged, force declined");
                return DeleteOutcome::Skipped {
                    reason: "not fully merged (use --force to delete anyway)".to_string(),
                };
            }
            match git.delete_branch(branch, true) {
                Ok(()) => {
                    tracing::info!(%branch, "force deleted");
                    DeleteOutcome::ForceDeleted
                }
                Err(e) => failed(branch, e),
            }
        }
        Err(e) => failed(branch, e),
    }
}

fn failed(branch: &str, e: SweepError) -> DeleteOutcome {
    tracing::warn!(%branch, error = %e, "delete failed");
    DeleteOutcome::Failed {
        error: e.to_string(),
    }
}
