//! Branch classification
//!
//! Facts are gathered per branch with read-only git queries, then turned
//! into a [`BranchRecord`] by [`classify`], a pure function. Precedence is
//! fixed: merged or squash-suspected branches are deprecated; otherwise old
//! branches, or branches far behind trunk with nothing of their own, are
//! stale; everything else is active and left out of the report.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{Protection, SweepConfig};
use crate::error::SweepError;
use crate::git::GitBackend;
use crate::squash::SquashDetector;
use crate::types::{BranchFacts, BranchRecord, BranchStatus, Thresholds};

/// What [`classify`] needs besides the facts themselves
#[derive(Debug, Clone, Copy)]
pub struct ClassifyContext<'a> {
    pub trunk: &'a str,
    /// Remote whose presence was checked; `None` if it could not be
    pub remote: Option<&'a str>,
    pub thresholds: Thresholds,
}

/// Turn one branch's facts into a record
pub fn classify(facts: &BranchFacts, ctx: &ClassifyContext<'_>) -> BranchRecord {
    let mut reasons = Vec::new();

    let status = if facts.merged || facts.squash_match.is_some() {
        if facts.merged {
            reasons.push(format!("merged into {}", ctx.trunk));
        }
        if let Some(subject) = &facts.squash_match {
            reasons.push(format!(
                "squash-merge suspected: \"{}\" found on {}",
                subject, ctx.trunk
            ));
        }
        BranchStatus::Deprecated
    } else {
        let too_old = facts.age_days > i64::from(ctx.thresholds.stale_days);
        let left_behind = facts.ahead == 0 && facts.behind > ctx.thresholds.behind_commits;

        if too_old {
            reasons.push(format!(
                "no commits for {} days (threshold {})",
                facts.age_days, ctx.thresholds.stale_days
            ));
        }
        if left_behind {
            reasons.push(format!(
                "{} commits behind {} with none ahead (threshold {})",
                facts.behind, ctx.trunk, ctx.thresholds.behind_commits
            ));
        }

        if too_old || left_behind {
            BranchStatus::Stale
        } else {
            BranchStatus::Active
        }
    };

    if let Some(remote) = ctx.remote {
        if !facts.remote_exists {
            reasons.push(format!("no branch on remote {}", remote));
        }
    }

    BranchRecord {
        name: facts.name.clone(),
        status,
        reasons,
        last_commit: facts.last_commit.clone(),
    }
}

/// Branches eligible for classification: not trunk, not checked out, not protected
pub fn candidate_branches(
    branches: Vec<String>,
    trunk: &str,
    current: Option<&str>,
    protection: &Protection,
) -> Vec<String> {
    branches
        .into_iter()
        .filter(|b| b != trunk)
        .filter(|b| Some(b.as_str()) != current)
        .filter(|b| !protection.is_protected(b))
        .collect()
}

/// A branch left out because its facts could not be gathered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedBranch {
    pub name: String,
    pub error: String,
}

/// Result of a classification pass
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyReport {
    pub trunk: String,
    pub thresholds: Thresholds,
    /// Deprecated then stale; active branches are omitted
    pub records: Vec<BranchRecord>,
    /// Candidates examined, including active ones
    pub examined: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedBranch>,
}

impl ClassifyReport {
    pub fn count(&self, status: BranchStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }
}

/// Gathers facts from git and classifies every candidate branch
pub struct Classifier<'a, G: GitBackend> {
    git: &'a G,
    trunk: &'a str,
    config: &'a SweepConfig,
    now: DateTime<Utc>,
}

impl<'a, G: GitBackend> Classifier<'a, G> {
    pub fn new(git: &'a G, trunk: &'a str, config: &'a SweepConfig) -> Self {
        Self {
            git,
            trunk,
            config,
            now: Utc::now(),
        }
    }

    /// Evaluate ages against `now` instead of the wall clock
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Classify all candidates, calling `on_branch` before each one
    ///
    /// Fails only if the branch list itself cannot be read; per-branch
    /// failures are logged and collected in [`ClassifyReport::skipped`].
    pub fn run(&self, mut on_branch: impl FnMut(&str)) -> Result<ClassifyReport, SweepError> {
        let current = self.git.current_branch()?;
        let candidates = candidate_branches(
            self.git.list_local_branches()?,
            self.trunk,
            current.as_deref(),
            &self.config.protection(),
        );
        tracing::debug!(count = candidates.len(), trunk = self.trunk, "classifying");

        let merged: HashSet<String> = self.git.merged_branches(self.trunk)?.into_iter().collect();
        let remote_heads = self.remote_heads();
        let squash = self.squash_detector();
        let ctx = ClassifyContext {
            trunk: self.trunk,
            remote: remote_heads.as_ref().map(|_| self.config.remote.as_str()),
            thresholds: self.config.thresholds,
        };

        let mut records = Vec::new();
        let mut skipped = Vec::new();
        for name in &candidates {
            on_branch(name);
            let facts = self.gather(name, &merged, remote_heads.as_ref(), squash.as_ref());
            match facts {
                Ok(facts) => {
                    let record = classify(&facts, &ctx);
                    tracing::debug!(branch = %name, status = %record.status, "classified");
                    if record.status != BranchStatus::Active {
                        records.push(record);
                    }
                }
                Err(e) => {
                    tracing::warn!(branch = %name, error = %e, "skipping branch");
                    skipped.push(SkippedBranch {
                        name: name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        // stable sort keeps git's alphabetical order within each group
        records.sort_by_key(|r| match r.status {
            BranchStatus::Deprecated => 0,
            BranchStatus::Stale => 1,
            BranchStatus::Active => 2,
        });

        Ok(ClassifyReport {
            trunk: self.trunk.to_string(),
            thresholds: self.config.thresholds,
            records,
            examined: candidates.len(),
            skipped,
        })
    }

    fn gather(
        &self,
        name: &str,
        merged: &HashSet<String>,
        remote_heads: Option<&HashSet<String>>,
        squash: Option<&SquashDetector>,
    ) -> Result<BranchFacts, SweepError> {
        let commit = self.git.last_commit(name)?;
        let (ahead, behind) = self.git.ahead_behind(self.trunk, name)?;
        let is_merged = merged.contains(name);

        let squash_match = match squash {
            Some(detector) if !is_merged && ahead > 0 => {
                let subjects = self.git.unique_subjects(self.trunk, name)?;
                detector.detect(name, &subjects)
            }
            _ => None,
        };

        Ok(BranchFacts {
            name: name.to_string(),
            merged: is_merged,
            remote_exists: remote_heads.is_some_and(|heads| heads.contains(name)),
            age_days: age_in_days(commit.timestamp, self.now),
            ahead,
            behind,
            squash_match,
            last_commit: commit.summary(),
        })
    }

    fn remote_heads(&self) -> Option<HashSet<String>> {
        let remote = &self.config.remote;
        match self.git.list_remotes() {
            Ok(remotes) if remotes.iter().any(|r| r == remote) => {}
            Ok(_) => {
                tracing::debug!(%remote, "remote not configured, skipping presence check");
                return None;
            }
            Err(e) => {
                tracing::warn!(%remote, error = %e, "could not list remotes");
                return None;
            }
        }

        match self.git.remote_heads(remote) {
            Ok(heads) => Some(heads),
            Err(e) => {
                tracing::warn!(%remote, error = %e, "ls-remote failed, skipping presence check");
                None
            }
        }
    }

    fn squash_detector(&self) -> Option<SquashDetector> {
        if !self.config.squash_detection {
            return None;
        }
        match self
            .git
            .trunk_subjects(self.trunk, self.config.squash_scan_depth)
        {
            Ok(subjects) => Some(SquashDetector::new(&subjects)),
            Err(e) => {
                tracing::warn!(error = %e, "could not read trunk log, squash detection off");
                None
            }
        }
    }
}

/// Whole days between a commit timestamp and `now`, never negative
pub fn age_in_days(timestamp: i64, now: DateTime<Utc>) -> i64 {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|then| now.signed_duration_since(then).num_days().max(0))
        .unwrap_or(0)
}
