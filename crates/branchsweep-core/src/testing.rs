//! In-memory [`GitBackend`] for unit tests

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};

use crate::error::SweepError;
use crate::git::{CommitInfo, GitBackend};

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeBranch {
    pub merged: bool,
    pub timestamp: i64,
    pub subject: String,
    pub ahead: u32,
    pub behind: u32,
    /// Newest first
    pub unique_subjects: Vec<String>,
}

#[derive(Debug, Default)]
pub(crate) struct FakeGit {
    branches: BTreeMap<String, FakeBranch>,
    current: Option<String>,
    remote_head: Option<String>,
    remote_heads: Option<HashSet<String>>,
    trunk_subjects: Vec<String>,
    failing_deletes: HashSet<String>,
    /// `-d` refuses every branch, as when HEAD is behind trunk
    head_off_trunk: bool,
    /// `(branch, force)` for every delete attempt
    pub delete_calls: RefCell<Vec<(String, bool)>>,
}

impl FakeGit {
    /// Repository with `trunk` checked out and no remote
    pub fn new(trunk: &str) -> Self {
        let mut git = Self::default();
        git.branches.insert(
            trunk.to_string(),
            FakeBranch {
                merged: true,
                ..Default::default()
            },
        );
        git.current = Some(trunk.to_string());
        git
    }

    pub fn with_branch(self, name: &str) -> Self {
        self.with_fake_branch(name, FakeBranch::default())
    }

    pub fn with_fake_branch(mut self, name: &str, branch: FakeBranch) -> Self {
        self.branches.insert(name.to_string(), branch);
        self
    }

    pub fn with_current(mut self, name: &str) -> Self {
        self.current = Some(name.to_string());
        self
    }

    pub fn with_remote_head(mut self, name: &str) -> Self {
        self.remote_head = Some(name.to_string());
        self
    }

    /// Add `origin` carrying the given branch names
    pub fn with_origin(mut self, heads: &[&str]) -> Self {
        self.remote_heads = Some(heads.iter().map(|h| h.to_string()).collect());
        self
    }

    pub fn with_trunk_subjects(mut self, subjects: &[&str]) -> Self {
        self.trunk_subjects = subjects.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn failing_delete(mut self, name: &str) -> Self {
        self.failing_deletes.insert(name.to_string());
        self
    }

    /// Check out a branch that contains none of the others
    pub fn with_head_off_trunk(mut self) -> Self {
        self.head_off_trunk = true;
        self
    }

    fn branch(&self, name: &str) -> Result<&FakeBranch, SweepError> {
        self.branches.get(name).ok_or_else(|| SweepError::GitCommand {
            command: format!("log {}", name),
            stderr: format!("fatal: bad revision '{}'", name),
        })
    }
}

impl GitBackend for FakeGit {
    fn list_local_branches(&self) -> Result<Vec<String>, SweepError> {
        Ok(self.branches.keys().cloned().collect())
    }

    fn current_branch(&self) -> Result<Option<String>, SweepError> {
        Ok(self.current.clone())
    }

    fn branch_exists(&self, branch: &str) -> bool {
        self.branches.contains_key(branch)
    }

    fn list_remotes(&self) -> Result<Vec<String>, SweepError> {
        Ok(self
            .remote_heads
            .as_ref()
            .map(|_| vec!["origin".to_string()])
            .unwrap_or_default())
    }

    fn remote_default_branch(&self, _remote: &str) -> Option<String> {
        self.remote_head.clone()
    }

    fn remote_heads(&self, remote: &str) -> Result<HashSet<String>, SweepError> {
        self.remote_heads.clone().ok_or_else(|| SweepError::GitCommand {
            command: format!("ls-remote --heads {}", remote),
            stderr: "fatal: no such remote".to_string(),
        })
    }

    fn fetch_prune(&self, _remote: &str) -> Result<(), SweepError> {
        Ok(())
    }

    fn checkout(&self, _branch: &str) -> Result<(), SweepError> {
        Ok(())
    }

    fn pull_ff_only(&self) -> Result<(), SweepError> {
        Ok(())
    }

    fn merged_branches(&self, _trunk: &str) -> Result<Vec<String>, SweepError> {
        Ok(self
            .branches
            .iter()
            .filter(|(_, b)| b.merged)
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn last_commit(&self, branch: &str) -> Result<CommitInfo, SweepError> {
        let b = self.branch(branch)?;
        Ok(CommitInfo {
            timestamp: b.timestamp,
            relative: "some time ago".to_string(),
            subject: b.subject.clone(),
        })
    }

    fn ahead_behind(&self, _trunk: &str, branch: &str) -> Result<(u32, u32), SweepError> {
        let b = self.branch(branch)?;
        Ok((b.ahead, b.behind))
    }

    fn trunk_subjects(&self, _trunk: &str, limit: usize) -> Result<Vec<String>, SweepError> {
        Ok(self.trunk_subjects.iter().take(limit).cloned().collect())
    }

    fn unique_subjects(&self, _trunk: &str, branch: &str) -> Result<Vec<String>, SweepError> {
        Ok(self.branch(branch)?.unique_subjects.clone())
    }

    fn is_ancestor(&self, branch: &str, _trunk: &str) -> Result<bool, SweepError> {
        Ok(self.branch(branch)?.merged)
    }

    fn delete_branch(&self, branch: &str, force: bool) -> Result<(), SweepError> {
        self.delete_calls
            .borrow_mut()
            .push((branch.to_string(), force));

        if self.failing_deletes.contains(branch) {
            return Err(SweepError::GitCommand {
                command: format!("branch -d {}", branch),
                stderr: "error: cannot lock ref".to_string(),
            });
        }
        let merged = self.branch(branch)?.merged;
        if (!merged || self.head_off_trunk) && !force {
            return Err(SweepError::NotFullyMerged {
                branch: branch.to_string(),
            });
        }
        Ok(())
    }
}
