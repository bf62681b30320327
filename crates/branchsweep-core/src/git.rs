//! Git CLI access
//!
//! Every repository query and mutation goes through the `git` binary.
//! [`GitBackend`] is the seam the classifier and deletion executor use;
//! [`GitCli`] is the real implementation.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::SweepError;

/// Field separator used in `--format` strings (ASCII unit separator)
const FIELD_SEP: char = '\x1f';

/// Summary of a branch's tip commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Committer date, seconds since the epoch
    pub timestamp: i64,
    /// Relative date as git renders it ("3 weeks ago")
    pub relative: String,
    pub subject: String,
}

impl CommitInfo {
    /// One-line summary used in reports
    pub fn summary(&self) -> String {
        format!("{} - {}", self.relative, self.subject)
    }
}

/// Operations branchsweep needs from a repository
pub trait GitBackend {
    /// Local branch names, short form
    fn list_local_branches(&self) -> Result<Vec<String>, SweepError>;

    /// Checked-out branch, `None` on a detached HEAD
    fn current_branch(&self) -> Result<Option<String>, SweepError>;

    fn branch_exists(&self, branch: &str) -> bool;

    /// Names of configured remotes
    fn list_remotes(&self) -> Result<Vec<String>, SweepError>;

    /// Branch the remote's HEAD points at, without the remote prefix
    fn remote_default_branch(&self, remote: &str) -> Option<String>;

    /// Branch names present on `remote`, queried live
    fn remote_heads(&self, remote: &str) -> Result<HashSet<String>, SweepError>;

    fn fetch_prune(&self, remote: &str) -> Result<(), SweepError>;

    fn checkout(&self, branch: &str) -> Result<(), SweepError>;

    /// Fast-forward the checked-out branch from its upstream
    fn pull_ff_only(&self) -> Result<(), SweepError>;

    /// Local branches whose tips are reachable from `trunk`
    fn merged_branches(&self, trunk: &str) -> Result<Vec<String>, SweepError>;

    fn last_commit(&self, branch: &str) -> Result<CommitInfo, SweepError>;

    /// `(ahead, behind)` commit counts of `branch` relative to `trunk`
    fn ahead_behind(&self, trunk: &str, branch: &str) -> Result<(u32, u32), SweepError>;

    /// Most recent commit subjects on `trunk`, newest first
    fn trunk_subjects(&self, trunk: &str, limit: usize) -> Result<Vec<String>, SweepError>;

    /// Subjects of non-merge commits on `branch` that `trunk` lacks
    fn unique_subjects(&self, trunk: &str, branch: &str) -> Result<Vec<String>, SweepError>;

    /// Whether `branch`'s tip is reachable from `trunk`
    fn is_ancestor(&self, branch: &str, trunk: &str) -> Result<bool, SweepError>;

    /// `git branch -d`, or `-D` when `force` is set
    fn delete_branch(&self, branch: &str, force: bool) -> Result<(), SweepError>;
}

/// Git CLI wrapper rooted at a repository's top-level directory
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_root: PathBuf,
}

impl GitCli {
    /// Wrap an already-known repository root
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    /// Find the repository containing `start`
    ///
    /// Fails with [`SweepError::GitNotInstalled`] when git cannot be run and
    /// [`SweepError::NotAGitRepository`] when `start` is outside a work tree.
    pub fn discover(start: &Path) -> Result<Self, SweepError> {
        let version = Command::new("git").arg("--version").output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SweepError::GitNotInstalled
            } else {
                SweepError::Io(e)
            }
        })?;
        if !version.status.success() {
            return Err(SweepError::GitNotInstalled);
        }
        tracing::debug!(
            version = %String::from_utf8_lossy(&version.stdout).trim(),
            "found git"
        );

        let output = Command::new("git")
            .arg("-C")
            .arg(start)
            .args(["rev-parse", "--show-toplevel"])
            .env("LC_ALL", "C")
            .output()?;
        if !output.status.success() {
            return Err(SweepError::NotAGitRepository);
        }

        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if root.is_empty() {
            // bare repository: no work tree to sweep from
            return Err(SweepError::NotAGitRepository);
        }
        Ok(Self::new(root))
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C")
            .arg(&self.repo_root)
            .args(args)
            .env("LC_ALL", "C")
            .env("GIT_TERMINAL_PROMPT", "0");
        cmd
    }

    /// Run git and return stdout, or the failure with its stderr
    fn run(&self, args: &[&str]) -> Result<String, SweepError> {
        tracing::debug!(args = ?args, "git");
        let output = self.command(args).output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::debug!(args = ?args, %stderr, "git failed");
            return Err(SweepError::GitCommand {
                command: args.join(" "),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run git and report only whether it succeeded
    fn succeeds(&self, args: &[&str]) -> bool {
        tracing::debug!(args = ?args, "git");
        self.command(args)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

fn local_ref(branch: &str) -> String {
    format!("refs/heads/{}", branch)
}

impl GitBackend for GitCli {
    fn list_local_branches(&self) -> Result<Vec<String>, SweepError> {
        let out = self.run(&["branch", "--list", "--format=%(refname:short)"])?;
        Ok(parse_lines(&out))
    }

    fn current_branch(&self) -> Result<Option<String>, SweepError> {
        let out = self.run(&["branch", "--show-current"])?;
        let name = out.trim();
        Ok((!name.is_empty()).then(|| name.to_string()))
    }

    fn branch_exists(&self, branch: &str) -> bool {
        self.succeeds(&["rev-parse", "--verify", "--quiet", &local_ref(branch)])
    }

    fn list_remotes(&self) -> Result<Vec<String>, SweepError> {
        let out = self.run(&["remote"])?;
        Ok(parse_lines(&out))
    }

    fn remote_default_branch(&self, remote: &str) -> Option<String> {
        let head = format!("refs/remotes/{}/HEAD", remote);
        let out = self
            .run(&["symbolic-ref", "--quiet", "--short", &head])
            .ok()?;
        strip_remote_prefix(out.trim(), remote)
    }

    fn remote_heads(&self, remote: &str) -> Result<HashSet<String>, SweepError> {
        let out = self.run(&["ls-remote", "--heads", remote])?;
        Ok(parse_ls_remote_heads(&out))
    }

    fn fetch_prune(&self, remote: &str) -> Result<(), SweepError> {
        self.run(&["fetch", "--prune", "--quiet", remote]).map(|_| ())
    }

    fn checkout(&self, branch: &str) -> Result<(), SweepError> {
        self.run(&["checkout", "--quiet", branch]).map(|_| ())
    }

    fn pull_ff_only(&self) -> Result<(), SweepError> {
        self.run(&["pull", "--ff-only", "--quiet"]).map(|_| ())
    }

    fn merged_branches(&self, trunk: &str) -> Result<Vec<String>, SweepError> {
        let out = self.run(&[
            "branch",
            "--format=%(refname:short)",
            "--merged",
            &local_ref(trunk),
        ])?;
        Ok(parse_lines(&out))
    }

    fn last_commit(&self, branch: &str) -> Result<CommitInfo, SweepError> {
        let out = self.run(&[
            "log",
            "-1",
            "--format=%ct%x1f%cr%x1f%s",
            &local_ref(branch),
            "--",
        ])?;
        parse_commit_info(&out).ok_or_else(|| SweepError::UnexpectedOutput {
            command: format!("log -1 {}", branch),
            output: out.trim().to_string(),
        })
    }

    fn ahead_behind(&self, trunk: &str, branch: &str) -> Result<(u32, u32), SweepError> {
        let range = format!("{}...{}", local_ref(trunk), local_ref(branch));
        let out = self.run(&["rev-list", "--left-right", "--count", &range])?;
        parse_left_right_count(&out).ok_or_else(|| SweepError::UnexpectedOutput {
            command: format!("rev-list --left-right --count {}", range),
            output: out.trim().to_string(),
        })
    }

    fn trunk_subjects(&self, trunk: &str, limit: usize) -> Result<Vec<String>, SweepError> {
        let max = format!("--max-count={}", limit);
        let out = self.run(&["log", "--format=%s", &max, &local_ref(trunk), "--"])?;
        Ok(parse_lines(&out))
    }

    fn unique_subjects(&self, trunk: &str, branch: &str) -> Result<Vec<String>, SweepError> {
        let range = format!("{}..{}", local_ref(trunk), local_ref(branch));
        let out = self.run(&["log", "--no-merges", "--format=%s", &range, "--"])?;
        Ok(parse_lines(&out))
    }

    fn is_ancestor(&self, branch: &str, trunk: &str) -> Result<bool, SweepError> {
        let (branch_ref, trunk_ref) = (local_ref(branch), local_ref(trunk));
        let args = ["merge-base", "--is-ancestor", branch_ref.as_str(), trunk_ref.as_str()];
        tracing::debug!(args = ?args, "git");
        let output = self.command(&args).output()?;
        // exit 1 means "not an ancestor"; anything else is a real failure
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(SweepError::GitCommand {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }

    fn delete_branch(&self, branch: &str, force: bool) -> Result<(), SweepError> {
        let flag = if force { "-D" } else { "-d" };
        match self.run(&["branch", flag, branch]) {
            Ok(_) => Ok(()),
            Err(SweepError::GitCommand { stderr, .. })
                if stderr.to_lowercase().contains("not fully merged") =>
            {
                Err(SweepError::NotFullyMerged {
                    branch: branch.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }
}

/// Non-empty trimmed lines
pub fn parse_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `%ct<US>%cr<US>%s`
pub fn parse_commit_info(output: &str) -> Option<CommitInfo> {
    let line = output.lines().next()?;
    let mut fields = line.splitn(3, FIELD_SEP);
    let timestamp = fields.next()?.trim().parse::<i64>().ok()?;
    let relative = fields.next()?.trim().to_string();
    let subject = fields.next().unwrap_or("").trim().to_string();
    Some(CommitInfo {
        timestamp,
        relative,
        subject,
    })
}

/// Parse `rev-list --left-right --count trunk...branch` into `(ahead, behind)`
///
/// Git prints the left side (trunk-only, i.e. behind) first.
pub fn parse_left_right_count(output: &str) -> Option<(u32, u32)> {
    let mut parts = output.split_whitespace();
    let behind = parts.next()?.parse().ok()?;
    let ahead = parts.next()?.parse().ok()?;
    Some((ahead, behind))
}

/// Branch names from `ls-remote --heads` output (`<sha>\trefs/heads/<name>`)
pub fn parse_ls_remote_heads(output: &str) -> HashSet<String> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .filter_map(|r| r.strip_prefix("refs/heads/"))
        .map(str::to_string)
        .collect()
}

/// `origin/main` -> `main`
fn strip_remote_prefix(short_ref: &str, remote: &str) -> Option<String> {
    let name = short_ref
        .strip_prefix(remote)
        .and_then(|rest| rest.strip_prefix('/'))?;
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines() {
        assert_eq!(
            parse_lines("main\n  feature/a \n\nfix\n"),
            vec!["main", "feature/a", "fix"]
        );
        assert!(parse_lines("").is_empty());
    }

    #[test]
    fn test_parse_commit_info() {
        let info = parse_commit_info("1700000000\x1f3 weeks ago\x1fAdd login form\n")
            .expect("should parse");
        assert_eq!(info.timestamp, 1_700_000_000);
        assert_eq!(info.relative, "3 weeks ago");
        assert_eq!(info.subject, "Add login form");
        assert_eq!(info.summary(), "3 weeks ago - Add login form");

        // pipes in subjects are preserved
        let info = parse_commit_info("1\x1fnow\x1fa | b").unwrap();
        assert_eq!(info.subject, "a | b");

        assert!(parse_commit_info("").is_none());
        assert!(parse_commit_info("garbage").is_none());
    }

    #[test]
    fn test_parse_left_right_count() {
        assert_eq!(parse_left_right_count("12\t3\n"), Some((3, 12)));
        assert_eq!(parse_left_right_count("0\t0"), Some((0, 0)));
        assert_eq!(parse_left_right_count("x"), None);
    }

    #[test]
    fn test_parse_ls_remote_heads() {
        let out = "abc123\trefs/heads/main\ndef456\trefs/heads/feature/login\n";
        let heads = parse_ls_remote_heads(out);
        assert_eq!(heads.len(), 2);
        assert!(heads.contains("main"));
        assert!(heads.contains("feature/login"));
    }

    #[test]
    fn test_strip_remote_prefix() {
        assert_eq!(
            strip_remote_prefix("origin/main", "origin"),
            Some("main".to_string())
        );
        assert_eq!(strip_remote_prefix("origin/", "origin"), None);
        assert_eq!(strip_remote_prefix("upstream/main", "origin"), None);
    }
}
