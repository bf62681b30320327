//! Squash-merge heuristic
//!
//! A squash merge leaves no ancestry link between the branch and trunk, so
//! `git branch --merged` cannot see it. Instead, commit subjects are
//! compared against trunk's recent history. This is best effort: reworded
//! squash commits are missed, and a branch that happens to reuse a trunk
//! subject is flagged.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Trailing pull-request reference GitHub and GitLab append, e.g. ` (#123)`
static PR_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\((?:#|!)\d+\)\s*$").expect("valid regex"));

/// `Merge pull request #12 from owner/feature-x`
static MERGE_PR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Merge pull request #\d+ from [^/\s]+/(\S+)").expect("valid regex")
});

/// `Merge branch 'feature-x' into main`
static MERGE_BRANCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Merge branch '([^']+)'").expect("valid regex"));

/// Normalize a subject for comparison
pub fn normalize_subject(subject: &str) -> String {
    PR_SUFFIX
        .replace(subject.trim(), "")
        .trim()
        .to_lowercase()
}

/// Branch name a merge-commit subject refers to, if it is one
pub fn merged_branch_name(subject: &str) -> Option<String> {
    MERGE_PR
        .captures(subject)
        .or_else(|| MERGE_BRANCH.captures(subject))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Index over trunk's recent subjects
#[derive(Debug, Default)]
pub struct SquashDetector {
    /// normalized subject -> original subject
    subjects: HashMap<String, String>,
    /// branch named in a merge subject -> original subject
    merge_mentions: HashMap<String, String>,
}

impl SquashDetector {
    /// Build from trunk subjects, newest first
    pub fn new(trunk_subjects: &[String]) -> Self {
        let mut detector = Self::default();
        for subject in trunk_subjects {
            if let Some(branch) = merged_branch_name(subject) {
                detector
                    .merge_mentions
                    .entry(branch)
                    .or_insert_with(|| subject.clone());
            }
            let key = normalize_subject(subject);
            if !key.is_empty() {
                detector.subjects.entry(key).or_insert_with(|| subject.clone());
            }
        }
        detector
    }

    /// Trunk subject suggesting `branch` was squash-merged
    ///
    /// `branch_subjects` are the branch's own non-merge subjects, newest
    /// first. A branch with nothing of its own is never squash-suspected.
    pub fn detect(&self, branch: &str, branch_subjects: &[String]) -> Option<String> {
        if branch_subjects.is_empty() {
            return None;
        }
        if let Some(subject) = self.merge_mentions.get(branch) {
            return Some(subject.clone());
        }

        let newest = branch_subjects.first();
        let oldest = branch_subjects.last();
        [newest, oldest]
            .into_iter()
            .flatten()
            .find_map(|s| self.subjects.get(&normalize_subject(s)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subjects(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_subject() {
        assert_eq!(normalize_subject("  Add login form (#42) "), "add login form");
        assert_eq!(normalize_subject("Fix typo (!7)"), "fix typo");
        assert_eq!(normalize_subject("Refs (#issue) stay"), "refs (#issue) stay");
    }

    #[test]
    fn test_merged_branch_name() {
        assert_eq!(
            merged_branch_name("Merge pull request #12 from octo/feature-x"),
            Some("feature-x".to_string())
        );
        assert_eq!(
            merged_branch_name("Merge pull request #3 from octo/team/feature-y"),
            Some("team/feature-y".to_string())
        );
        assert_eq!(
            merged_branch_name("Merge branch 'hotfix' into main"),
            Some("hotfix".to_string())
        );
        assert_eq!(merged_branch_name("Add merge support"), None);
    }

    #[test]
    fn test_detects_squashed_tip_subject() {
        let detector = SquashDetector::new(&subjects(&[
            "Bump version",
            "Add login form (#42)",
            "Initial commit",
        ]));
        let found = detector.detect("login", &subjects(&["Add login form"]));
        assert_eq!(found.as_deref(), Some("Add login form (#42)"));
    }

    #[test]
    fn test_detects_oldest_subject_used_as_title() {
        let detector = SquashDetector::new(&subjects(&["Start billing export (#9)"]));
        let found = detector.detect(
            "billing",
            &subjects(&["address review", "fix tests", "Start billing export"]),
        );
        assert!(found.is_some());
    }

    #[test]
    fn test_detects_merge_mention() {
        let detector =
            SquashDetector::new(&subjects(&["Merge pull request #5 from octo/cleanup"]));
        assert!(detector.detect("cleanup", &subjects(&["wip"])).is_some());
        assert!(detector.detect("other", &subjects(&["wip"])).is_none());
    }

    #[test]
    fn test_no_match_for_unrelated_work() {
        let detector = SquashDetector::new(&subjects(&["Add login form (#42)"]));
        assert!(
            detector
                .detect("search", &subjects(&["Add search index", "Tune ranking"]))
                .is_none()
        );
    }

    #[test]
    fn test_empty_branch_is_never_suspected() {
        let detector = SquashDetector::new(&subjects(&["Merge branch 'topic'"]));
        assert!(detector.detect("topic", &[]).is_none());
    }
}
