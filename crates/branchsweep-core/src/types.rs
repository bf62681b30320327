//! Core data types for branchsweep

use serde::{Deserialize, Serialize};

/// Default stale-age threshold in days
pub const DEFAULT_STALE_DAYS: u32 = 90;

/// Default behind-trunk threshold in commits
pub const DEFAULT_BEHIND_COMMITS: u32 = 50;

/// Classification of a branch relative to trunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchStatus {
    /// Recent or diverged work; never offered for deletion
    Active,
    /// No recent activity, or far behind trunk with nothing of its own
    Stale,
    /// Merged or squash-merged into trunk; safe to delete
    Deprecated,
}

impl std::fmt::Display for BranchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BranchStatus::Active => write!(f, "active"),
            BranchStatus::Stale => write!(f, "stale"),
            BranchStatus::Deprecated => write!(f, "deprecated"),
        }
    }
}

/// A classified branch, as shown to the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRecord {
    /// Local branch name
    pub name: String,
    /// Deletion classification
    pub status: BranchStatus,
    /// Human-readable reasons behind the status
    pub reasons: Vec<String>,
    /// Relative date and subject of the tip commit
    pub last_commit: String,
}

/// Raw observations about a single branch, gathered from git
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BranchFacts {
    pub name: String,
    /// Tip is reachable from trunk
    pub merged: bool,
    /// Branch of the same name exists on the remote
    pub remote_exists: bool,
    /// Whole days since the tip commit
    pub age_days: i64,
    /// Commits on the branch that trunk lacks
    pub ahead: u32,
    /// Commits on trunk that the branch lacks
    pub behind: u32,
    /// Trunk subject that matched the squash heuristic, if any
    pub squash_match: Option<String>,
    /// Relative date and subject of the tip commit
    pub last_commit: String,
}

/// Thresholds that decide staleness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Branches whose last commit is older than this are stale
    pub stale_days: u32,
    /// Branches further behind trunk than this, with nothing ahead, are stale
    pub behind_commits: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            stale_days: DEFAULT_STALE_DAYS,
            behind_commits: DEFAULT_BEHIND_COMMITS,
        }
    }
}

/// Group of records selected for deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Deprecated and stale
    All,
    Deprecated,
    Stale,
}

impl Category {
    /// Whether a record with `status` belongs to this category
    pub fn includes(self, status: BranchStatus) -> bool {
        match self {
            Category::All => matches!(status, BranchStatus::Deprecated | BranchStatus::Stale),
            Category::Deprecated => status == BranchStatus::Deprecated,
            Category::Stale => status == BranchStatus::Stale,
        }
    }

    /// Names of the records in this category, in report order
    pub fn select(self, records: &[BranchRecord]) -> Vec<String> {
        records
            .iter()
            .filter(|r| self.includes(r.status))
            .map(|r| r.name.clone())
            .collect()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::All => write!(f, "all"),
            Category::Deprecated => write!(f, "deprecated"),
            Category::Stale => write!(f, "stale"),
        }
    }
}

/// "branch" or "branches" to follow `count`
pub fn branch_noun(count: usize) -> &'static str {
    if count == 1 { "branch" } else { "branches" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, status: BranchStatus) -> BranchRecord {
        BranchRecord {
            name: name.to_string(),
            status,
            reasons: vec![],
            last_commit: String::new(),
        }
    }

    #[test]
    fn test_category_select() {
        let records = vec![
            record("a", BranchStatus::Deprecated),
            record("b", BranchStatus::Stale),
            record("c", BranchStatus::Deprecated),
        ];

        assert_eq!(Category::All.select(&records), vec!["a", "b", "c"]);
        assert_eq!(Category::Deprecated.select(&records), vec!["a", "c"]);
        assert_eq!(Category::Stale.select(&records), vec!["b"]);
        assert!(!Category::All.includes(BranchStatus::Active));
    }

    #[test]
    fn test_branch_noun() {
        assert_eq!(branch_noun(0), "branches");
        assert_eq!(branch_noun(1), "branch");
        assert_eq!(branch_noun(2), "branches");
    }

    #[test]
    fn test_display_is_lowercase() {
        assert_eq!(BranchStatus::Deprecated.to_string(), "deprecated");
        assert_eq!(Category::Stale.to_string(), "stale");
    }
}
