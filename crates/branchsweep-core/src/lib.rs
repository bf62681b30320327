//! branchsweep-core: branch classification and cleanup on top of the git CLI
//!
//! This crate holds everything except terminal rendering: git access,
//! configuration, the classifier, the deletion executor, and the menu logic.

/// Core error types for branchsweep operations
pub mod error;

/// Configuration handling
pub mod config;

/// Core data types (BranchRecord, BranchStatus, Thresholds, etc.)
pub mod types;

/// Git CLI wrapper and the backend trait
pub mod git;

/// Trunk branch detection
pub mod trunk;

/// Squash-merge heuristic
pub mod squash;

/// Branch classification
pub mod classify;

/// Deletion executor
pub mod delete;

/// Operator interaction trait
pub mod interaction;

/// Interactive menu
pub mod menu;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenience
pub use classify::{ClassifyReport, Classifier, SkippedBranch, classify};
pub use config::{Protection, SweepConfig};
pub use delete::{
    DeleteHooks, DeleteOutcome, DeletePolicy, DeleteReport, DeleteResult, NonInteractive,
    delete_branches,
};
pub use error::SweepError;
pub use git::{CommitInfo, GitBackend, GitCli};
pub use interaction::{InteractionAdapter, InteractionError, InteractionResult};
pub use menu::{MenuChoice, MenuOutcome, run_menu};
pub use trunk::detect_trunk;
pub use types::{BranchFacts, BranchRecord, BranchStatus, Category, Thresholds, branch_noun};
