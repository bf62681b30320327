//! Error types for branchsweep operations

use thiserror::Error;

/// Core error type for branchsweep operations
#[derive(Error, Debug)]
pub enum SweepError {
    // === Environment errors (E001-E005) ===
    /// E001: git binary missing from PATH
    #[error("E001: git is not installed or not found in PATH")]
    GitNotInstalled,

    /// E002: Working directory is not inside a git repository
    #[error("E002: not inside a git repository")]
    NotAGitRepository,

    /// E003: No trunk could be detected
    #[error("E003: cannot determine trunk branch (use --trunk or set `trunk` in .branchsweep.toml)")]
    TrunkNotDetected,

    /// E004: Named trunk does not exist locally
    #[error("E004: trunk branch not found: {branch}")]
    TrunkNotFound { branch: String },

    /// E005: Configuration file could not be read or parsed
    #[error("E005: configuration error in {path}: {message}")]
    Config { path: String, message: String },

    // === Per-branch errors (E010-E012) ===
    /// E010: Soft delete refused because the branch has unmerged commits
    #[error("E010: branch '{branch}' is not fully merged")]
    NotFullyMerged { branch: String },

    /// E011: A git subcommand exited unsuccessfully
    #[error("E011: git {command} failed: {stderr}")]
    GitCommand { command: String, stderr: String },

    /// E012: git produced output we could not interpret
    #[error("E012: unexpected output from git {command}: {output}")]
    UnexpectedOutput { command: String, output: String },

    // === Interaction errors (E020-E021) ===
    /// E020: Operator cancelled with Ctrl+C
    #[error("E020: cancelled by user")]
    Cancelled,

    /// E021: Prompt could not be shown or read
    #[error("E021: prompt failed: {0}")]
    Prompt(String),

    // === IO and system errors ===
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SweepError {
    /// Get the error code (e.g., "E001", "E010")
    pub fn code(&self) -> &'static str {
        match self {
            SweepError::GitNotInstalled => "E001",
            SweepError::NotAGitRepository => "E002",
            SweepError::TrunkNotDetected => "E003",
            SweepError::TrunkNotFound { .. } => "E004",
            SweepError::Config { .. } => "E005",
            SweepError::NotFullyMerged { .. } => "E010",
            SweepError::GitCommand { .. } => "E011",
            SweepError::UnexpectedOutput { .. } => "E012",
            SweepError::Cancelled => "E020",
            SweepError::Prompt(_) => "E021",
            SweepError::Io(_) => "E030",
        }
    }

    /// Get the exit code for this error type
    ///
    /// Every failure that reaches the top level exits 1. Cancellation is a
    /// clean stop and exits 0.
    pub fn exit_code(&self) -> i32 {
        match self {
            SweepError::Cancelled => 0,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = SweepError::NotAGitRepository;
        assert_eq!(err.code(), "E002");
        assert_eq!(err.exit_code(), 1);

        let err = SweepError::NotFullyMerged {
            branch: "feature/x".to_string(),
        };
        assert_eq!(err.code(), "E010");

        let err = SweepError::Cancelled;
        assert_eq!(err.code(), "E020");
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_error_display() {
        let err = SweepError::TrunkNotFound {
            branch: "trunk".to_string(),
        };
        assert_eq!(err.to_string(), "E004: trunk branch not found: trunk");

        let err = SweepError::GitCommand {
            command: "branch -d topic".to_string(),
            stderr: "error: branch not found".to_string(),
        };
        assert!(err.to_string().contains("git branch -d topic failed"));
    }
}
