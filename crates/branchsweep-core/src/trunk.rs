//! Trunk branch detection

use crate::error::SweepError;
use crate::git::GitBackend;

/// Local branch names tried when nothing else identifies trunk
const FALLBACK_TRUNKS: [&str; 2] = ["main", "master"];

/// Resolve the trunk branch
///
/// An explicit name (flag or config) must exist locally. Otherwise the
/// remote's HEAD is used, then the first of `main`/`master` that exists.
pub fn detect_trunk(
    git: &impl GitBackend,
    explicit: Option<&str>,
    remote: &str,
) -> Result<String, SweepError> {
    if let Some(name) = explicit {
        if git.branch_exists(name) {
            return Ok(name.to_string());
        }
        return Err(SweepError::TrunkNotFound {
            branch: name.to_string(),
        });
    }

    if let Some(name) = git.remote_default_branch(remote) {
        if git.branch_exists(&name) {
            tracing::debug!(trunk = %name, remote, "trunk from remote HEAD");
            return Ok(name);
        }
        tracing::debug!(branch = %name, "remote HEAD branch has no local counterpart");
    }

    FALLBACK_TRUNKS
        .iter()
        .find(|name| git.branch_exists(name))
        .map(|name| name.to_string())
        .ok_or(SweepError::TrunkNotDetected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeGit;

    #[test]
    fn test_explicit_trunk_must_exist() {
        let git = FakeGit::new("main").with_branch("develop");
        assert_eq!(detect_trunk(&git, Some("develop"), "origin").unwrap(), "develop");

        let err = detect_trunk(&git, Some("trunk"), "origin").unwrap_err();
        assert_eq!(err.code(), "E004");
    }

    #[test]
    fn test_remote_head_wins_over_fallbacks() {
        let git = FakeGit::new("main")
            .with_branch("develop")
            .with_remote_head("develop");
        assert_eq!(detect_trunk(&git, None, "origin").unwrap(), "develop");
    }

    #[test]
    fn test_falls_back_to_master() {
        let git = FakeGit::new("master").with_remote_head("main");
        assert_eq!(detect_trunk(&git, None, "origin").unwrap(), "master");
    }

    #[test]
    fn test_no_trunk_detected() {
        let git = FakeGit::new("trunk");
        let err = detect_trunk(&git, None, "origin").unwrap_err();
        assert_eq!(err.code(), "E003");
    }
}
