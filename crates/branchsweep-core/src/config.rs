//! Configuration handling for branchsweep
//!
//! Settings are layered: built-in defaults, then the user's global
//! `config.toml`, then the repository's `.branchsweep.toml`. Command-line
//! flags are applied on top by the binary.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SweepError;
use crate::types::Thresholds;

/// File name of the per-repository configuration
pub const REPO_CONFIG_FILE: &str = ".branchsweep.toml";

/// Configuration file as written on disk; every key is optional
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub sweep: PartialSweepConfig,
}

/// One layer of `[sweep]` settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialSweepConfig {
    pub trunk: Option<String>,
    pub remote: Option<String>,
    pub stale_days: Option<u32>,
    pub behind_commits: Option<u32>,
    pub protected: Option<Vec<String>>,
    pub squash_detection: Option<bool>,
    pub squash_scan_depth: Option<usize>,
    pub fetch: Option<bool>,
}

/// Effective settings after all layers are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    /// Explicit trunk; detected when `None`
    pub trunk: Option<String>,
    /// Remote probed for branch presence
    pub remote: String,
    pub thresholds: Thresholds,
    /// Branch name patterns (`*` wildcard) that are never touched
    pub protected: Vec<String>,
    pub squash_detection: bool,
    /// How many trunk subjects the squash heuristic scans
    pub squash_scan_depth: usize,
    /// Run `git fetch --prune` before classifying
    pub fetch: bool,
}

fn default_protected() -> Vec<String> {
    ["main", "master", "develop", "release/*"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            trunk: None,
            remote: "origin".to_string(),
            thresholds: Thresholds::default(),
            protected: default_protected(),
            squash_detection: true,
            squash_scan_depth: 1000,
            fetch: true,
        }
    }
}

impl SweepConfig {
    /// Load defaults, then the global file, then the repository file
    pub fn load(repo_root: &Path) -> Result<Self, SweepError> {
        let mut paths = Vec::new();
        if let Some(global) = global_config_path() {
            paths.push(global);
        }
        paths.push(repo_root.join(REPO_CONFIG_FILE));
        Self::load_from(&paths)
    }

    /// Apply each existing file in `paths`, later files winning
    pub fn load_from(paths: &[PathBuf]) -> Result<Self, SweepError> {
        let mut config = Self::default();
        for path in paths {
            if !path.exists() {
                continue;
            }
            let layer = read_config_file(path)?;
            tracing::debug!(path = %path.display(), "loaded config layer");
            config.apply(layer.sweep);
        }
        Ok(config)
    }

    /// Overlay the keys present in `layer`
    pub fn apply(&mut self, layer: PartialSweepConfig) {
        if let Some(trunk) = layer.trunk.filter(|t| !t.trim().is_empty()) {
            self.trunk = Some(trunk);
        }
        if let Some(remote) = layer.remote.filter(|r| !r.trim().is_empty()) {
            self.remote = remote;
        }
        if let Some(days) = layer.stale_days {
            self.thresholds.stale_days = days;
        }
        if let Some(behind) = layer.behind_commits {
            self.thresholds.behind_commits = behind;
        }
        if let Some(protected) = layer.protected {
            self.protected = protected;
        }
        if let Some(squash) = layer.squash_detection {
            self.squash_detection = squash;
        }
        if let Some(depth) = layer.squash_scan_depth {
            self.squash_scan_depth = depth;
        }
        if let Some(fetch) = layer.fetch {
            self.fetch = fetch;
        }
    }

    /// Compile the protected patterns for matching
    pub fn protection(&self) -> Protection {
        Protection::new(&self.protected)
    }
}

/// Path of the user's global configuration file
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("branchsweep").join("config.toml"))
}

fn read_config_file(path: &Path) -> Result<ConfigFile, SweepError> {
    let raw = fs::read_to_string(path).map_err(|e| SweepError::Config {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    toml::from_str(&raw).map_err(|e| SweepError::Config {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Compiled set of protected branch patterns
#[derive(Debug, Clone)]
pub struct Protection {
    patterns: Vec<Regex>,
}

impl Protection {
    /// Build from glob-style patterns where `*` matches any run of characters
    pub fn new(patterns: &[String]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|p| {
                let body = regex::escape(p.trim()).replace(r"\*", ".*");
                Regex::new(&format!("^{}$", body)).ok()
            })
            .collect();
        Self { patterns }
    }

    pub fn is_protected(&self, branch: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(branch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SweepConfig::default();
        assert_eq!(config.remote, "origin");
        assert_eq!(config.thresholds.stale_days, 90);
        assert_eq!(config.thresholds.behind_commits, 50);
        assert!(config.squash_detection);
        assert!(config.fetch);
        assert!(config.trunk.is_none());
    }

    #[test]
    fn test_layers_override_in_order() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let global = dir.path().join("global.toml");
        let repo = dir.path().join(REPO_CONFIG_FILE);
        fs::write(&global, "[sweep]\nstale_days = 30\nremote = \"upstream\"\n").unwrap();
        fs::write(&repo, "[sweep]\nstale_days = 14\nprotected = [\"keep/*\"]\n").unwrap();

        let config = SweepConfig::load_from(&[global, repo]).expect("config should load");
        assert_eq!(config.thresholds.stale_days, 14);
        assert_eq!(config.remote, "upstream");
        assert_eq!(config.protected, vec!["keep/*".to_string()]);
        assert_eq!(config.thresholds.behind_commits, 50);
    }

    #[test]
    fn test_missing_files_are_skipped() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let config = SweepConfig::load_from(&[dir.path().join("nope.toml")]).unwrap();
        assert_eq!(config, SweepConfig::default());
    }

    #[test]
    fn test_unknown_key_is_config_error() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join(REPO_CONFIG_FILE);
        fs::write(&path, "[sweep]\nstale_dayz = 3\n").unwrap();

        let err = SweepConfig::load_from(&[path]).unwrap_err();
        assert_eq!(err.code(), "E005");
        }

    #[test]
    fn test_blank_trunk_is_ignored() {
        let mut config = SweepConfig::default();
        config.apply(PartialSweepConfig {
            trunk: Some("  ".to_string()),
            ..Default::default()
        });
        assert!(config.trunk.is_none());
    }

    #[test]
    fn test_protection_patterns() {
        let protection = Protection::new(&[
            "main".to_string(),
            "release/*".to_string(),
            "hotfix.1".to_string(),
        ]);
        assert!(protection.is_protected("main"));
        assert!(protection.is_protected("release/2.0"));
        assert!(protection.is_protected("hotfix.1"));
        assert!(!protection.is_protected("hotfixx1"));
        assert!(!protection.is_protected("mainline"));
        assert!(!protection.is_protected("feature/release/x"));
    }
}
