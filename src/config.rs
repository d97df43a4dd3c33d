//! User configuration
//!
//! Settings live in `config.yaml` inside the platform config directory
//! (`~/.config/commitree` on Linux). Every field is optional; a missing
//! file means defaults. Command line flags are applied on top.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::avatar::AvatarSource;

const CONFIG_FILE: &str = "config.yaml";

/// Settings read from `config.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of commits loaded into the commits view
    pub max_commits: usize,
    /// Group changed files into folders
    pub view_as_tree: bool,
    /// Expand merge commits into the commits they brought in
    pub show_merge_children: bool,
    /// Avatar service used when the remote host does not decide
    pub avatar_source: AvatarSource,
    /// Refresh views when the repository changes on disk
    pub watch: bool,
    /// Log level for the log file
    pub log_level: String,
    /// git executable
    pub git: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_commits: 30,
            view_as_tree: false,
            show_merge_children: true,
            avatar_source: AvatarSource::Gravatar,
            watch: true,
            log_level: "info".to_string(),
            git: "git".to_string(),
        }
    }
}

/// Values given on the command line, `None` leaves the file's value
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub max_commits: Option<usize>,
    pub view_as_tree: bool,
    pub no_watch: bool,
    pub log_level: Option<String>,
}

impl Config {
    /// Project directories for this application
    pub fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "commitree")
    }

    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from `path`, or from the default location when `None`
    ///
    /// A file that does not exist yields the defaults. A file that exists
    /// but cannot be read or parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&data).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse YAML text; an empty document is the defaults
    pub fn parse(data: &str) -> Result<Self> {
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(data)?)
    }

    /// Apply command line overrides
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(max) = overrides.max_commits {
            self.max_commits = max;
        }
        if overrides.view_as_tree {
            self.view_as_tree = true;
        }
        if overrides.no_watch {
            self.watch = false;
        }
        if let Some(level) = &overrides.log_level {
            self.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(Some(&dir.path().join("nope.yaml"))).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.max_commits, 30);
        assert!(config.show_merge_children);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "max_commits: 100\navatar_source: github\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.max_commits, 100);
        assert_eq!(config.avatar_source, AvatarSource::Github);
        assert!(!config.view_as_tree);
        assert_eq!(config.git, "git");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "max_commits: [oops\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn test_empty_file() {
        assert_eq!(Config::parse("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply(&Overrides {
            max_commits: Some(5),
            view_as_tree: true,
            no_watch: true,
            log_level: Some("debug".to_string()),
        });

        assert_eq!(config.max_commits, 5);
        assert!(config.view_as_tree);
        assert!(!config.watch);
        assert_eq!(config.log_level, "debug");

        let mut untouched = Config::default();
        untouched.apply(&Overrides::default());
        assert_eq!(untouched, Config::default());
    }
}
