//! Runtime configuration.
//!
//! Resolved in three layers, later layers winning: built-in defaults relative
//! to the home directory, an optional TOML file, then command-line flags and
//! their environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::system::git::GIT_TIMEOUT;
use crate::system::github::GH_TIMEOUT;
use crate::tmux::LaunchCommands;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub hangar_dir: PathBuf,
    pub stash_dir: PathBuf,
    pub todos_dir: PathBuf,
    pub guide_path: PathBuf,
    pub log_dir: PathBuf,
    pub commands: LaunchCommands,
    pub git_timeout: Duration,
    pub gh_timeout: Duration,
}

/// Shape of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub hangar_dir: Option<PathBuf>,
    pub stash_dir: Option<PathBuf>,
    pub todos_dir: Option<PathBuf>,
    pub guide: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub editor: Option<String>,
    pub assistant: Option<String>,
    pub review_tool: Option<String>,
    pub git_timeout_secs: Option<u64>,
    pub gh_timeout_secs: Option<u64>,
}

/// Path overrides from the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub hangar_dir: Option<PathBuf>,
    pub stash_dir: Option<PathBuf>,
    pub todos_dir: Option<PathBuf>,
    pub guide: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn defaults_for(home: &Path) -> Self {
        let hangar_dir = home.join("Hangar");
        Self {
            stash_dir: home.join("Stash"),
            todos_dir: hangar_dir.join(".claude").join("todos"),
            guide_path: hangar_dir.join("CLAUDE.md"),
            log_dir: home.join(".hangar").join("logs"),
            hangar_dir,
            commands: LaunchCommands::default(),
            git_timeout: GIT_TIMEOUT,
            gh_timeout: GH_TIMEOUT,
        }
    }

    /// Resolve the full configuration. An explicitly named config file must
    /// exist; the default one is optional.
    pub fn load(explicit_file: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let home = home_dir();
        let mut config = Self::defaults_for(&home);

        let file = match explicit_file {
            Some(path) => Some(read_file_config(path)?),
            None => {
                let default_path = default_config_path(&home);
                if default_path.is_file() {
                    Some(read_file_config(&default_path)?)
                } else {
                    None
                }
            }
        };
        if let Some(file) = file {
            config.apply_file(file, &home);
        }
        config.apply_overrides(overrides, &home);
        Ok(config)
    }

    pub fn apply_file(&mut self, file: FileConfig, home: &Path) {
        let expand = |p: PathBuf| expand_home(&p, home);
        if let Some(dir) = file.hangar_dir {
            self.hangar_dir = expand(dir);
        }
        if let Some(dir) = file.stash_dir {
            self.stash_dir = expand(dir);
        }
        if let Some(dir) = file.todos_dir {
            self.todos_dir = expand(dir);
        }
        if let Some(path) = file.guide {
            self.guide_path = expand(path);
        }
        if let Some(dir) = file.log_dir {
            self.log_dir = expand(dir);
        }
        if let Some(editor) = file.editor {
            self.commands.editor = editor;
        }
        if let Some(assistant) = file.assistant {
            self.commands.assistant = assistant;
        }
        if let Some(review_tool) = file.review_tool {
            self.commands.review_tool = review_tool;
        }
        if let Some(secs) = file.git_timeout_secs {
            self.git_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.gh_timeout_secs {
            self.gh_timeout = Duration::from_secs(secs);
        }
    }

    pub fn apply_overrides(&mut self, overrides: Overrides, home: &Path) {
        let slots = [
            (overrides.hangar_dir, &mut self.hangar_dir),
            (overrides.stash_dir, &mut self.stash_dir),
            (overrides.todos_dir, &mut self.todos_dir),
            (overrides.guide, &mut self.guide_path),
            (overrides.log_dir, &mut self.log_dir),
        ];
        for (value, slot) in slots {
            if let Some(value) = value {
                *slot = expand_home(&value, home);
            }
        }
    }
}

pub fn parse_file_config(text: &str) -> Result<FileConfig> {
    toml::from_str(text).context("invalid config file")
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_file_config(&text).with_context(|| format!("in {}", path.display()))
}

/// `~/.config/hangar/config.toml`
pub fn default_config_path(home: &Path) -> PathBuf {
    home.join(".config").join("hangar").join("config.toml")
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Expand a leading `~` to `home`.
pub fn expand_home(path: &Path, home: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
