use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::models::Project;
use crate::system::git::VcsInspector;
use crate::todos::TaskStore;

/// Directory names that never show up as projects.
pub const EXCLUDED_DIRS: [&str; 3] = [".claude", ".DS_Store", ".git"];

/// README candidates, most likely first.
const README_NAMES: [&str; 5] = ["README.md", "README", "readme.md", "Readme.md", "README.txt"];

/// Which project root the table is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Hangar,
    Stash,
}

impl View {
    pub fn toggle(self) -> Self {
        match self {
            View::Hangar => View::Stash,
            View::Stash => View::Hangar,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            View::Hangar => "Hangar",
            View::Stash => "Stash",
        }
    }
}

/// Sorted names of the project directories directly under `base`.
/// Creates `base` when it does not exist yet.
pub fn list_project_dirs(base: &Path) -> Result<Vec<PathBuf>> {
    if !base.exists() {
        std::fs::create_dir_all(base)
            .with_context(|| format!("failed to create {}", base.display()))?;
    }
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(base)
        .with_context(|| format!("failed to read {}", base.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter(|entry| {
            let name = entry.file_name();
            !EXCLUDED_DIRS.iter().any(|excluded| name == *excluded)
        })
        .map(|entry| entry.path())
        .collect();
    dirs.sort();
    Ok(dirs)
}

/// Build one table row per project directory. External commands run one at a
/// time; PRs are only queried for projects with a remote.
pub async fn scan(
    base: &Path,
    inspector: &dyn VcsInspector,
    tasks: &TaskStore,
) -> Result<Vec<Project>> {
    let dirs = list_project_dirs(base)?;
    let mut projects = Vec::with_capacity(dirs.len());
    for path in dirs {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let info = inspector.inspect(&path).await;
        let pr_count = if info.remote_url.is_some() {
            inspector.open_review_requests(&path).await.len()
        } else {
            0
        };
        let (last_commit_date, last_commit_message) = match info.last_commit {
            Some(commit) => (commit.date, Some(commit.message)),
            None => (None, None),
        };
        projects.push(Project {
            todo_count: tasks.pending_count(&name),
            name,
            path,
            git_status: info.status,
            branch: info.branch,
            last_commit_date,
            last_commit_message,
            remote_url: info.remote_url,
            pr_count,
        });
    }
    debug!(base = %base.display(), count = projects.len(), "scanned projects");
    Ok(projects)
}

/// Move a project directory into `dest_base`, returning its new path.
/// Refuses to overwrite an existing directory of the same name.
pub fn move_project(path: &Path, dest_base: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .with_context(|| format!("{} has no directory name", path.display()))?;
    std::fs::create_dir_all(dest_base)
        .with_context(|| format!("failed to create {}", dest_base.display()))?;
    let dest = dest_base.join(name);
    if dest.exists() {
        bail!("{} already exists", dest.display());
    }
    std::fs::rename(path, &dest).with_context(|| {
        format!("failed to move {} to {}", path.display(), dest.display())
    })?;
    info!(from = %path.display(), to = %dest.display(), "moved project");
    Ok(dest)
}

pub fn find_readme(path: &Path) -> Option<PathBuf> {
    README_NAMES
        .iter()
        .map(|name| path.join(name))
        .find(|candidate| candidate.is_file())
}
