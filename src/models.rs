use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Next status in the pending → in_progress → completed → pending cycle.
    pub fn next(self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }

    /// Lenient parse used when loading stored records. Unknown values are pending.
    pub fn from_stored(value: &str) -> Self {
        match value {
            "in_progress" => TaskStatus::InProgress,
            "completed" => TaskStatus::Completed,
            _ => TaskStatus::Pending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            TaskStatus::Pending => "○",
            TaskStatus::InProgress => "◐",
            TaskStatus::Completed => "●",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub content: String,
    pub status: TaskStatus,
}

impl Task {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            status: TaskStatus::Pending,
        }
    }

    pub fn toggle(&mut self) {
        self.status = self.status.next();
    }

    pub fn is_open(&self) -> bool {
        self.status != TaskStatus::Completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitStatus {
    Clean,
    Dirty,
    NoGit,
}

impl GitStatus {
    pub fn icon(self) -> &'static str {
        match self {
            GitStatus::Clean => "✓",
            GitStatus::Dirty => "●",
            GitStatus::NoGit => "○",
        }
    }
}

/// Composite git state gathered for one table row.
#[derive(Debug, Clone, PartialEq)]
pub struct GitInfo {
    pub status: GitStatus,
    pub branch: Option<String>,
    pub last_commit: Option<LastCommit>,
    pub remote_url: Option<String>,
    pub dirty_count: usize,
}

impl GitInfo {
    pub fn no_git() -> Self {
        Self {
            status: GitStatus::NoGit,
            branch: None,
            last_commit: None,
            remote_url: None,
            dirty_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LastCommit {
    pub date: Option<DateTime<FixedOffset>>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub short_hash: String,
    pub message: String,
    pub date: DateTime<FixedOffset>,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewRequest {
    pub number: u64,
    pub title: String,
    #[serde(rename = "headRefName")]
    pub branch: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: String,
    pub path: PathBuf,
    pub git_status: GitStatus,
    pub branch: Option<String>,
    pub last_commit_date: Option<DateTime<FixedOffset>>,
    pub last_commit_message: Option<String>,
    pub remote_url: Option<String>,
    pub todo_count: usize,
    pub pr_count: usize,
}

impl Project {
    /// A row with no git data yet.
    pub fn bare(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            git_status: GitStatus::NoGit,
            branch: None,
            last_commit_date: None,
            last_commit_message: None,
            remote_url: None,
            todo_count: 0,
            pr_count: 0,
        }
    }

    pub fn last_commit_label(&self) -> String {
        self.last_commit_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}
