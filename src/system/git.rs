use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Local};

use crate::models::{Commit, GitInfo, GitStatus, LastCommit, ReviewRequest};
use crate::system::github;
use crate::system::process::run_command;

/// Default timeout for git queries.
pub const GIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Date layout produced by git's `%ci` placeholder.
const COMMIT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Read-only queries against a project's version control.
/// Every method degrades to an empty value when the tool fails.
#[async_trait]
pub trait VcsInspector: Send + Sync {
    async fn is_repository(&self, path: &Path) -> bool;
    async fn current_branch(&self, path: &Path) -> Option<String>;
    async fn last_commit(&self, path: &Path) -> Option<LastCommit>;
    async fn recent_commits(&self, path: &Path, limit: usize) -> Vec<Commit>;
    async fn remote_url(&self, path: &Path) -> Option<String>;
    async fn dirty_file_count(&self, path: &Path) -> usize;
    async fn open_review_requests(&self, path: &Path) -> Vec<ReviewRequest>;

    /// Everything a table row needs, one query at a time.
    async fn inspect(&self, path: &Path) -> GitInfo {
        if !self.is_repository(path).await {
            return GitInfo::no_git();
        }
        let branch = self.current_branch(path).await;
        let last_commit = self.last_commit(path).await;
        let remote_url = self.remote_url(path).await;
        let dirty_count = self.dirty_file_count(path).await;
        let status = if dirty_count > 0 {
            GitStatus::Dirty
        } else {
            GitStatus::Clean
        };
        GitInfo {
            status,
            branch,
            last_commit,
            remote_url,
            dirty_count,
        }
    }
}

/// `git` for repository state, `gh` for pull requests.
pub struct GitInspector {
    git_timeout: Duration,
    gh_timeout: Duration,
}

impl Default for GitInspector {
    fn default() -> Self {
        Self::new(GIT_TIMEOUT, github::GH_TIMEOUT)
    }
}

impl GitInspector {
    pub fn new(git_timeout: Duration, gh_timeout: Duration) -> Self {
        Self {
            git_timeout,
            gh_timeout,
        }
    }

    async fn run_git(&self, path: &Path, args: &[&str]) -> Option<String> {
        let path_str = path.to_string_lossy();
        let mut full_args = vec!["-C", path_str.as_ref()];
        full_args.extend_from_slice(args);
        let outcome = run_command("git", &full_args, None, self.git_timeout).await;
        outcome.output().map(str::to_string)
    }
}

#[async_trait]
impl VcsInspector for GitInspector {
    async fn is_repository(&self, path: &Path) -> bool {
        path.join(".git").is_dir()
    }

    async fn current_branch(&self, path: &Path) -> Option<String> {
        self.run_git(path, &["rev-parse", "--abbrev-ref", "HEAD"])
            .await
            .filter(|b| !b.is_empty())
    }

    async fn last_commit(&self, path: &Path) -> Option<LastCommit> {
        let line = self.run_git(path, &["log", "-1", "--format=%ci|%s"]).await?;
        parse_last_commit(&line)
    }

    async fn recent_commits(&self, path: &Path, limit: usize) -> Vec<Commit> {
        let count = format!("-{limit}");
        match self
            .run_git(path, &["log", &count, "--format=%H|%s|%ci|%an"])
            .await
        {
            Some(output) => parse_commit_log(&output),
            None => Vec::new(),
        }
    }

    async fn remote_url(&self, path: &Path) -> Option<String> {
        self.run_git(path, &["remote", "get-url", "origin"])
            .await
            .filter(|u| !u.is_empty())
    }

    async fn dirty_file_count(&self, path: &Path) -> usize {
        self.run_git(path, &["status", "--porcelain"])
            .await
            .map(|out| count_porcelain_entries(&out))
            .unwrap_or(0)
    }

    async fn open_review_requests(&self, path: &Path) -> Vec<ReviewRequest> {
        github::list_review_requests(path, self.gh_timeout).await
    }
}

pub fn parse_commit_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(raw.trim(), COMMIT_DATE_FORMAT).ok()
}

/// Parse `git log -1 --format=%ci|%s`. Lines without the separator are ignored;
/// an unparsable date keeps the message.
pub fn parse_last_commit(line: &str) -> Option<LastCommit> {
    let (date, message) = line.split_once('|')?;
    Some(LastCommit {
        date: parse_commit_date(date),
        message: message.trim().to_string(),
    })
}

/// Parse `git log --format=%H|%s|%ci|%an` output.
/// Each line: `<hash>|<subject>|<date>|<author>`; the author may contain `|`.
pub fn parse_commit_log(output: &str) -> Vec<Commit> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.splitn(4, '|');
            let hash = parts.next()?;
            let message = parts.next()?;
            let date = parts.next()?;
            let author = parts.next()?;
            Some(Commit {
                short_hash: hash.chars().take(7).collect(),
                message: message.to_string(),
                date: parse_commit_date(date).unwrap_or_else(|| Local::now().fixed_offset()),
                author: author.to_string(),
            })
        })
        .collect()
}

/// Number of changed paths in `git status --porcelain` output.
pub fn count_porcelain_entries(output: &str) -> usize {
    output.lines().filter(|l| !l.trim().is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_ci_dates() {
        let date = parse_commit_date("2024-03-05 14:07:09 +0100").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 5));
        assert_eq!(date.hour(), 14);
        assert_eq!(date.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(parse_commit_date("yesterday").is_none());
    }

    #[test]
    fn last_commit_line() {
        let commit = parse_last_commit("2024-03-05 14:07:09 +0100|Fix the | pipe").unwrap();
        assert_eq!(commit.message, "Fix the | pipe");
        assert!(commit.date.is_some());
    }

    #[test]
    fn last_commit_bad_date_keeps_message() {
        let commit = parse_last_commit("not a date|Initial commit").unwrap();
        assert!(commit.date.is_none());
        assert_eq!(commit.message, "Initial commit");
    }

    #[test]
    fn last_commit_without_separator() {
        assert!(parse_last_commit("").is_none());
        assert!(parse_last_commit("no separator here").is_none());
    }

    #[test]
    fn commit_log_lines() {
        let output = "\
0123456789abcdef|Add parser|2024-01-02 03:04:05 +0000|Ada Lovelace
fedcba9876543210|Tidy|2024-01-01 00:00:00 -0500|Grace|Hopper";
        let commits = parse_commit_log(output);
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].short_hash, "0123456");
        assert_eq!(commits[0].message, "Add parser");
        assert_eq!(commits[0].author, "Ada Lovelace");
        assert_eq!(commits[1].author, "Grace|Hopper");
        assert_eq!(commits[1].date.offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn commit_log_skips_short_lines() {
        let commits = parse_commit_log("abc|only two\n\nabc|msg|2024-01-02 03:04:05 +0000|me");
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].author, "me");
    }

    #[test]
    fn commit_log_bad_date_falls_back_to_now() {
        let before = Local::now().fixed_offset();
        let commits = parse_commit_log("abc|msg|someday|me");
        assert_eq!(commits.len(), 1);
        assert!(commits[0].date >= before);
    }

    #[test]
    fn porcelain_counts_entries() {
        assert_eq!(count_porcelain_entries(""), 0);
        assert_eq!(count_porcelain_entries(" M src/lib.rs\n?? notes.txt\n"), 2);
    }

    #[tokio::test]
    async fn plain_directory_is_not_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        let inspector = GitInspector::default();
        assert!(!inspector.is_repository(dir.path()).await);
        assert_eq!(inspector.inspect(dir.path()).await, GitInfo::no_git());
    }

    #[tokio::test]
    async fn dot_git_directory_marks_repository() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let inspector = GitInspector::default();
        assert!(inspector.is_repository(dir.path()).await);
    }
}
