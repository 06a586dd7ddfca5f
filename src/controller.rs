use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::app::{Action, App, Mode, Severity, Tool};
use crate::config::Config;
use crate::document::store::{GuideStore, DEFAULT_SECTION_LEVEL};
use crate::models::{Commit, GitStatus, Project, ReviewRequest};
use crate::project::{self, View};
use crate::system::git::{GitInspector, VcsInspector};
use crate::tmux::{Launcher, TmuxLauncher};
use crate::todos::TaskStore;

/// Commits listed in the status view.
const STATUS_COMMITS: usize = 5;
const COMMIT_MESSAGE_WIDTH: usize = 50;
const PR_TITLE_WIDTH: usize = 40;

/// Executes [`Action`]s against the filesystem and external tools and writes
/// the results back into the [`App`]. One action at a time.
pub struct Controller {
    hangar_dir: PathBuf,
    stash_dir: PathBuf,
    inspector: Box<dyn VcsInspector>,
    launcher: Box<dyn Launcher>,
    tasks: TaskStore,
    guide: GuideStore,
}

impl Controller {
    pub fn new(
        hangar_dir: PathBuf,
        stash_dir: PathBuf,
        inspector: Box<dyn VcsInspector>,
        launcher: Box<dyn Launcher>,
        tasks: TaskStore,
        guide: GuideStore,
    ) -> Self {
        Self {
            hangar_dir,
            stash_dir,
            inspector,
            launcher,
            tasks,
            guide,
        }
    }

    /// Production wiring: git/gh inspector and tmux launcher.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.hangar_dir.clone(),
            config.stash_dir.clone(),
            Box::new(GitInspector::new(config.git_timeout, config.gh_timeout)),
            Box::new(TmuxLauncher::new(
                config.commands.clone(),
                config.gh_timeout,
            )),
            TaskStore::new(&config.todos_dir),
            GuideStore::new(&config.guide_path),
        )
    }

    pub fn root(&self, view: View) -> &Path {
        match view {
            View::Hangar => &self.hangar_dir,
            View::Stash => &self.stash_dir,
        }
    }

    pub async fn refresh(&self, app: &mut App) {
        let root = self.root(app.view);
        match project::scan(root, self.inspector.as_ref(), &self.tasks).await {
            Ok(projects) => app.set_projects(projects),
            Err(err) => {
                warn!("refresh failed: {err:#}");
                app.set_projects(Vec::new());
                app.notify(Severity::Error, format!("Failed to scan {}: {err}", root.display()));
            }
        }
    }

    pub async fn perform(&self, app: &mut App, action: Action) {
        match action {
            Action::Refresh => self.refresh(app).await,
            Action::Launch { tool, name, path } => {
                let ok = match tool {
                    Tool::Workspace => self.launcher.open_workspace(&name, &path).await,
                    Tool::Assistant => self.launcher.open_assistant(&name, &path).await,
                    Tool::ReviewTool => self.launcher.open_review_tool(&name, &path).await,
                    Tool::Editor => self.launcher.open_editor(&name, &path).await,
                };
                if ok {
                    app.notify(Severity::Info, format!("Opened {name} with {}", tool.label()));
                } else {
                    app.notify(Severity::Error, format!("Failed to open {}", tool.label()));
                }
            }
            Action::OpenReviewRequests { name, path } => {
                if self.launcher.open_review_requests_in_browser(&path).await {
                    app.notify(Severity::Info, format!("Opening {name} pull requests"));
                } else {
                    app.notify(Severity::Error, "Failed to open pull requests");
                }
            }
            Action::OpenTodos { name } => {
                let tasks = self.tasks.load(&name);
                app.open_todos(name, tasks);
            }
            Action::SaveTodos { name, tasks } => {
                if !self.tasks.save(&name, &tasks) {
                    app.notify(Severity::Error, format!("Failed to save todos for {name}"));
                }
            }
            Action::ShowStatus(project) => {
                let (commits, prs) = if project.git_status == GitStatus::NoGit {
                    (Vec::new(), Vec::new())
                } else {
                    (
                        self.inspector
                            .recent_commits(&project.path, STATUS_COMMITS)
                            .await,
                        self.inspector.open_review_requests(&project.path).await,
                    )
                };
                let report = format_status_report(&project, &commits, &prs);
                app.open_text(Mode::Status, format!("Status: {}", project.name), &report);
            }
            Action::ShowReadme { name, path } => match project::find_readme(&path) {
                Some(readme) => match std::fs::read_to_string(&readme) {
                    Ok(text) => app.open_text(Mode::Readme, format!("README: {name}"), &text),
                    Err(err) => {
                        warn!(path = %readme.display(), %err, "failed to read README");
                        app.notify(Severity::Error, format!("Failed to read README: {err}"));
                    }
                },
                None => app.notify(Severity::Warning, format!("No README in {name}")),
            },
            Action::OpenGuide => {
                app.open_guide(self.guide.load().sections);
            }
            Action::MoveProject { name, path, to } => {
                match project::move_project(&path, self.root(to)) {
                    Ok(_) => {
                        app.notify(Severity::Info, format!("Moved {name} to {}", to.label()));
                        self.refresh(app).await;
                    }
                    Err(err) => {
                        warn!("move failed: {err:#}");
                        app.notify(Severity::Error, format!("Failed to move: {err}"));
                    }
                }
            }
            Action::AddSection { title, content } => {
                let ok = self
                    .guide
                    .add_section(&title, &content, DEFAULT_SECTION_LEVEL);
                self.finish_guide_edit(app, ok, format!("Added section {title}"));
            }
            Action::UpdateSection {
                index,
                title,
                content,
            } => {
                let ok = self.guide.update_section(index, &title, &content);
                self.finish_guide_edit(app, ok, format!("Updated section {title}"));
            }
            Action::DeleteSection { index } => {
                let ok = self.guide.delete_section(index);
                self.finish_guide_edit(app, ok, "Deleted section".to_string());
            }
        }
    }

    fn finish_guide_edit(&self, app: &mut App, ok: bool, success: String) {
        if ok {
            info!("{success}");
            app.notify(Severity::Info, success);
        } else {
            app.notify(
                Severity::Error,
                format!("Failed to save {}", self.guide.path().display()),
            );
        }
        app.open_guide(self.guide.load().sections);
    }
}

/// Plain-text body of the status view.
pub fn format_status_report(
    project: &Project,
    commits: &[Commit],
    prs: &[ReviewRequest],
) -> String {
    let mut lines = vec!["Git Status".to_string()];
    if project.git_status == GitStatus::NoGit {
        lines.push("  Not a git repository".to_string());
        return lines.join("\n");
    }

    lines.push(format!(
        "  Branch: {}",
        project.branch.as_deref().unwrap_or("unknown")
    ));
    let status = match project.git_status {
        GitStatus::Clean => "Clean",
        _ => "Has uncommitted changes",
    };
    lines.push(format!("  Status: {status}"));

    lines.push(String::new());
    lines.push("Recent Commits".to_string());
    if commits.is_empty() {
        lines.push("  No commits".to_string());
    }
    for commit in commits.iter().take(STATUS_COMMITS) {
        lines.push(format!(
            "  {} {} {}",
            commit.short_hash,
            commit.date.format("%Y-%m-%d"),
            truncate_chars(&commit.message, COMMIT_MESSAGE_WIDTH)
        ));
    }

    lines.push(String::new());
    lines.push("Open PRs".to_string());
    if prs.is_empty() {
        lines.push("  No open PRs".to_string());
    }
    for pr in prs {
        lines.push(format!(
            "  #{} {}",
            pr.number,
            truncate_chars(&pr.title, PR_TITLE_WIDTH)
        ));
    }
    lines.join("\n")
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LastCommit, Task, TaskStatus};
    use async_trait::async_trait;
    use chrono::DateTime;
    use std::sync::{Arc, Mutex};

    /// Every directory is a clean repository on `main`; names containing
    /// "remote" have an origin.
    struct MockInspector;

    #[async_trait]
    impl VcsInspector for MockInspector {
        async fn is_repository(&self, _path: &Path) -> bool {
            true
        }
        async fn current_branch(&self, _path: &Path) -> Option<String> {
            Some("main".to_string())
        }
        async fn last_commit(&self, _path: &Path) -> Option<LastCommit> {
            None
        }
        async fn recent_commits(&self, _path: &Path, limit: usize) -> Vec<Commit> {
            (0..limit.min(2))
                .map(|i| Commit {
                    short_hash: format!("abc000{i}"),
                    message: format!("commit {i}"),
                    date: DateTime::parse_from_rfc3339("2024-02-03T10:00:00+00:00").unwrap(),
                    author: "me".to_string(),
                })
                .collect()
        }
        async fn remote_url(&self, path: &Path) -> Option<String> {
            path.to_string_lossy()
                .contains("remote")
                .then(|| "git@example.com:r.git".to_string())
        }
        async fn dirty_file_count(&self, _path: &Path) -> usize {
            0
        }
        async fn open_review_requests(&self, _path: &Path) -> Vec<ReviewRequest> {
            Vec::new()
        }
    }

    #[derive(Clone, Default)]
    struct MockLauncher {
        calls: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl MockLauncher {
        fn record(&self, call: String) -> bool {
            self.calls.lock().unwrap().push(call);
            !self.fail
        }
    }

    #[async_trait]
    impl Launcher for MockLauncher {
        async fn open_workspace(&self, name: &str, _path: &Path) -> bool {
            self.record(format!("workspace {name}"))
        }
        async fn open_assistant(&self, name: &str, _path: &Path) -> bool {
            self.record(format!("assistant {name}"))
        }
        async fn open_review_tool(&self, name: &str, _path: &Path) -> bool {
            self.record(format!("review {name}"))
        }
        async fn open_editor(&self, name: &str, _path: &Path) -> bool {
            self.record(format!("editor {name}"))
        }
        async fn open_review_requests_in_browser(&self, path: &Path) -> bool {
            self.record(format!("browser {}", path.display()))
        }
    }

    struct Fixture {
        _tmp: tempfile::TempDir,
        root: PathBuf,
        launcher: MockLauncher,
        controller: Controller,
    }

    fn fixture_with(launcher: MockLauncher) -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        let controller = Controller::new(
            root.join("Hangar"),
            root.join("Stash"),
            Box::new(MockInspector),
            Box::new(launcher.clone()),
            TaskStore::new(root.join("todos")),
            GuideStore::new(root.join("CLAUDE.md")),
        );
        Fixture {
            _tmp: tmp,
            root,
            launcher,
            controller,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(MockLauncher::default())
    }

    fn mkproject(fx: &Fixture, base: &str, name: &str) -> PathBuf {
        let path = fx.root.join(base).join(name);
        std::fs::create_dir_all(&path).unwrap();
        path
    }

    fn notice(app: &App) -> (Severity, String) {
        let n = app.notice.clone().expect("notice");
        (n.severity, n.text)
    }

    #[tokio::test]
    async fn refresh_lists_current_view() {
        let fx = fixture();
        mkproject(&fx, "Hangar", "alpha");
        mkproject(&fx, "Stash", "old");
        let mut app = App::new();

        fx.controller.perform(&mut app, Action::Refresh).await;
        let names: Vec<&str> = app.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["alpha"]);

        app.view = View::Stash;
        fx.controller.perform(&mut app, Action::Refresh).await;
        assert_eq!(app.projects[0].name, "old");
    }

    #[tokio::test]
    async fn launch_reports_success_and_failure() {
        let fx = fixture();
        let mut app = App::new();
        let path = mkproject(&fx, "Hangar", "alpha");
        let action = Action::Launch {
            tool: Tool::Workspace,
            name: "alpha".to_string(),
            path: path.clone(),
        };
        fx.controller.perform(&mut app, action.clone()).await;
        assert_eq!(*fx.launcher.calls.lock().unwrap(), ["workspace alpha"]);
        assert_eq!(notice(&app).0, Severity::Info);

        let failing = fixture_with(MockLauncher {
            fail: true,
            ..MockLauncher::default()
        });
        failing.controller.perform(&mut app, action).await;
        assert_eq!(notice(&app), (Severity::Error, "Failed to open tmux".to_string()));
    }

    #[tokio::test]
    async fn each_tool_reaches_its_launcher_method() {
        let fx = fixture();
        let mut app = App::new();
        for tool in [Tool::Assistant, Tool::ReviewTool, Tool::Editor] {
            let action = Action::Launch {
                tool,
                name: "p".to_string(),
                path: PathBuf::from("/p"),
            };
            fx.controller.perform(&mut app, action).await;
        }
        assert_eq!(
            *fx.launcher.calls.lock().unwrap(),
            ["assistant p", "review p", "editor p"]
        );
    }

    #[tokio::test]
    async fn todos_open_and_save() {
        let fx = fixture();
        let mut app = App::new();
        let mut done = Task::new("done");
        done.status = TaskStatus::Completed;
        fx.controller
            .perform(
                &mut app,
                Action::SaveTodos {
                    name: "alpha".to_string(),
                    tasks: vec![Task::new("open"), done],
                },
            )
            .await;
        assert!(app.notice.is_none());

        fx.controller
            .perform(
                &mut app,
                Action::OpenTodos {
                    name: "alpha".to_string(),
                },
            )
            .await;
        assert_eq!(app.mode, Mode::Todos);
        assert_eq!(app.todos.project, "alpha");
        assert_eq!(app.todos.tasks.len(), 2);
    }

    #[tokio::test]
    async fn failed_todo_save_is_an_error_notice() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("todos");
        std::fs::write(&blocker, "").unwrap();
        let controller = Controller::new(
            tmp.path().join("Hangar"),
            tmp.path().join("Stash"),
            Box::new(MockInspector),
            Box::new(MockLauncher::default()),
            TaskStore::new(&blocker),
            GuideStore::new(tmp.path().join("CLAUDE.md")),
        );
        let mut app = App::new();
        controller
            .perform(
                &mut app,
                Action::SaveTodos {
                    name: "alpha".to_string(),
                    tasks: vec![Task::new("x")],
                },
            )
            .await;
        assert_eq!(notice(&app).0, Severity::Error);
    }

    #[tokio::test]
    async fn move_project_between_roots() {
        let fx = fixture();
        mkproject(&fx, "Hangar", "alpha");
        mkproject(&fx, "Hangar", "beta");
        let mut app = App::new();
        fx.controller.refresh(&mut app).await;
        assert_eq!(app.projects.len(), 2);

        let alpha = app.projects[0].clone();
        fx.controller
            .perform(
                &mut app,
                Action::MoveProject {
                    name: alpha.name,
                    path: alpha.path,
                    to: View::Stash,
                },
            )
            .await;

        assert!(fx.root.join("Stash/alpha").is_dir());
        assert_eq!(notice(&app), (Severity::Info, "Moved alpha to Stash".to_string()));
        let names: Vec<&str> = app.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["beta"]);
    }

    #[tokio::test]
    async fn move_onto_existing_name_fails() {
        let fx = fixture();
        let path = mkproject(&fx, "Hangar", "alpha");
        mkproject(&fx, "Stash", "alpha");
        let mut app = App::new();
        fx.controller
            .perform(
                &mut app,
                Action::MoveProject {
                    name: "alpha".to_string(),
                    path: path.clone(),
                    to: View::Stash,
                },
            )
            .await;
        assert_eq!(notice(&app).0, Severity::Error);
        assert!(path.is_dir());
    }

    #[tokio::test]
    async fn readme_is_shown_or_warned() {
        let fx = fixture();
        let path = mkproject(&fx, "Hangar", "alpha");
        let mut app = App::new();
        let action = Action::ShowReadme {
            name: "alpha".to_string(),
            path: path.clone(),
        };

        fx.controller.perform(&mut app, action.clone()).await;
        assert_eq!(notice(&app).0, Severity::Warning);
        assert_eq!(app.mode, Mode::Browse);

        std::fs::write(path.join("README.md"), "# Alpha\n\nHello").unwrap();
        fx.controller.perform(&mut app, action).await;
        assert_eq!(app.mode, Mode::Readme);
        assert_eq!(app.text_view.lines, ["# Alpha", "", "Hello"]);
    }

    #[tokio::test]
    async fn status_view_uses_inspector() {
        let fx = fixture();
        let mut app = App::new();
        let mut project = Project::bare("alpha", "/work/alpha");
        project.git_status = GitStatus::Dirty;
        project.branch = Some("feature".to_string());

        fx.controller
            .perform(&mut app, Action::ShowStatus(project))
            .await;
        assert_eq!(app.mode, Mode::Status);
        assert_eq!(app.text_view.title, "Status: alpha");
        assert!(app.text_view.lines.contains(&"  Branch: feature".to_string()));
        assert!(app
            .text_view
            .lines
            .contains(&"  abc0001 2024-02-03 commit 1".to_string()));
    }

    #[tokio::test]
    async fn guide_section_lifecycle() {
        let fx = fixture();
        let mut app = App::new();

        fx.controller.perform(&mut app, Action::OpenGuide).await;
        assert_eq!(app.mode, Mode::Guide);
        assert!(app.guide.sections.is_empty());

        fx.controller
            .perform(
                &mut app,
                Action::AddSection {
                    title: "Style".to_string(),
                    content: "Use rustfmt.".to_string(),
                },
            )
            .await;
        assert_eq!(app.guide.sections.len(), 1);
        assert_eq!(app.guide.sections[0].level, DEFAULT_SECTION_LEVEL);

        fx.controller
            .perform(
                &mut app,
                Action::UpdateSection {
                    index: 0,
                    title: "Formatting".to_string(),
                    content: "cargo fmt".to_string(),
                },
            )
            .await;
        assert_eq!(app.guide.sections[0].title, "Formatting");
        let text = std::fs::read_to_string(fx.root.join("CLAUDE.md")).unwrap();
        assert_eq!(text, "## Formatting\n\ncargo fmt\n");

        fx.controller
            .perform(&mut app, Action::DeleteSection { index: 0 })
            .await;
        assert!(app.guide.sections.is_empty());
        assert_eq!(app.mode, Mode::Guide);
    }

    #[tokio::test]
    async fn guide_delete_out_of_range_is_an_error() {
        let fx = fixture();
        let mut app = App::new();
        fx.controller
            .perform(&mut app, Action::DeleteSection { index: 3 })
            .await;
        assert_eq!(notice(&app).0, Severity::Error);
    }

    // ── Status report ───────────────────────────────────────────────

    #[test]
    fn status_report_for_non_repository() {
        let project = Project::bare("plain", "/p");
        assert_eq!(
            format_status_report(&project, &[], &[]),
            "Git Status\n  Not a git repository"
        );
    }

    #[test]
    fn status_report_truncates() {
        let mut project = Project::bare("alpha", "/p");
        project.git_status = GitStatus::Clean;
        let commit = Commit {
            short_hash: "1234567".to_string(),
            message: "m".repeat(80),
            date: DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00").unwrap(),
            author: "a".to_string(),
        };
        let pr = ReviewRequest {
            number: 4,
            title: "t".repeat(60),
            branch: "b".to_string(),
            url: String::new(),
        };
        let report = format_status_report(&project, &[commit], &[pr]);
        insta::assert_snapshot!(report, @r"
        Git Status
          Branch: unknown
          Status: Clean

        Recent Commits
          1234567 2024-01-01 mmmmmmmmmmmmmmmmmmmmmmmmmmmmmmmmmmmmmmmmmmmmmmmmmm

        Open PRs
          #4 tttttttttttttttttttttttttttttttttttttttt
        ");
    }

    #[test]
    fn status_report_empty_lists() {
        let mut project = Project::bare("alpha", "/p");
        project.git_status = GitStatus::Dirty;
        let report = format_status_report(&project, &[], &[]);
        assert!(report.contains("Status: Has uncommitted changes"));
        assert!(report.contains("  No commits"));
        assert!(report.contains("  No open PRs"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 5), "hi");
    }
}
