use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use crate::system::github;
use crate::system::process::run_command;

/// Timeout for each tmux invocation. tmux returns as soon as the window exists.
const CMD_TIMEOUT: Duration = Duration::from_secs(5);

/// Shell commands started inside new tmux panes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommands {
    pub editor: String,
    pub assistant: String,
    pub review_tool: String,
}

impl Default for LaunchCommands {
    fn default() -> Self {
        Self {
            editor: "nvim .".to_string(),
            assistant: "claude".to_string(),
            review_tool: "lazygit".to_string(),
        }
    }
}

/// Opens projects in external tools. Every call reports plain success;
/// the reason for a failure goes to the log.
#[async_trait::async_trait]
pub trait Launcher: Send + Sync {
    /// Window with the assistant on the left and the editor on the right.
    async fn open_workspace(&self, name: &str, path: &Path) -> bool;
    async fn open_assistant(&self, name: &str, path: &Path) -> bool;
    async fn open_review_tool(&self, name: &str, path: &Path) -> bool;
    async fn open_editor(&self, name: &str, path: &Path) -> bool;
    async fn open_review_requests_in_browser(&self, path: &Path) -> bool;
}

pub struct TmuxLauncher {
    commands: LaunchCommands,
    gh_timeout: Duration,
}

impl Default for TmuxLauncher {
    fn default() -> Self {
        Self::new(LaunchCommands::default(), github::GH_TIMEOUT)
    }
}

impl TmuxLauncher {
    pub fn new(commands: LaunchCommands, gh_timeout: Duration) -> Self {
        Self {
            commands,
            gh_timeout,
        }
    }

    /// Run tmux invocations in order, stopping at the first failure.
    async fn run_steps(&self, steps: Vec<Vec<String>>) -> bool {
        for args in steps {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            let outcome = run_command("tmux", &args, None, CMD_TIMEOUT).await;
            if !outcome.ok {
                warn!(
                    ?args,
                    error = outcome.error.as_deref().unwrap_or("unknown"),
                    "tmux step failed"
                );
                return false;
            }
        }
        true
    }

    async fn open_window_with(&self, name: &str, path: &Path, command: &str) -> bool {
        let ok = self
            .run_steps(vec![new_window_args(name, path, Some(command))])
            .await;
        if ok {
            info!(project = name, command, "opened tmux window");
        }
        ok
    }
}

#[async_trait::async_trait]
impl Launcher for TmuxLauncher {
    async fn open_workspace(&self, name: &str, path: &Path) -> bool {
        let ok = self
            .run_steps(workspace_steps(name, path, &self.commands))
            .await;
        if ok {
            info!(project = name, "opened tmux workspace");
        }
        ok
    }

    async fn open_assistant(&self, name: &str, path: &Path) -> bool {
        self.open_window_with(name, path, &self.commands.assistant).await
    }

    async fn open_review_tool(&self, name: &str, path: &Path) -> bool {
        self.open_window_with(name, path, &self.commands.review_tool).await
    }

    async fn open_editor(&self, name: &str, path: &Path) -> bool {
        self.open_window_with(name, path, &self.commands.editor).await
    }

    async fn open_review_requests_in_browser(&self, path: &Path) -> bool {
        let ok = github::open_review_requests_in_browser(path, self.gh_timeout).await;
        if !ok {
            warn!(path = %path.display(), "gh pr list --web failed");
        }
        ok
    }
}

/// `tmux new-window -n <name> -c <path> [command...]`
pub fn new_window_args(name: &str, path: &Path, command: Option<&str>) -> Vec<String> {
    let mut args = vec![
        "new-window".to_string(),
        "-n".to_string(),
        name.to_string(),
        "-c".to_string(),
        path.to_string_lossy().into_owned(),
    ];
    if let Some(command) = command {
        args.extend(command.split_whitespace().map(str::to_string));
    }
    args
}

/// The four tmux calls that build the workspace layout.
pub fn workspace_steps(name: &str, path: &Path, commands: &LaunchCommands) -> Vec<Vec<String>> {
    let mut split = vec![
        "split-window".to_string(),
        "-h".to_string(),
        "-c".to_string(),
        path.to_string_lossy().into_owned(),
    ];
    split.extend(commands.editor.split_whitespace().map(str::to_string));

    vec![
        new_window_args(name, path, None),
        split,
        vec!["select-pane".to_string(), "-L".to_string()],
        vec![
            "send-keys".to_string(),
            commands.assistant.clone(),
            "Enter".to_string(),
        ],
    ]
}
