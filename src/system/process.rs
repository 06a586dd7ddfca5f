use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{bail, Context, Result as AnyhowResult};
use tokio::process::Command;
use tracing::{debug, warn};

/// Result of one external command. Never an error: spawn failures,
/// timeouts and non-zero exits all land in `ok == false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    pub ok: bool,
    pub stdout: Option<String>,
    pub error: Option<String>,
}

impl CommandOutcome {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            stdout: None,
            error: Some(error.into()),
        }
    }

    /// Trimmed stdout of a successful command.
    pub fn output(&self) -> Option<&str> {
        if !self.ok {
            return None;
        }
        self.stdout.as_deref().map(str::trim)
    }
}

/// Run a command with a timeout, returning its output.
pub async fn run_cmd_timeout(
    cmd: &mut Command,
    timeout: Duration,
) -> AnyhowResult<std::process::Output> {
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(result) => result.context("subprocess failed to execute"),
        Err(_) => bail!("subprocess timed out after {}s", timeout.as_secs_f32()),
    }
}

/// Run `program args...` (optionally in `cwd`) and capture a structured outcome.
pub async fn run_command(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
    timeout: Duration,
) -> CommandOutcome {
    let mut cmd = Command::new(program);
    cmd.args(args).stdin(Stdio::null()).kill_on_drop(true);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    debug!(program, ?args, cwd = ?cwd, "running command");
    let output = match run_cmd_timeout(&mut cmd, timeout).await {
        Ok(output) => output,
        Err(err) => {
            warn!(program, "command failed: {err:#}");
            return CommandOutcome::failed(format!("{program}: {err:#}"));
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if output.status.success() {
        return CommandOutcome {
            ok: true,
            stdout: Some(stdout),
            error: None,
        };
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let error = match stderr.trim() {
        "" => format!("{program} exited with {}", output.status),
        msg => msg.to_string(),
    };
    debug!(program, %error, "command exited unsuccessfully");
    CommandOutcome {
        ok: false,
        stdout: Some(stdout),
        error: Some(error),
    }
}
