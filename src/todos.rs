use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::models::{Task, TaskStatus};
use crate::system::fs::write_atomic;

/// On-disk shape of one task. `status` is kept as raw JSON so unknown
/// values of any type load as pending instead of failing the whole record.
#[derive(Deserialize)]
struct StoredTask {
    content: String,
    #[serde(default)]
    status: Option<serde_json::Value>,
}

fn stored_status(value: Option<&serde_json::Value>) -> TaskStatus {
    match value {
        Some(serde_json::Value::String(s)) => TaskStatus::from_stored(s),
        _ => TaskStatus::Pending,
    }
}

#[derive(Deserialize)]
struct StoredRecord {
    #[serde(default)]
    items: Vec<StoredTask>,
}

#[derive(Serialize)]
struct RecordOut<'a> {
    items: &'a [Task],
}

/// Per-project task lists, one JSON file per project name.
#[derive(Debug, Clone)]
pub struct TaskStore {
    dir: PathBuf,
}

impl TaskStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Return the record path: `<dir>/<project>.json`
    pub fn record_path(&self, project: &str) -> PathBuf {
        self.dir.join(format!("{project}.json"))
    }

    /// Load a project's tasks. Returns an empty list on missing or corrupt file.
    pub fn load(&self, project: &str) -> Vec<Task> {
        let path = self.record_path(project);
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str::<StoredRecord>(&contents) {
            Ok(record) => record
                .items
                .into_iter()
                .map(|item| Task {
                    content: item.content,
                    status: stored_status(item.status.as_ref()),
                })
                .collect(),
            Err(err) => {
                debug!(path = %path.display(), %err, "ignoring corrupt task record");
                Vec::new()
            }
        }
    }

    /// Save a project's tasks, creating the directory as needed.
    pub fn save(&self, project: &str, tasks: &[Task]) -> bool {
        let path = self.record_path(project);
        let json = match serde_json::to_string_pretty(&RecordOut { items: tasks }) {
            Ok(json) => json,
            Err(err) => {
                warn!("failed to encode tasks for {project}: {err}");
                return false;
            }
        };
        match write_atomic(&path, &json) {
            Ok(()) => true,
            Err(err) => {
                warn!(path = %path.display(), "failed to save tasks: {err:#}");
                false
            }
        }
    }

    /// Number of tasks that are not completed.
    pub fn pending_count(&self, project: &str) -> usize {
        self.load(project).iter().filter(|t| t.is_open()).count()
    }
}
