use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{parse, serialize, Document, Section};
use crate::system::fs::write_atomic;

/// Level used for sections added from the dashboard.
pub const DEFAULT_SECTION_LEVEL: u8 = 2;

/// The shared assistant instructions file, edited section by section.
///
/// Every mutation re-reads the file, applies one change, and rewrites the
/// whole file. Concurrent writers are last-writer-wins.
#[derive(Debug, Clone)]
pub struct GuideStore {
    path: PathBuf,
}

impl GuideStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the file. A missing or unreadable file is an empty document.
    pub fn load(&self) -> Document {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => parse(&text),
            Err(err) => {
                debug!(path = %self.path.display(), %err, "guide not readable, using empty document");
                Document::default()
            }
        }
    }

    pub fn save(&self, doc: &Document) -> bool {
        match write_atomic(&self.path, &serialize(doc)) {
            Ok(()) => true,
            Err(err) => {
                warn!(path = %self.path.display(), "failed to save guide: {err:#}");
                false
            }
        }
    }

    /// Append a section. A blank title is refused.
    pub fn add_section(&self, title: &str, content: &str, level: u8) -> bool {
        if title.trim().is_empty() {
            return false;
        }
        let mut doc = self.load();
        doc.sections.push(Section::new(title, content, level));
        self.save(&doc)
    }

    /// Replace title and content of the section at `index`, keeping its level.
    pub fn update_section(&self, index: usize, title: &str, content: &str) -> bool {
        if title.trim().is_empty() {
            return false;
        }
        let mut doc = self.load();
        let Some(section) = doc.sections.get_mut(index) else {
            return false;
        };
        *section = Section::new(title, content, section.level);
        self.save(&doc)
    }

    pub fn delete_section(&self, index: usize) -> bool {
        let mut doc = self.load();
        if index >= doc.sections.len() {
            return false;
        }
        doc.sections.remove(index);
        self.save(&doc)
    }
}
