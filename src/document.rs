//! Section-level view of a Markdown document.
//!
//! A document is split at ATX header lines (`#` through `######`) into a
//! preamble and an ordered list of sections. Parsing never fails; text with
//! no headers becomes a single preamble.
//!
//! Header detection is purely line-based. A `# line` inside a fenced code
//! block still starts a new section.

pub mod store;

/// Deepest ATX header level.
pub const MAX_LEVEL: u8 = 6;

/// Title written for a section whose title is blank.
pub const UNTITLED: &str = "Untitled";

/// A title as a header line can carry it: one line, trimmed, never blank.
fn header_title(title: &str) -> String {
    let title = title.replace('\n', " ");
    let title = title.trim();
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub content: String,
    pub level: u8,
}

impl Section {
    /// Build a section in the same normalized form `parse` produces.
    pub fn new(title: &str, content: &str, level: u8) -> Self {
        Self {
            title: header_title(title),
            content: trim_blank_lines(content),
            level: level.clamp(1, MAX_LEVEL),
        }
    }

    fn header_line(&self) -> String {
        let level = self.level.clamp(1, MAX_LEVEL) as usize;
        format!("{} {}", "#".repeat(level), header_title(&self.title))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub preamble: String,
    pub sections: Vec<Section>,
}

impl Document {
    /// The document as `parse(serialize(self))` would return it.
    pub fn normalized(&self) -> Self {
        Self {
            preamble: trim_blank_lines(&self.preamble),
            sections: self
                .sections
                .iter()
                .map(|s| Section::new(&s.title, &s.content, s.level))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.preamble.is_empty() && self.sections.is_empty()
    }
}

/// Match a header line, returning its level and trimmed title.
/// Requires 1-6 `#`, at least one whitespace character, then a non-blank title.
fn parse_header(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if hashes == 0 || hashes > MAX_LEVEL as usize {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let title = rest.trim();
    if title.is_empty() {
        return None;
    }
    Some((hashes as u8, title))
}

/// Drop whitespace-only lines from both ends; interior lines are untouched.
fn trim_blank_lines(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    join_trimmed(&lines)
}

fn join_trimmed(lines: &[&str]) -> String {
    let is_blank = |l: &&str| l.trim().is_empty();
    let Some(start) = lines.iter().position(|l| !is_blank(l)) else {
        return String::new();
    };
    let end = lines.iter().rposition(|l| !is_blank(l)).unwrap_or(start);
    lines[start..=end].join("\n")
}

struct OpenSection<'a> {
    title: &'a str,
    level: u8,
    lines: Vec<&'a str>,
}

impl OpenSection<'_> {
    fn finish(self) -> Section {
        Section {
            title: self.title.to_string(),
            content: join_trimmed(&self.lines),
            level: self.level,
        }
    }
}

/// Split `text` into a preamble and header-delimited sections.
pub fn parse(text: &str) -> Document {
    let mut preamble_lines: Vec<&str> = Vec::new();
    let mut sections = Vec::new();
    let mut current: Option<OpenSection> = None;

    for line in text.split('\n') {
        if let Some((level, title)) = parse_header(line) {
            if let Some(open) = current.take() {
                sections.push(open.finish());
            }
            current = Some(OpenSection {
                title,
                level,
                lines: Vec::new(),
            });
        } else if let Some(open) = current.as_mut() {
            open.lines.push(line);
        } else {
            preamble_lines.push(line);
        }
    }

    if let Some(open) = current {
        sections.push(open.finish());
    }

    Document {
        preamble: join_trimmed(&preamble_lines),
        sections,
    }
}

/// Render a document back to text: blocks separated by one blank line,
/// terminated by a single newline.
pub fn serialize(doc: &Document) -> String {
    let mut blocks: Vec<String> = Vec::with_capacity(doc.sections.len() + 1);

    let preamble = trim_blank_lines(&doc.preamble);
    if !preamble.is_empty() {
        blocks.push(preamble);
    }

    for section in &doc.sections {
        let content = trim_blank_lines(&section.content);
        if content.is_empty() {
            blocks.push(section.header_line());
        } else {
            blocks.push(format!("{}\n\n{}", section.header_line(), content));
        }
    }

    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}
