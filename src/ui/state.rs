/// Cursor position in characters, plus the column vertical moves aim for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cursor {
    row: usize,
    col: usize,
    goal: usize,
}

/// Editable text shared by the single-line input dialog and the section
/// editor. Always holds at least one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    cursor: Cursor,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            cursor: Cursor::default(),
        }
    }
}

fn byte_at(line: &str, col: usize) -> usize {
    line.char_indices().nth(col).map_or(line.len(), |(i, _)| i)
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer holding `text` with the cursor after its last character.
    pub fn with_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.paste(text);
        buffer
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// `(row, column)`, counted in characters.
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor.row, self.cursor.col)
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    fn current(&mut self) -> &mut String {
        &mut self.lines[self.cursor.row]
    }

    fn settle(&mut self, row: usize, col: usize) {
        self.cursor = Cursor {
            row,
            col,
            goal: col,
        };
    }

    pub(crate) fn insert(&mut self, ch: char) {
        let Cursor { row, col, .. } = self.cursor;
        let at = byte_at(self.current(), col);
        self.current().insert(at, ch);
        self.settle(row, col + 1);
    }

    /// Split the current line at the cursor.
    pub(crate) fn break_line(&mut self) {
        let Cursor { row, col, .. } = self.cursor;
        let at = byte_at(self.current(), col);
        let rest = self.current().split_off(at);
        self.lines.insert(row + 1, rest);
        self.settle(row + 1, 0);
    }

    pub(crate) fn delete_back(&mut self) {
        let Cursor { row, col, .. } = self.cursor;
        if col > 0 {
            let line = self.current();
            let start = byte_at(line, col - 1);
            let end = byte_at(line, col);
            line.replace_range(start..end, "");
            self.settle(row, col - 1);
        } else if row > 0 {
            let tail = self.lines.remove(row);
            let joined_at = self.line_len(row - 1);
            self.lines[row - 1].push_str(&tail);
            self.settle(row - 1, joined_at);
        }
    }

    pub(crate) fn delete_forward(&mut self) {
        let Cursor { row, col, .. } = self.cursor;
        if col < self.line_len(row) {
            let line = self.current();
            let start = byte_at(line, col);
            let end = byte_at(line, col + 1);
            line.replace_range(start..end, "");
        } else if row + 1 < self.lines.len() {
            let next = self.lines.remove(row + 1);
            self.lines[row].push_str(&next);
        }
        self.settle(row, col);
    }

    pub(crate) fn left(&mut self) {
        let Cursor { row, col, .. } = self.cursor;
        match (col, row) {
            (0, 0) => {}
            (0, _) => self.settle(row - 1, self.line_len(row - 1)),
            _ => self.settle(row, col - 1),
        }
    }

    pub(crate) fn right(&mut self) {
        let Cursor { row, col, .. } = self.cursor;
        if col < self.line_len(row) {
            self.settle(row, col + 1);
        } else if row + 1 < self.lines.len() {
            self.settle(row + 1, 0);
        }
    }

    pub(crate) fn up(&mut self) {
        if self.cursor.row > 0 {
            self.jump_to_row(self.cursor.row - 1);
        }
    }

    pub(crate) fn down(&mut self) {
        if self.cursor.row + 1 < self.lines.len() {
            self.jump_to_row(self.cursor.row + 1);
        }
    }

    fn jump_to_row(&mut self, row: usize) {
        self.cursor.row = row;
        self.cursor.col = self.cursor.goal.min(self.line_len(row));
    }

    pub(crate) fn home(&mut self) {
        self.settle(self.cursor.row, 0);
    }

    pub(crate) fn end(&mut self) {
        let row = self.cursor.row;
        self.settle(row, self.line_len(row));
    }

    /// Multi-line paste. `\r\n` and a lone `\r` both break the line.
    pub(crate) fn paste(&mut self, text: &str) {
        for (i, piece) in text.split('\n').enumerate() {
            if i > 0 {
                self.break_line();
            }
            let piece = piece.strip_suffix('\r').unwrap_or(piece);
            for (j, part) in piece.split('\r').enumerate() {
                if j > 0 {
                    self.break_line();
                }
                part.chars().for_each(|ch| self.insert(ch));
            }
        }
    }

    /// Paste into a single-line field: line breaks become spaces.
    pub(crate) fn paste_inline(&mut self, text: &str) {
        for ch in text.chars() {
            self.insert(if matches!(ch, '\r' | '\n') { ' ' } else { ch });
        }
    }
}

/// Lines scrolled per page.
const PAGE: u16 = 15;

/// Read-only scrollable text (status report, README).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextView {
    pub title: String,
    pub lines: Vec<String>,
    /// First visible line.
    pub scroll_offset: u16,
}

impl TextView {
    pub fn new(title: impl Into<String>, content: &str) -> Self {
        Self {
            title: title.into(),
            lines: content.lines().map(str::to_string).collect(),
            scroll_offset: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.lines.len().saturating_sub(1).min(u16::MAX as usize) as u16
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1).min(self.max_offset());
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn scroll_page_down(&mut self) {
        self.scroll_offset = self
            .scroll_offset
            .saturating_add(PAGE)
            .min(self.max_offset());
    }

    pub fn scroll_page_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(PAGE);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_offset();
    }
}
