use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::document::Section;
use crate::models::{Project, Task};
use crate::project::View;
use crate::ui::state::{TextBuffer, TextView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    ConfirmMove,
    Todos,
    /// Single-line text dialog on top of another mode.
    Input,
    Status,
    Readme,
    Guide,
    GuideEditor,
    ConfirmDeleteSection,
}

/// Outcome of a modal dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResult<T> {
    Cancelled,
    Submitted(T),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Workspace,
    Assistant,
    ReviewTool,
    Editor,
}

impl Tool {
    pub fn label(self) -> &'static str {
        match self {
            Tool::Workspace => "tmux",
            Tool::Assistant => "the assistant",
            Tool::ReviewTool => "the review tool",
            Tool::Editor => "the editor",
        }
    }
}

/// Side-effecting work requested by a key press, executed by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Refresh,
    Launch {
        tool: Tool,
        name: String,
        path: PathBuf,
    },
    OpenReviewRequests {
        name: String,
        path: PathBuf,
    },
    OpenTodos {
        name: String,
    },
    SaveTodos {
        name: String,
        tasks: Vec<Task>,
    },
    ShowStatus(Project),
    ShowReadme {
        name: String,
        path: PathBuf,
    },
    OpenGuide,
    MoveProject {
        name: String,
        path: PathBuf,
        to: View,
    },
    AddSection {
        title: String,
        content: String,
    },
    UpdateSection {
        index: usize,
        title: String,
        content: String,
    },
    DeleteSection {
        index: usize,
    },
}

/// What a submitted input dialog feeds into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPurpose {
    AddTodo,
    EditTodo(usize),
    /// Title for a new section (`None`) or for the section being edited.
    SectionTitle(Option<usize>),
}

#[derive(Debug, Clone)]
pub struct InputDialog {
    pub title: String,
    pub purpose: InputPurpose,
    pub buffer: TextBuffer,
}

impl InputDialog {
    pub fn new(title: impl Into<String>, purpose: InputPurpose, initial: &str) -> Self {
        let mut buffer = TextBuffer::new();
        buffer.paste_inline(initial);
        Self {
            title: title.into(),
            purpose,
            buffer,
        }
    }

    /// Feed one key. `None` while the user is still typing.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<DialogResult<String>> {
        match key.code {
            KeyCode::Esc => return Some(DialogResult::Cancelled),
            KeyCode::Enter => {
                let text = self.buffer.text().trim().to_string();
                return Some(if text.is_empty() {
                    DialogResult::Cancelled
                } else {
                    DialogResult::Submitted(text)
                });
            }
            KeyCode::Backspace => self.buffer.delete_back(),
            KeyCode::Delete => self.buffer.delete_forward(),
            KeyCode::Left => self.buffer.left(),
            KeyCode::Right => self.buffer.right(),
            KeyCode::Home => self.buffer.home(),
            KeyCode::End => self.buffer.end(),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.buffer.insert(ch)
            }
            _ => {}
        }
        None
    }
}

#[derive(Debug, Clone, Default)]
pub struct TodoPanel {
    pub project: String,
    pub tasks: Vec<Task>,
    pub selected: usize,
}

#[derive(Debug, Clone, Default)]
pub struct GuidePanel {
    pub sections: Vec<Section>,
    pub selected: usize,
    /// Title entered in the dialog, waiting for its content.
    pub draft_title: String,
    /// Section being edited, `None` when adding.
    pub editing: Option<usize>,
    pub editor: TextBuffer,
}

/// All dashboard state. Key handling mutates it and returns the I/O, if any,
/// that the controller must perform.
#[derive(Debug, Clone)]
pub struct App {
    pub view: View,
    pub projects: Vec<Project>,
    pub selected: usize,
    pub mode: Mode,
    pub notice: Option<Notice>,
    pub should_quit: bool,
    pub todos: TodoPanel,
    pub guide: GuidePanel,
    pub input: Option<InputDialog>,
    pub text_view: TextView,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            view: View::Hangar,
            projects: Vec::new(),
            selected: 0,
            mode: Mode::Browse,
            notice: None,
            should_quit: false,
            todos: TodoPanel::default(),
            guide: GuidePanel::default(),
            input: None,
            text_view: TextView::default(),
        }
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.projects.get(self.selected)
    }

    /// Replace the table rows, keeping the cursor in range.
    pub fn set_projects(&mut self, projects: Vec<Project>) {
        self.projects = projects;
        self.selected = clamp_index(self.selected, self.projects.len());
    }

    pub fn notify(&mut self, severity: Severity, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            severity,
        });
    }

    pub fn open_todos(&mut self, project: String, tasks: Vec<Task>) {
        self.todos = TodoPanel {
            project,
            tasks,
            selected: 0,
        };
        self.mode = Mode::Todos;
    }

    pub fn open_text(&mut self, mode: Mode, title: impl Into<String>, content: &str) {
        self.text_view = TextView::new(title, content);
        self.mode = mode;
    }

    /// Show the guide section list, keeping the cursor where it was if possible.
    pub fn open_guide(&mut self, sections: Vec<Section>) {
        self.guide.selected = clamp_index(self.guide.selected, sections.len());
        self.guide.sections = sections;
        self.guide.editing = None;
        self.guide.draft_title.clear();
        self.mode = Mode::Guide;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match self.mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::ConfirmMove => self.handle_confirm_move_key(key.code),
            Mode::Todos => self.handle_todos_key(key.code),
            Mode::Input => self.handle_input_key(key),
            Mode::Status | Mode::Readme => {
                self.handle_text_view_key(key.code);
                None
            }
            Mode::Guide => self.handle_guide_key(key.code),
            Mode::GuideEditor => self.handle_editor_key(key),
            Mode::ConfirmDeleteSection => self.handle_confirm_delete_key(key.code),
        }
    }

    /// Bracketed paste goes into whichever text field is active.
    pub fn handle_paste(&mut self, text: &str) {
        match self.mode {
            Mode::Input => {
                if let Some(input) = self.input.as_mut() {
                    input.buffer.paste_inline(text);
                }
            }
            Mode::GuideEditor => self.guide.editor.paste(text),
            _ => {}
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.select_next();
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.select_prev();
                None
            }
            KeyCode::Tab => {
                self.view = self.view.toggle();
                self.selected = 0;
                Some(Action::Refresh)
            }
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('e') => Some(Action::OpenGuide),
            KeyCode::Enter => self.launch(Tool::Workspace),
            KeyCode::Char('c') => self.launch(Tool::Assistant),
            KeyCode::Char('l') => self.launch(Tool::ReviewTool),
            KeyCode::Char('n') => self.launch(Tool::Editor),
            KeyCode::Char('g') => {
                let project = self.selected_project()?;
                if project.remote_url.is_none() {
                    self.notify(Severity::Warning, "No remote configured");
                    return None;
                }
                Some(Action::OpenReviewRequests {
                    name: project.name.clone(),
                    path: project.path.clone(),
                })
            }
            KeyCode::Char('t') => Some(Action::OpenTodos {
                name: self.selected_project()?.name.clone(),
            }),
            KeyCode::Char('s') => Some(Action::ShowStatus(self.selected_project()?.clone())),
            KeyCode::Char('v') => {
                let project = self.selected_project()?;
                Some(Action::ShowReadme {
                    name: project.name.clone(),
                    path: project.path.clone(),
                })
            }
            KeyCode::Char('m') => {
                self.selected_project()?;
                self.mode = Mode::ConfirmMove;
                None
            }
            _ => None,
        }
    }

    fn launch(&self, tool: Tool) -> Option<Action> {
        let project = self.selected_project()?;
        Some(Action::Launch {
            tool,
            name: project.name.clone(),
            path: project.path.clone(),
        })
    }

    fn handle_confirm_move_key(&mut self, code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.mode = Mode::Browse;
                let project = self.selected_project()?;
                Some(Action::MoveProject {
                    name: project.name.clone(),
                    path: project.path.clone(),
                    to: self.view.toggle(),
                })
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.mode = Mode::Browse;
                None
            }
            _ => None,
        }
    }

    fn handle_todos_key(&mut self, code: KeyCode) -> Option<Action> {
        let len = self.todos.tasks.len();
        match code {
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                Some(Action::Refresh)
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.todos.selected + 1 < len {
                    self.todos.selected += 1;
                }
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.todos.selected = self.todos.selected.saturating_sub(1);
                None
            }
            KeyCode::Char('a') => {
                self.open_input("New todo", InputPurpose::AddTodo, "");
                None
            }
            KeyCode::Char('e') => {
                let content = self.todos.tasks.get(self.todos.selected)?.content.clone();
                self.open_input(
                    "Edit todo",
                    InputPurpose::EditTodo(self.todos.selected),
                    &content,
                );
                None
            }
            KeyCode::Char('d') => {
                if self.todos.selected >= len {
                    return None;
                }
                self.todos.tasks.remove(self.todos.selected);
                self.todos.selected = clamp_index(self.todos.selected, self.todos.tasks.len());
                Some(self.save_todos())
            }
            KeyCode::Char(' ') => {
                self.todos.tasks.get_mut(self.todos.selected)?.toggle();
                Some(self.save_todos())
            }
            _ => None,
        }
    }

    fn save_todos(&self) -> Action {
        Action::SaveTodos {
            name: self.todos.project.clone(),
            tasks: self.todos.tasks.clone(),
        }
    }

    fn open_input(&mut self, title: &str, purpose: InputPurpose, initial: &str) {
        self.input = Some(InputDialog::new(title, purpose, initial));
        self.mode = Mode::Input;
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Option<Action> {
        let input = self.input.as_mut()?;
        let result = input.handle_key(key)?;
        let purpose = input.purpose;
        self.input = None;

        match (purpose, result) {
            (InputPurpose::AddTodo, DialogResult::Submitted(text)) => {
                self.mode = Mode::Todos;
                self.todos.tasks.push(Task::new(text));
                self.todos.selected = self.todos.tasks.len() - 1;
                Some(self.save_todos())
            }
            (InputPurpose::EditTodo(index), DialogResult::Submitted(text)) => {
                self.mode = Mode::Todos;
                self.todos.tasks.get_mut(index)?.content = text;
                Some(self.save_todos())
            }
            (InputPurpose::AddTodo | InputPurpose::EditTodo(_), DialogResult::Cancelled) => {
                self.mode = Mode::Todos;
                None
            }
            (InputPurpose::SectionTitle(editing), DialogResult::Submitted(title)) => {
                let content = editing
                    .and_then(|i| self.guide.sections.get(i))
                    .map(|s| s.content.clone())
                    .unwrap_or_default();
                self.guide.draft_title = title;
                self.guide.editing = editing;
                self.guide.editor = TextBuffer::with_text(&content);
                self.mode = Mode::GuideEditor;
                None
            }
            (InputPurpose::SectionTitle(_), DialogResult::Cancelled) => {
                self.mode = Mode::Guide;
                None
            }
        }
    }

    fn handle_text_view_key(&mut self, code: KeyCode) {
        let view = &mut self.text_view;
        match code {
            KeyCode::Esc | KeyCode::Char('q') => self.mode = Mode::Browse,
            KeyCode::Char('j') | KeyCode::Down => view.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => view.scroll_up(),
            KeyCode::PageDown | KeyCode::Char(' ') => view.scroll_page_down(),
            KeyCode::PageUp => view.scroll_page_up(),
            KeyCode::Home | KeyCode::Char('g') => view.scroll_to_top(),
            KeyCode::End | KeyCode::Char('G') => view.scroll_to_bottom(),
            _ => {}
        }
    }

    fn handle_guide_key(&mut self, code: KeyCode) -> Option<Action> {
        let len = self.guide.sections.len();
        match code {
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Char('j') | KeyCode::Down => {
                if self.guide.selected + 1 < len {
                    self.guide.selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.guide.selected = self.guide.selected.saturating_sub(1);
            }
            KeyCode::Char('a') => {
                self.open_input("Section title", InputPurpose::SectionTitle(None), "")
            }
            KeyCode::Char('e') => {
                let index = self.guide.selected;
                let title = self.guide.sections.get(index)?.title.clone();
                self.open_input("Section title", InputPurpose::SectionTitle(Some(index)), &title);
            }
            KeyCode::Char('d') => {
                if self.guide.selected < len {
                    self.mode = Mode::ConfirmDeleteSection;
                }
            }
            _ => {}
        }
        None
    }

    fn handle_editor_key(&mut self, key: KeyEvent) -> Option<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let editor = &mut self.guide.editor;
        match key.code {
            KeyCode::Esc => self.mode = Mode::Guide,
            KeyCode::Char('s') if ctrl => {
                let title = std::mem::take(&mut self.guide.draft_title);
                let content = self.guide.editor.text();
                return Some(match self.guide.editing.take() {
                    Some(index) => Action::UpdateSection {
                        index,
                        title,
                        content,
                    },
                    None => Action::AddSection { title, content },
                });
            }
            KeyCode::Enter => editor.break_line(),
            KeyCode::Backspace => editor.delete_back(),
            KeyCode::Delete => editor.delete_forward(),
            KeyCode::Left => editor.left(),
            KeyCode::Right => editor.right(),
            KeyCode::Up => editor.up(),
            KeyCode::Down => editor.down(),
            KeyCode::Home => editor.home(),
            KeyCode::End => editor.end(),
            KeyCode::Tab => editor.paste("    "),
            KeyCode::Char(ch) if !ctrl => editor.insert(ch),
            _ => {}
        }
        None
    }

    fn handle_confirm_delete_key(&mut self, code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.mode = Mode::Guide;
                Some(Action::DeleteSection {
                    index: self.guide.selected,
                })
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.mode = Mode::Guide;
                None
            }
            _ => None,
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.projects.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

/// Largest valid index for a list of `len` items, or 0 when empty.
fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}
