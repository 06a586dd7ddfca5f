pub mod detail;
pub mod help;
pub mod modals;
pub mod state;
pub mod table;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::{App, InputPurpose, Mode};
use detail::{draw_guide, draw_guide_editor, draw_text_view};
use help::draw_help_bar;
use modals::{
    centered_percent, draw_confirm_delete_section, draw_confirm_move, draw_input_dialog,
    draw_todos,
};
use table::draw_project_table;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());
    let main_area = chunks[0];
    let help_area = chunks[1];

    draw_project_table(frame, app, main_area);
    draw_help_bar(frame, app, help_area);

    let overlay = centered_percent(90, main_area);
    match app.mode {
        Mode::Browse => {}
        Mode::ConfirmMove => draw_confirm_move(frame, app),
        Mode::Todos => draw_todos(frame, app),
        Mode::Input => {
            // The dialog sits on top of the panel it was opened from.
            match app.input.as_ref().map(|input| input.purpose) {
                Some(InputPurpose::SectionTitle(_)) => draw_guide(frame, app, overlay),
                _ => draw_todos(frame, app),
            }
            draw_input_dialog(frame, app);
        }
        Mode::Status | Mode::Readme => draw_text_view(frame, app, overlay),
        Mode::Guide => draw_guide(frame, app, overlay),
        Mode::GuideEditor => {
            draw_guide(frame, app, overlay);
            draw_guide_editor(frame, app);
        }
        Mode::ConfirmDeleteSection => {
            draw_guide(frame, app, overlay);
            draw_confirm_delete_section(frame, app);
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    use crate::app::{App, Mode, Severity};
    use crate::document::Section;
    use crate::models::{GitStatus, Project, Task, TaskStatus};
    use crate::project::View;

    fn make_project(name: &str, status: GitStatus, todos: usize, prs: usize) -> Project {
        let mut p = Project::bare(name, format!("/work/{name}"));
        p.git_status = status;
        p.todo_count = todos;
        p.pr_count = prs;
        if status != GitStatus::NoGit {
            p.branch = Some("main".to_string());
        }
        p
    }

    fn make_app() -> App {
        let mut app = App::new();
        app.set_projects(vec![
            make_project("alpha", GitStatus::Clean, 2, 1),
            make_project("beta", GitStatus::Dirty, 0, 0),
            make_project("gamma", GitStatus::NoGit, 0, 0),
        ]);
        app
    }

    fn buffer_to_string(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        let mut output = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                let cell = &buf[(x, y)];
                output.push_str(cell.symbol());
            }
            let trimmed = output.trim_end();
            output = trimmed.to_string();
            output.push('\n');
        }
        output
    }

    fn render(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| super::draw(f, app)).unwrap();
        buffer_to_string(&terminal)
    }

    #[test]
    fn browse_table_lists_projects() {
        let output = render(&make_app(), 100, 20);
        assert!(output.contains("Hangar (3)"));
        assert!(output.contains("Project"));
        assert!(output.contains("Last Commit"));
        for name in ["alpha", "beta", "gamma"] {
            assert!(output.contains(name), "missing {name} in\n{output}");
        }
        assert!(output.contains('✓'));
        assert!(output.contains('●'));
        assert!(output.contains('○'));
        assert!(output.contains("main"));
    }

    #[test]
    fn empty_table_has_placeholder() {
        let mut app = App::new();
        app.view = View::Stash;
        let output = render(&app, 80, 10);
        assert!(output.contains("Stash (0)"));
        assert!(output.contains("No projects yet"));
    }

    #[test]
    fn help_bar_shows_notice() {
        let mut app = make_app();
        app.notify(Severity::Error, "Failed to open tmux");
        let output = render(&app, 200, 10);
        let last_line = output.lines().last().unwrap();
        assert!(last_line.contains("Failed to open tmux"));
        assert!(last_line.contains("q: quit"));
    }

    #[test]
    fn confirm_move_names_destination() {
        let mut app = make_app();
        app.handle_key(KeyEvent::new(KeyCode::Char('m'), KeyModifiers::NONE));
        let output = render(&app, 80, 20);
        assert!(output.contains("Move 'alpha' to Stash? (y/n)"));
    }

    #[test]
    fn todos_modal_lists_tasks() {
        let mut app = make_app();
        let mut started = Task::new("write parser");
        started.status = TaskStatus::InProgress;
        app.open_todos("alpha".to_string(), vec![started, Task::new("add tests")]);

        let output = render(&app, 80, 24);
        assert!(output.contains("Todos: alpha"));
        assert!(output.contains(">> ◐ write parser"));
        assert!(output.contains("○ add tests"));
        assert!(output.contains("Space: toggle"));
    }

    #[test]
    fn empty_todos_modal_has_hint() {
        let mut app = make_app();
        app.open_todos("beta".to_string(), Vec::new());
        let output = render(&app, 80, 24);
        assert!(output.contains("No todos"));
    }

    #[test]
    fn input_dialog_over_todos() {
        let mut app = make_app();
        app.open_todos("alpha".to_string(), Vec::new());
        app.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        for ch in "buy milk".chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
        let output = render(&app, 80, 24);
        assert!(output.contains("New todo"));
        assert!(output.contains("buy milk"));
    }

    #[test]
    fn status_view_renders_report() {
        let mut app = make_app();
        app.open_text(
            Mode::Status,
            "Status: alpha",
            "Git Status\n  Branch: main\n  Status: Clean",
        );
        let output = render(&app, 80, 24);
        assert!(output.contains("Status: alpha [1/3]"));
        assert!(output.contains("Branch: main"));
    }

    #[test]
    fn readme_view_scrolls() {
        let mut app = make_app();
        let content: Vec<String> = (1..=50).map(|i| format!("readme line {i}")).collect();
        app.open_text(Mode::Readme, "README: alpha", &content.join("\n"));
        app.text_view.scroll_offset = 10;
        let output = render(&app, 80, 24);
        assert!(output.contains("readme line 11"));
        assert!(!output.contains("readme line 10"));
        assert!(output.contains("[11/50]"));
    }

    #[test]
    fn guide_indents_by_level() {
        let mut app = make_app();
        app.open_guide(vec![
            Section::new("Overview", "line\nline", 1),
            Section::new("Details", "", 3),
        ]);
        let output = render(&app, 80, 24);
        assert!(output.contains("Instructions"));
        assert!(output.contains("# Overview  (2 lines)"));
        assert!(output.contains("    ### Details  (0 lines)"));
    }

    #[test]
    fn guide_editor_shows_draft() {
        let mut app = make_app();
        app.open_guide(Vec::new());
        app.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        for ch in "Style".chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        app.handle_paste("Use rustfmt.\nKeep lines short.");

        let output = render(&app, 80, 24);
        assert!(output.contains(" Style "));
        assert!(output.contains("Use rustfmt."));
        assert!(output.contains("Keep lines short."));
        assert!(output.contains("Ctrl+S: save"));
    }

    #[test]
    fn confirm_delete_section_names_title() {
        let mut app = make_app();
        app.open_guide(vec![Section::new("Style", "x", 2)]);
        app.handle_key(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::NONE));
        let output = render(&app, 80, 24);
        assert!(output.contains("Delete section 'Style'? (y/n)"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let mut app = make_app();
        app.open_guide(vec![Section::new("A", "b", 1)]);
        app.handle_key(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::NONE));
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        render(&app, 3, 2);
        render(&make_app(), 1, 1);
    }
}
