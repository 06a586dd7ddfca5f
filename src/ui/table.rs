use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::models::{GitStatus, Project};

pub(crate) fn status_color(status: GitStatus) -> Color {
    match status {
        GitStatus::Clean => Color::Green,
        GitStatus::Dirty => Color::Yellow,
        GitStatus::NoGit => Color::DarkGray,
    }
}

fn count_cell(count: usize, color: Color) -> Cell<'static> {
    if count == 0 {
        Cell::from("-")
    } else {
        Cell::from(Span::styled(count.to_string(), Style::default().fg(color)))
    }
}

fn project_row(project: &Project) -> Row<'static> {
    Row::new(vec![
        Cell::from(Span::styled(
            project.git_status.icon(),
            Style::default().fg(status_color(project.git_status)),
        )),
        Cell::from(project.name.clone()),
        Cell::from(project.branch.clone().unwrap_or_else(|| "-".to_string())),
        Cell::from(project.last_commit_label()),
        count_cell(project.todo_count, Color::Reset),
        count_cell(project.pr_count, Color::Cyan),
    ])
}

pub fn draw_project_table(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" {} ({}) ", app.view.label(), app.projects.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Cyan));

    if app.projects.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            " No projects yet",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(["", "Project", "Branch", "Last Commit", "Todos", "PRs"])
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);
    let widths = [
        Constraint::Length(2),
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Length(11),
        Constraint::Length(5),
        Constraint::Length(4),
    ];
    let table = Table::new(app.projects.iter().map(project_row), widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        );

    let mut state = TableState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(table, area, &mut state);
}
