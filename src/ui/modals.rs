use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::TaskStatus;

pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// A centered box covering `percent` of each dimension.
pub(crate) fn centered_percent(percent: u16, area: Rect) -> Rect {
    let width = area.width.saturating_mul(percent) / 100;
    let height = area.height.saturating_mul(percent) / 100;
    centered_rect(width, height, area)
}

fn confirm(frame: &mut Frame, title: &str, text: String) {
    let width = (text.chars().count() as u16 + 4).max(30);
    let area = centered_rect(width, 3, frame.area());
    frame.render_widget(Clear, area);
    let body = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(body, area);
}

pub fn draw_confirm_move(frame: &mut Frame, app: &App) {
    let name = app.selected_project().map(|p| p.name.as_str()).unwrap_or("?");
    let text = format!(" Move '{name}' to {}? (y/n)", app.view.toggle().label());
    confirm(frame, " Confirm Move ", text);
}

pub fn draw_confirm_delete_section(frame: &mut Frame, app: &App) {
    let title = app
        .guide
        .sections
        .get(app.guide.selected)
        .map(|s| s.title.as_str())
        .unwrap_or("?");
    confirm(frame, " Confirm Delete ", format!(" Delete section '{title}'? (y/n)"));
}

pub fn draw_input_dialog(frame: &mut Frame, app: &App) {
    let Some(input) = &app.input else {
        return;
    };
    let area = centered_rect(60, 3, frame.area());
    frame.render_widget(Clear, area);

    let text = input.buffer.text();
    let inner_width = area.width.saturating_sub(2) as usize;
    let (_, col) = input.buffer.cursor();
    // Keep the cursor visible by scrolling long input to the left.
    let skip = (col + 1).saturating_sub(inner_width);
    let visible: String = text.chars().skip(skip).collect();

    let body = Paragraph::new(visible).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", input.title))
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(body, area);
    frame.set_cursor_position(Position::new(
        area.x + 1 + (col - skip) as u16,
        area.y + 1,
    ));
}

fn task_style(status: TaskStatus) -> Style {
    match status {
        TaskStatus::Pending => Style::default(),
        TaskStatus::InProgress => Style::default().fg(Color::Yellow),
        TaskStatus::Completed => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT),
    }
}

pub fn draw_todos(frame: &mut Frame, app: &App) {
    let area = centered_percent(80, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Todos: {} ", app.todos.project))
        .border_style(Style::default().fg(Color::Cyan));

    if app.todos.tasks.is_empty() {
        let empty = Paragraph::new(Span::styled(
            " No todos. Press 'a' to add one.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .todos
        .tasks
        .iter()
        .map(|task| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", task.status.icon()), task_style(task.status)),
                Span::styled(task.content.clone(), task_style(task.status)),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_symbol(">> ")
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));
    let mut state = ListState::default().with_selected(Some(app.todos.selected));
    frame.render_stateful_widget(list, area, &mut state);
}
