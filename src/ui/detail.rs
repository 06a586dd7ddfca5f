use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Mode};
use crate::ui::modals::centered_percent;

/// Status report or README, scrolled from the top.
pub fn draw_text_view(frame: &mut Frame, app: &App, area: Rect) {
    let view = &app.text_view;
    let lines: Vec<Line> = view
        .lines
        .iter()
        .map(|line| {
            let status_heading =
                app.mode == Mode::Status && !line.is_empty() && !line.starts_with(' ');
            if line.starts_with('#') || status_heading {
                Line::from(Span::styled(
                    line.clone(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(line.clone())
            }
        })
        .collect();

    let title = if view.lines.is_empty() {
        format!(" {} ", view.title)
    } else {
        format!(
            " {} [{}/{}] ",
            view.title,
            (view.scroll_offset as usize + 1).min(view.lines.len()),
            view.lines.len()
        )
    };
    let body = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false })
        .scroll((view.scroll_offset, 0));
    frame.render_widget(Clear, area);
    frame.render_widget(body, area);
}

pub fn draw_guide(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Instructions ")
        .border_style(Style::default().fg(Color::Magenta));
    frame.render_widget(Clear, area);

    if app.guide.sections.is_empty() {
        let empty = Paragraph::new(Span::styled(
            " No sections. Press 'a' to add one.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .guide
        .sections
        .iter()
        .map(|section| {
            let indent = "  ".repeat(section.level.saturating_sub(1) as usize);
            let lines = section.content.lines().count();
            ListItem::new(Line::from(vec![
                Span::raw(indent),
                Span::styled(
                    format!("{} ", "#".repeat(section.level as usize)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(section.title.clone()),
                Span::styled(
                    format!("  ({lines} lines)"),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol(">> ")
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    let mut state = ListState::default().with_selected(Some(app.guide.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Multi-line editor for a section body.
pub fn draw_guide_editor(frame: &mut Frame, app: &App) {
    let area = centered_percent(80, frame.area());
    frame.render_widget(Clear, area);

    let editor = &app.guide.editor;
    let (row, col) = editor.cursor();
    let inner_height = area.height.saturating_sub(2) as usize;
    let top = (row + 1).saturating_sub(inner_height);

    let text: Vec<Line> = editor
        .lines()
        .iter()
        .skip(top)
        .map(|line| Line::from(line.clone()))
        .collect();
    let body = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", app.guide.draft_title))
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(body, area);

    let x = area.x + 1 + (col as u16).min(area.width.saturating_sub(3));
    let y = area.y + 1 + row.saturating_sub(top) as u16;
    frame.set_cursor_position(Position::new(x, y));
}
