use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Mode, Severity};

pub(crate) fn help_text(mode: Mode) -> &'static str {
    match mode {
        Mode::Browse => {
            "Enter: open  c: assistant  l: review  n: editor  g: PRs  t: todos  s: status  v: readme  e: guide  m: move  Tab: view  r: refresh  q: quit"
        }
        Mode::ConfirmMove => "y: move  n/Esc: cancel",
        Mode::Todos => "a: add  e: edit  d: delete  Space: toggle  j/k: nav  Esc: close",
        Mode::Input => "Enter: save  Esc: cancel",
        Mode::Status | Mode::Readme => "j/k: scroll  PgUp/PgDn: page  g/G: top/bottom  Esc: close",
        Mode::Guide => "a: add  e: edit  d: delete  j/k: nav  Esc: close",
        Mode::GuideEditor => "Ctrl+S: save  Esc: cancel",
        Mode::ConfirmDeleteSection => "y: delete  n/Esc: cancel",
    }
}

fn notice_style(severity: Severity) -> Style {
    match severity {
        Severity::Info => Style::default().fg(Color::Black).bg(Color::Green),
        Severity::Warning => Style::default().fg(Color::Black).bg(Color::Yellow),
        Severity::Error => Style::default().fg(Color::White).bg(Color::Red),
    }
}

pub fn draw_help_bar(frame: &mut Frame, app: &App, area: Rect) {
    let base = Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let mut spans = Vec::new();
    if let Some(notice) = &app.notice {
        spans.push(Span::styled(
            format!(" {} ", notice.text),
            notice_style(notice.severity).add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::styled(format!(" {}", help_text(app.mode)), base));

    let bar = Paragraph::new(Line::from(spans)).style(base);
    frame.render_widget(bar, area);
}
