use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .title(" Debug ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.foreground_dim));

    let mut lines = Vec::new();

    let cursor = app.session.cursor();
    let task_count = app.debug.running_tasks.len();
    lines.push(Line::from(vec![
        Span::styled("Tasks: ", theme.dim_style()),
        Span::styled(
            task_count.to_string(),
            Style::default().fg(if task_count > 0 {
                theme.spinner
            } else {
                theme.foreground
            }),
        ),
        Span::styled(
            format!(
                "  next page {} (size {})  exhausted {}  observing {}",
                cursor.page(),
                cursor.size(),
                app.session.is_exhausted(),
                app.observer
                    .target()
                    .map(|i| (i + 1).to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            theme.dim_style(),
        ),
    ]));

    for task in &app.debug.running_tasks {
        let elapsed = task.started_at.elapsed();
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("[{}] ", task.id), theme.dim_style()),
            Span::styled(&task.description, Style::default().fg(theme.foreground)),
            Span::styled(format!(" ({:.1?})", elapsed), theme.dim_style()),
        ]));
    }

    if !app.debug.running_tasks.is_empty() {
        lines.push(Line::from(""));
    }

    // Recent log entries, newest first
    let available_lines = area.height.saturating_sub(3) as usize;
    let log_lines = available_lines.saturating_sub(app.debug.running_tasks.len() + 1);

    for entry in app.debug.log.iter().rev().take(log_lines) {
        lines.push(Line::from(vec![Span::styled(
            format!("  {}", entry.message),
            theme.dim_style(),
        )]));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
