use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthChar;

use crate::theme::ResolvedTheme;

/// Render an error message in a bordered block.
pub fn render_error(frame: &mut Frame, error: &str, theme: &ResolvedTheme, area: Rect) {
    let widget = Paragraph::new(error)
        .style(theme.error_style())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title("Error"),
        );
    frame.render_widget(widget, area);
}

/// Render a centered, dimmed notice in a bordered block.
pub fn render_notice(frame: &mut Frame, text: &str, theme: &ResolvedTheme, area: Rect) {
    let widget = Paragraph::new(text)
        .style(theme.dim_style())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style()),
        );
    frame.render_widget(widget, area);
}

/// Cut `text` to at most `max_width` terminal columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
