use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::theme::ResolvedTheme;

/// Builder for rendering the status bar.
///
/// Layout: `[Label] [Loading?] Position | Error or Help Text`
pub struct StatusBar<'a> {
    theme: &'a ResolvedTheme,
    label: &'a str,
    loading_text: Option<&'a str>,
    position: Option<(usize, usize)>,
    error: Option<&'a str>,
    help_text: &'a str,
}

impl<'a> StatusBar<'a> {
    pub fn new(theme: &'a ResolvedTheme) -> Self {
        Self {
            theme,
            label: "",
            loading_text: None,
            position: None,
            error: None,
            help_text: "",
        }
    }

    pub fn label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    pub fn loading(mut self, text: &'a str) -> Self {
        self.loading_text = Some(text);
        self
    }

    pub fn position(mut self, current: usize, total: usize) -> Self {
        self.position = Some((current, total));
        self
    }

    /// Show an error in place of the help text.
    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    pub fn help(mut self, text: &'a str) -> Self {
        self.help_text = text;
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(format!(" {} ", self.label), self.theme.status_bar_style()),
            Span::raw(" "),
        ];

        if let Some(loading) = self.loading_text {
            spans.push(Span::styled(loading.to_string(), self.theme.spinner_style()));
            spans.push(Span::raw(" | "));
        }

        if let Some((current, total)) = self.position {
            spans.push(Span::styled(
                format!("{}/{}", current, total),
                Style::default().fg(self.theme.foreground_dim),
            ));
            spans.push(Span::raw(" | "));
        }

        match self.error {
            Some(error) => spans.push(Span::styled(error.to_string(), self.theme.error_style())),
            None => spans.push(Span::styled(
                self.help_text.to_string(),
                Style::default().fg(self.theme.foreground_dim),
            )),
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
