use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::common::{render_error, render_notice, truncate_to_width};
use super::spinner::spinner_frame;
use super::status_bar::StatusBar;
use crate::api::FeedItem;
use crate::app::{App, CARD_HEIGHT};
use crate::help::viewer_help;
use crate::keys::{global_keymap, viewer_keymap};
use crate::theme::ResolvedTheme;

const DESCRIPTION_HEIGHT: u16 = 3;
const PLAYER_HEIGHT: u16 = 3;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Min(0),    // Item card
        Constraint::Length(1), // Prev/next controls
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_header(frame, app, chunks[0]);
    render_body(frame, app, chunks[1]);
    render_controls(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let mut spans = vec![
        Span::styled("Shorts", theme.active_style()),
        Span::styled(format!("  {} loaded", app.session.len()), theme.dim_style()),
    ];
    if app.session.is_exhausted() {
        spans.push(Span::styled("  · end of feed", theme.dim_style()));
    }
    if app.load.should_show_spinner(app.is_loading()) {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            spinner_frame(app.load.loading_start),
            theme.spinner_style(),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_body(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let Some(item) = app.session.current() else {
        if let Some(err) = &app.load.error {
            render_error(frame, err, theme, area);
        } else if app.is_loading() {
            render_notice(frame, "Loading shorts…", theme, area);
        } else {
            render_notice(frame, "No shorts available.", theme, area);
        }
        return;
    };

    let [card_area, _] =
        Layout::vertical([Constraint::Length(CARD_HEIGHT), Constraint::Min(0)]).areas(area);
    let title = format!(" {}/{} ", app.session.index() + 1, app.session.len());
    render_card(frame, item, &title, theme, card_area);
}

fn render_card(frame: &mut Frame, item: &FeedItem, title: &str, theme: &ResolvedTheme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(title.to_string());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [title_area, _, description_area, player_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(DESCRIPTION_HEIGHT),
        Constraint::Length(PLAYER_HEIGHT),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new(Line::styled(item.title.clone(), theme.title_style())),
        title_area,
    );
    frame.render_widget(
        Paragraph::new(item.description.clone())
            .style(Style::default().fg(theme.short_description))
            .wrap(Wrap { trim: true }),
        description_area,
    );

    let player = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.player_border))
        .title(" ▶ Video ")
        .title_bottom(Line::styled(format!(" {} ", item.host()), theme.dim_style()));
    let player_inner = player.inner(player_area);
    frame.render_widget(player, player_area);
    let url = truncate_to_width(&item.url, player_inner.width as usize);
    frame.render_widget(
        Paragraph::new(Line::styled(
            url,
            Style::default()
                .fg(theme.short_url)
                .add_modifier(Modifier::UNDERLINED),
        )),
        player_inner,
    );
}

fn render_controls(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let style_for = |enabled: bool| {
        if enabled {
            theme.active_style()
        } else {
            theme.disabled_style()
        }
    };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled("◀ Prev", style_for(app.session.can_previous())),
        Span::raw("   "),
        Span::styled("Next ▶", style_for(app.session.can_next())),
    ];
    if app.session.is_viewing_last() {
        let note = if app.is_loading() {
            "  loading more…"
        } else if app.session.is_exhausted() {
            "  no more shorts"
        } else {
            ""
        };
        spans.push(Span::styled(note, theme.dim_style()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let keymap = global_keymap().extend(viewer_keymap());
    let help_text = viewer_help().format(&keymap, app.show_help);
    let loading_text = app
        .session
        .pending()
        .map(|req| format!("Loading page {}", req.page + 1));
    // The body already shows the error when nothing has loaded.
    let error = app
        .load
        .error
        .as_deref()
        .filter(|_| !app.session.is_empty());

    let mut bar = StatusBar::new(&app.theme)
        .label("Shorts")
        .error(error)
        .help(&help_text);
    if let Some(text) = &loading_text {
        bar = bar.loading(text);
    }
    if !app.session.is_empty() {
        bar = bar.position(app.session.index() + 1, app.session.len());
    }
    bar.render(frame, area);
}
