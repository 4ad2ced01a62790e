mod api;
mod app;
mod cli;
mod event;
mod feed;
mod help;
mod keys;
mod logging;
mod observer;
mod player;
mod settings;
mod theme;
mod tui;
mod views;

#[cfg(test)]
mod test_utils;

use anyhow::Result;
use clap::Parser;
use ratatui::Frame;

use api::FeedClient;
use app::{App, DEBUG_PANE_HEIGHT, Message, ViewerOptions};
use cli::Cli;
use event::Event;
use player::Player;
use settings::Settings;
use theme::{
    ResolvedTheme, ThemeVariant, all_themes, by_name, default_for_variant, detect_terminal_theme,
};
use tui::EventHandler;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run_tui(cli).await
}

fn resolve_theme(cli: &Cli, settings: &Settings) -> Result<ResolvedTheme> {
    let variant = if cli.dark {
        ThemeVariant::Dark
    } else if cli.light {
        ThemeVariant::Light
    } else {
        detect_terminal_theme()
    };

    // Priority: CLI --theme > settings file > default
    let theme_name = cli.theme.as_ref().or(settings.theme.as_ref());

    if let Some(name) = theme_name {
        if let Some(theme) = by_name(name) {
            return Ok(theme.into());
        }
        let available: Vec<String> = all_themes().into_iter().map(|t| t.name).collect();
        anyhow::bail!(
            "Theme '{}' not found. Available themes: {}",
            name,
            available.join(", ")
        );
    }

    Ok(default_for_variant(variant))
}

/// Command line flags win over the settings file.
fn apply_overrides(cli: &Cli, mut settings: Settings) -> Settings {
    if let Some(endpoint) = &cli.endpoint {
        settings.endpoint = endpoint.clone();
    }
    if let Some(size) = cli.page_size {
        settings.page_size = usize::try_from(size).unwrap_or(usize::MAX);
    }
    if let Some(player) = &cli.player {
        settings.player = Some(player.clone());
    }
    if cli.autoplay {
        settings.autoplay = true;
    }
    if let Some(secs) = cli.timeout_secs {
        settings.timeout_secs = Some(secs);
    }
    settings
}

async fn run_tui(cli: Cli) -> Result<()> {
    let config_dir = settings::config_dir(cli.config_dir.as_ref());
    let settings = config_dir
        .as_ref()
        .map(|dir| {
            let path = settings::settings_path(dir);
            Settings::load(&path).unwrap_or_else(|e| {
                eprintln!("Warning: {}", e);
                Settings::default()
            })
        })
        .unwrap_or_default();
    let settings = apply_overrides(&cli, settings);

    let _log_guard = match &config_dir {
        Some(dir) => {
            let logs_dir = settings::logs_dir(dir);
            if cli.verbose {
                eprintln!("Logging to {}", logs_dir.display());
            }
            match logging::init(&logs_dir, cli.verbose) {
                Ok(guard) => Some(guard),
                Err(e) => {
                    eprintln!("Logging disabled: {}", e);
                    None
                }
            }
        }
        None => None,
    };

    let resolved_theme = resolve_theme(&cli, &settings)?;
    let client = FeedClient::new(&settings.endpoint, settings.timeout())?;
    let options = ViewerOptions {
        page_size: settings.page_size,
        player: Player::new(settings.player.clone()),
        autoplay: settings.autoplay,
    };
    tracing::info!(
        endpoint = %settings.endpoint,
        page_size = options.page_size,
        player = options.player.label(),
        autoplay = options.autoplay,
        theme = %resolved_theme.name,
        variant = ?resolved_theme.variant,
        "starting viewer"
    );

    let mut terminal = tui::init()?;
    let mut app = App::new(resolved_theme, client, options);
    let mut events = EventHandler::new(100);
    let mut last_height: Option<u16> = None;

    app.start();

    let result = async {
        loop {
            terminal.draw(|frame| render(&app, frame))?;

            // The observer needs the terminal height to decide whether the last card is visible.
            let current_height = terminal.size()?.height;
            if last_height != Some(current_height) {
                last_height = Some(current_height);
                app.update(Message::UpdateViewportHeight(current_height));
            }

            // Poll async results (non-blocking)
            while let Ok(result) = app.result_rx.try_recv() {
                app.handle_async_result(result);
            }

            if app.should_quit {
                break;
            }

            match events.next().await? {
                Event::Key(key) => {
                    if let Some(msg) = keys::handle_key(key) {
                        app.update(msg);
                    }
                }
                Event::Tick | Event::Resize => {}
            }
        }
        Ok::<_, anyhow::Error>(())
    }
    .await;

    app.unmount();
    tui::restore()?;
    result
}

fn render(app: &App, frame: &mut Frame) {
    use ratatui::layout::{Constraint, Layout};

    let area = frame.area();

    // Split area for debug pane if visible
    let (main_area, debug_area) = if app.debug.visible {
        let chunks = Layout::vertical([
            Constraint::Min(0),                    // Main content
            Constraint::Length(DEBUG_PANE_HEIGHT), // Debug pane
        ])
        .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    views::viewer::render(frame, app, main_area);

    if let Some(debug_area) = debug_area {
        views::debug::render(frame, app, debug_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_settings() {
        let cli = Cli::try_parse_from([
            "shorts",
            "--endpoint",
            "http://feed.local:9000",
            "--page-size",
            "25",
            "--player",
            "mpv --fs",
            "--autoplay",
            "--timeout-secs",
            "3",
        ])
        .unwrap();
        let settings = apply_overrides(&cli, Settings::default());
        assert!(settings.autoplay);
        assert_eq!(settings.timeout(), Some(std::time::Duration::from_secs(3)));
        assert_eq!(settings.endpoint, "http://feed.local:9000");
        assert_eq!(settings.page_size, 25);
        assert_eq!(settings.player.as_deref(), Some("mpv --fs"));
    }

    #[test]
    fn test_settings_kept_without_flags() {
        let cli = Cli::try_parse_from(["shorts"]).unwrap();
        let mut file = Settings::default();
        file.endpoint = "http://from-file:1234".to_string();
        file.page_size = 7;
        let settings = apply_overrides(&cli, file);
        assert_eq!(settings.endpoint, "http://from-file:1234");
        assert_eq!(settings.page_size, 7);
        assert!(settings.player.is_none());
        assert!(!settings.autoplay);
        assert!(settings.timeout_secs.is_none());
    }

    #[test]
    fn test_unknown_theme_is_an_error() {
        let cli = Cli::try_parse_from(["shorts", "--theme", "no-such-theme", "--dark"]).unwrap();
        let err = resolve_theme(&cli, &Settings::default()).unwrap_err();
        assert!(err.to_string().contains("no-such-theme"));
        assert!(err.to_string().contains("monokai"));
    }

    #[test]
    fn test_named_theme_from_settings() {
        let cli = Cli::try_parse_from(["shorts", "--light"]).unwrap();
        let mut settings = Settings::default();
        settings.theme = Some("monokai".to_string());
        assert!(resolve_theme(&cli, &settings).is_ok());
    }
}
