mod builtin;
mod detect;

pub use builtin::{all_themes, by_name, default_for_variant};
pub use detect::detect_terminal_theme;

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub variant: ThemeVariant,
    pub colors: ThemeColors,
}

#[derive(Debug, Clone)]
pub enum ThemeColor {
    Named(String),
    Hex(String),
}

impl ThemeColor {
    pub fn to_color(&self) -> Color {
        match self {
            ThemeColor::Named(name) => Self::parse_named(name),
            ThemeColor::Hex(hex) => Self::parse_hex(hex),
        }
    }

    fn parse_named(name: &str) -> Color {
        match name.to_lowercase().as_str() {
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "gray" | "grey" => Color::Gray,
            "darkgray" | "darkgrey" | "dark_gray" => Color::DarkGray,
            "lightblue" | "light_blue" => Color::LightBlue,
            "white" => Color::White,
            _ => Color::Reset,
        }
    }

    fn parse_hex(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Color::Rgb(r, g, b);
        }
        Color::Reset
    }
}

#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub foreground: ThemeColor,
    pub foreground_dim: ThemeColor,
    pub border: ThemeColor,
    pub primary: ThemeColor,
    pub error: ThemeColor,
    pub short_title: ThemeColor,
    pub short_description: ThemeColor,
    pub short_url: ThemeColor,
    pub player_border: ThemeColor,
    pub status_bar_bg: ThemeColor,
    pub status_bar_fg: ThemeColor,
    pub spinner: ThemeColor,
}

#[derive(Debug, Clone)]
pub struct ResolvedTheme {
    pub name: String,
    pub variant: ThemeVariant,
    pub foreground: Color,
    pub foreground_dim: Color,
    pub border: Color,
    pub primary: Color,
    pub error: Color,
    pub short_title: Color,
    pub short_description: Color,
    pub short_url: Color,
    pub player_border: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub spinner: Color,
}

impl ResolvedTheme {
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.foreground_dim)
    }

    pub fn active_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn disabled_style(&self) -> Style {
        Style::default()
            .fg(self.foreground_dim)
            .add_modifier(Modifier::DIM)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn spinner_style(&self) -> Style {
        Style::default().fg(self.spinner)
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .bg(self.status_bar_bg)
            .fg(self.status_bar_fg)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.short_title)
            .add_modifier(Modifier::BOLD)
    }
}

impl From<Theme> for ResolvedTheme {
    fn from(theme: Theme) -> Self {
        let c = theme.colors;
        ResolvedTheme {
            name: theme.name,
            variant: theme.variant,
            foreground: c.foreground.to_color(),
            foreground_dim: c.foreground_dim.to_color(),
            border: c.border.to_color(),
            primary: c.primary.to_color(),
            error: c.error.to_color(),
            short_title: c.short_title.to_color(),
            short_description: c.short_description.to_color(),
            short_url: c.short_url.to_color(),
            player_border: c.player_border.to_color(),
            status_bar_bg: c.status_bar_bg.to_color(),
            status_bar_fg: c.status_bar_fg.to_color(),
            spinner: c.spinner.to_color(),
        }
    }
}
