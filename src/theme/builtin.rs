use super::{ResolvedTheme, Theme, ThemeColor, ThemeColors, ThemeVariant};

pub fn all_themes() -> Vec<Theme> {
    vec![default_dark(), default_light(), monokai()]
}

pub fn by_name(name: &str) -> Option<Theme> {
    all_themes().into_iter().find(|t| t.name == name)
}

pub fn default_for_variant(variant: ThemeVariant) -> ResolvedTheme {
    match variant {
        ThemeVariant::Dark => monokai().into(),
        ThemeVariant::Light => default_light().into(),
    }
}

fn named(s: &str) -> ThemeColor {
    ThemeColor::Named(s.to_string())
}

fn hex(s: &str) -> ThemeColor {
    ThemeColor::Hex(s.to_string())
}

pub fn default_dark() -> Theme {
    Theme {
        name: "default-dark".to_string(),
        variant: ThemeVariant::Dark,
        colors: ThemeColors {
            foreground: named("white"),
            foreground_dim: hex("#6A9A9A"),
            border: hex("#6A9A9A"),
            primary: named("yellow"),
            error: named("red"),
            short_title: named("white"),
            short_description: named("gray"),
            short_url: named("cyan"),
            player_border: named("yellow"),
            status_bar_bg: named("blue"),
            status_bar_fg: named("white"),
            spinner: named("yellow"),
        },
    }
}

pub fn default_light() -> Theme {
    Theme {
        name: "default-light".to_string(),
        variant: ThemeVariant::Light,
        colors: ThemeColors {
            foreground: named("black"),
            foreground_dim: named("darkgray"),
            border: named("darkgray"),
            primary: named("blue"),
            error: named("red"),
            short_title: named("black"),
            short_description: named("darkgray"),
            short_url: named("blue"),
            player_border: named("blue"),
            status_bar_bg: named("blue"),
            status_bar_fg: named("white"),
            spinner: named("blue"),
        },
    }
}

pub fn monokai() -> Theme {
    Theme {
        name: "monokai".to_string(),
        variant: ThemeVariant::Dark,
        colors: ThemeColors {
            foreground: hex("#F8F8F2"),
            foreground_dim: hex("#75715E"),
            border: hex("#75715E"),
            primary: hex("#A6E22E"),
            error: hex("#F92672"),
            short_title: hex("#F8F8F2"),
            short_description: hex("#E6DB74"),
            short_url: hex("#66D9EF"),
            player_border: hex("#AE81FF"),
            status_bar_bg: hex("#A6E22E"),
            status_bar_fg: hex("#272822"),
            spinner: hex("#E6DB74"),
        },
    }
}
