use super::ThemeVariant;

/// Background luma above which the terminal is treated as light.
const LIGHT_LUMA_THRESHOLD: f32 = 0.6;

/// Guess the terminal background by querying its color. Terminals that do not
/// answer are assumed dark.
pub fn detect_terminal_theme() -> ThemeVariant {
    match terminal_light::luma() {
        Ok(luma) => variant_for_luma(luma),
        Err(e) => {
            tracing::debug!(error = %e, "terminal background detection failed");
            ThemeVariant::Dark
        }
    }
}

fn variant_for_luma(luma: f32) -> ThemeVariant {
    if luma > LIGHT_LUMA_THRESHOLD {
        ThemeVariant::Light
    } else {
        ThemeVariant::Dark
    }
}
