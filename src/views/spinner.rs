use std::time::Instant;

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_MILLIS: u128 = 80;

/// Spinner glyph for the time elapsed since `start`.
pub fn spinner_frame(start: Option<Instant>) -> &'static str {
    let elapsed = start.map(|s| s.elapsed().as_millis()).unwrap_or(0);
    let idx = (elapsed / FRAME_MILLIS) as usize % FRAMES.len();
    FRAMES[idx]
}
