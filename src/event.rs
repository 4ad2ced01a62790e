use crossterm::event::KeyEvent;

/// Terminal input as the main loop sees it.
#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    Tick,
    Resize,
}
