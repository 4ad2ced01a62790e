use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::time::{Interval, MissedTickBehavior};

use crate::event::Event;

/// Enter raw mode on the alternate screen. The panic hook ratatui installs
/// restores the terminal before the panic message prints.
pub fn init() -> Result<DefaultTerminal> {
    Ok(ratatui::try_init()?)
}

pub fn restore() -> Result<()> {
    ratatui::try_restore()?;
    Ok(())
}

/// Merges crossterm input with a periodic tick so the spinner keeps moving
/// while a page is loading.
pub struct EventHandler {
    events: EventStream,
    tick: Interval,
}

impl EventHandler {
    pub fn new(tick_ms: u64) -> Self {
        let mut tick = tokio::time::interval(Duration::from_millis(tick_ms));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            events: EventStream::new(),
            tick,
        }
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            tokio::select! {
                _ = self.tick.tick() => return Ok(Event::Tick),
                maybe_event = self.events.next() => match maybe_event {
                    Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                        return Ok(Event::Key(key));
                    }
                    Some(Ok(CrosstermEvent::Resize(_, _))) => return Ok(Event::Resize),
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(e.into()),
                    None => anyhow::bail!("terminal event stream closed"),
                },
            }
        }
    }
}
