use std::process::{Child, Command, Stdio};

use anyhow::{Context, Result};

/// Hands video URLs to something that can play them.
///
/// A configured player command runs as a child process. Only one is kept
/// alive: starting another video stops the previous one.
#[derive(Debug, Default)]
pub struct Player {
    command: Option<String>,
    current: Option<Child>,
}

impl Player {
    pub fn new(command: Option<String>) -> Self {
        Self {
            command: command.filter(|c| !c.trim().is_empty()),
            current: None,
        }
    }

    pub fn label(&self) -> &str {
        self.command.as_deref().unwrap_or("system opener")
    }

    /// Start playback of `url` without waiting for the player to exit.
    pub fn play(&mut self, url: &str) -> Result<()> {
        self.stop();
        match &self.command {
            Some(command) => {
                let mut parts = command.split_whitespace();
                let program = parts.next().context("Player command is empty")?;
                let child = Command::new(program)
                    .args(parts)
                    .arg(url)
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .spawn()
                    .with_context(|| format!("Failed to start player '{program}'"))?;
                self.current = Some(child);
            }
            None => {
                open::that_detached(url).with_context(|| format!("Failed to open {url}"))?;
            }
        }
        tracing::info!(url, player = self.label(), "playback started");
        Ok(())
    }

    /// Kill and reap the running player, if any.
    pub fn stop(&mut self) {
        let Some(mut child) = self.current.take() else {
            return;
        };
        // Fails only if the child already exited; wait still reaps it.
        let _ = child.kill();
        match child.wait() {
            Ok(status) => tracing::debug!(pid = child.id(), %status, "player stopped"),
            Err(e) => tracing::warn!(pid = child.id(), error = %e, "failed to reap player"),
        }
    }

    #[cfg(test)]
    fn current_pid(&self) -> Option<u32> {
        self.current.as_ref().map(Child::id)
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.stop();
    }
}
