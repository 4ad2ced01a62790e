//! Visibility subscription on the last loaded item.
//!
//! At most one item is observed at a time. The observer fires once when its
//! target is the displayed item and at least `threshold` of it is on screen,
//! and re-arms when the target leaves the screen or a new target is observed.

pub const FULLY_VISIBLE: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct LastItemObserver {
    threshold: f32,
    target: Option<usize>,
    fired: bool,
}

impl LastItemObserver {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            target: None,
            fired: false,
        }
    }

    pub fn target(&self) -> Option<usize> {
        self.target
    }

    /// Observe the item at `index`, disconnecting any previous target first.
    /// Observing the current target again keeps its state.
    pub fn observe(&mut self, index: usize) {
        if self.target == Some(index) {
            return;
        }
        self.disconnect();
        self.target = Some(index);
        tracing::debug!(index, "observing last item");
    }

    pub fn disconnect(&mut self) {
        if let Some(index) = self.target.take() {
            tracing::debug!(index, "observer disconnected");
        }
        self.fired = false;
    }

    /// Report that the item at `displayed` is on screen with `ratio` of it
    /// visible. Returns true when the observed item has just become visible.
    pub fn on_visibility(&mut self, displayed: usize, ratio: f32) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        if displayed != target || ratio < self.threshold {
            self.fired = false;
            return false;
        }
        if self.fired {
            return false;
        }
        self.fired = true;
        tracing::debug!(index = target, ratio, "last item visible");
        true
    }
}

impl Default for LastItemObserver {
    fn default() -> Self {
        Self::new(FULLY_VISIBLE)
    }
}
