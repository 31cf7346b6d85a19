use log::debug;

/// Tracks which rendered preview is currently playing.
///
/// The widget allows at most one active preview at a time. The
/// coordinator never touches audio itself; whoever reports a play
/// start is told which handle to stop, best-effort.
#[derive(Debug, Default)]
pub struct PlaybackCoordinator {
    active: Option<String>,
}

impl PlaybackCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `handle` as the active preview and returns the
    /// previously active handle if a different one was playing.
    /// Restarting the active handle stops nothing.
    pub fn register_play_start(&mut self, handle: &str) -> Option<String> {
        let to_stop = match self.active.take() {
            Some(active) if active != handle => Some(active),
            _ => None,
        };

        self.active = Some(handle.to_string());

        if let Some(stopped) = &to_stop {
            debug!("playback switch: stopping {stopped}, starting {handle}");
        }

        to_stop
    }

    /// Clears the slot when the active preview finishes on its own.
    /// Ended notifications for non-active handles are ignored; they
    /// arrive late when a preview was already replaced.
    pub fn register_ended(&mut self, handle: &str) {
        if self.active.as_deref() == Some(handle) {
            self.active = None;
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }
}
