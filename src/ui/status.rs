//! Status label model with a single pending reset.

use std::time::{Duration, Instant};

/// Idle status text.
pub const READY: &str = "Ready";

/// The text under the convert button.
///
/// At most one reset is pending at a time; an explicit [`set`](Self::set)
/// cancels it.
#[derive(Debug, Clone)]
pub struct StatusLine {
    text: String,
    pending: Option<(Instant, String)>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self {
            text: READY.to_string(),
            pending: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.pending = None;
    }

    /// Arrange for `text` to replace the current status at `now + delay`.
    pub fn schedule(&mut self, text: impl Into<String>, delay: Duration, now: Instant) {
        self.pending = Some((now + delay, text.into()));
    }

    /// Apply the pending reset if its deadline has passed.  Returns `true`
    /// when the text changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.pending.take() {
            Some((deadline, text)) if now >= deadline => {
                self.text = text;
                true
            }
            other => {
                self.pending = other;
                false
            }
        }
    }

    /// Time left until the pending reset, for repaint scheduling.
    pub fn time_until_reset(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(deadline, _)| deadline.saturating_duration_since(now))
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_ready() {
        assert_eq!(StatusLine::new().text(), READY);
    }

    #[test]
    fn reset_fires_exactly_at_deadline() {
        let start = Instant::now();
        let delay = Duration::from_millis(3000);
        let mut status = StatusLine::new();

        status.set("Text copied to clipboard!");
        status.schedule(READY, delay, start);

        assert!(!status.tick(start + delay - Duration::from_millis(1)));
        assert_eq!(status.text(), "Text copied to clipboard!");

        assert!(status.tick(start + delay));
        assert_eq!(status.text(), READY);

        // Nothing left pending.
        assert!(!status.tick(start + delay * 2));
        assert!(status.time_until_reset(start).is_none());
    }

    #[test]
    fn explicit_set_cancels_pending_reset() {
        let start = Instant::now();
        let mut status = StatusLine::new();
        status.schedule(READY, Duration::from_millis(10), start);

        status.set("Processing...");
        assert!(!status.tick(start + Duration::from_secs(1)));
        assert_eq!(status.text(), "Processing...");
    }

    #[test]
    fn time_until_reset_counts_down() {
        let start = Instant::now();
        let mut status = StatusLine::new();
        status.schedule(READY, Duration::from_millis(500), start);

        assert_eq!(
            status.time_until_reset(start + Duration::from_millis(200)),
            Some(Duration::from_millis(300))
        );
        assert_eq!(
            status.time_until_reset(start + Duration::from_secs(2)),
            Some(Duration::ZERO)
        );
    }
}
