//! Cosmetic character-by-character reveal of an already-complete string.
//!
//! The reveal never alters message content; it only paces how much of it is
//! visible. [`RevealState`] is the pure pacing state machine, and [`Reveal`]
//! drives it from a timer task that is torn down on completion, explicit
//! cancel, or drop.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Pure reveal state: a complete string plus a visible-prefix boundary.
#[derive(Debug)]
pub struct RevealState {
    text: String,
    shown: usize,
}

impl RevealState {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            shown: 0,
        }
    }

    /// The currently visible prefix. Starts empty.
    pub fn visible(&self) -> &str {
        &self.text[..self.shown]
    }

    pub fn is_complete(&self) -> bool {
        self.shown == self.text.len()
    }

    /// Reveals one more character, returning it, or `None` once the full
    /// string is visible.
    pub fn advance(&mut self) -> Option<char> {
        let next = self.text[self.shown..].chars().next()?;
        self.shown += next.len_utf8();
        Some(next)
    }
}

/// A running reveal: a timer task that emits one character per tick.
///
/// Owning the handle owns the timer. Dropping it (or calling [`cancel`])
/// stops the task, so superseding a reveal with a new one never leaks a
/// recurring timer.
///
/// [`cancel`]: Reveal::cancel
pub struct Reveal {
    rx: mpsc::UnboundedReceiver<char>,
    cancel: CancellationToken,
}

impl Reveal {
    pub fn start(text: impl Into<String>, period: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let mut state = RevealState::new(text);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let Some(ch) = state.advance() else { break };
                        if tx.send(ch).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self { rx, cancel }
    }

    /// Next revealed character, or `None` once the reveal has finished or
    /// been canceled.
    pub async fn next_char(&mut self) -> Option<char> {
        self.rx.recv().await
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for Reveal {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
