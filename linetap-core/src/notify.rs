//! Change notification
//!
//! The bridge reports every log append, baud change and error to a
//! [`Subscriber`]. It never knows which transports are behind it; the
//! firmware hands it a [`Fanout`] over whatever is connected. The display
//! is pull-based, so for it the notifier only keeps a dirty flag.

use linetap_protocol::{LogMode, Origin};

use crate::error::ErrorKind;

/// A log update as seen by subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEvent<'a> {
    pub mode: LogMode,
    pub text: &'a str,
    pub origin: Origin,
}

/// Receiver of bridge changes
pub trait Subscriber {
    /// A line was appended, or a full replay is being sent
    fn on_log_event(&mut self, event: &LogEvent<'_>);

    /// The active baud rate was set (also sent for no-op changes)
    fn on_baud_change(&mut self, baud: u32);

    /// An error was raised on the bridge
    fn on_error(&mut self, _kind: ErrorKind) {}
}

/// Subscriber that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSubscribers;

impl Subscriber for NoSubscribers {
    fn on_log_event(&mut self, _event: &LogEvent<'_>) {}
    fn on_baud_change(&mut self, _baud: u32) {}
}

/// Forwards every notification to each subscriber in order
pub struct Fanout<'a, 'b> {
    subscribers: &'a mut [&'b mut dyn Subscriber],
}

impl<'a, 'b> Fanout<'a, 'b> {
    pub fn new(subscribers: &'a mut [&'b mut dyn Subscriber]) -> Self {
        Self { subscribers }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl Subscriber for Fanout<'_, '_> {
    fn on_log_event(&mut self, event: &LogEvent<'_>) {
        for sub in self.subscribers.iter_mut() {
            sub.on_log_event(event);
        }
    }

    fn on_baud_change(&mut self, baud: u32) {
        for sub in self.subscribers.iter_mut() {
            sub.on_baud_change(baud);
        }
    }

    fn on_error(&mut self, kind: ErrorKind) {
        for sub in self.subscribers.iter_mut() {
            sub.on_error(kind);
        }
    }
}

/// Log delivery state for a subscriber behind a queue that can drop
///
/// Once an incremental update is lost the subscriber's copy of the log is
/// stale. Further increments are held back until a full replay gets
/// through, since the replay supersedes them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Resync {
    stale: bool,
}

impl Resync {
    pub const fn new() -> Self {
        Self { stale: false }
    }

    /// Whether a log update in `mode` should be offered to the queue
    pub fn admits(&self, mode: LogMode) -> bool {
        !self.stale || mode == LogMode::Full
    }

    /// Record whether an offered log update was queued
    pub fn record(&mut self, mode: LogMode, delivered: bool) {
        if !delivered {
            self.stale = true;
        } else if mode == LogMode::Full {
            self.stale = false;
        }
    }

    /// A full replay is owed
    pub fn is_stale(&self) -> bool {
        self.stale
    }
}

/// Dirty tracking and subscriber fan-out for bridge mutations
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    dirty: bool,
    last_redraw_ms: Option<u32>,
    refresh_ms: u32,
}

impl ChangeNotifier {
    pub const fn new(refresh_ms: u32) -> Self {
        Self {
            dirty: true,
            last_redraw_ms: None,
            refresh_ms,
        }
    }

    /// Announce an appended line
    pub fn line_appended<S: Subscriber + ?Sized>(&mut self, sub: &mut S, text: &str, origin: Origin) {
        self.dirty = true;
        sub.on_log_event(&LogEvent {
            mode: LogMode::Increment,
            text,
            origin,
        });
    }

    /// Announce the active baud rate
    pub fn baud_changed<S: Subscriber + ?Sized>(&mut self, sub: &mut S, baud: u32) {
        self.dirty = true;
        sub.on_baud_change(baud);
    }

    /// Announce an error
    pub fn error_raised<S: Subscriber + ?Sized>(&mut self, sub: &mut S, kind: ErrorKind) {
        self.dirty = true;
        sub.on_error(kind);
    }

    /// Force a redraw without notifying anyone
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Claim a redraw if the screen is dirty and the refresh interval passed
    pub fn take_redraw(&mut self, now_ms: u32) -> bool {
        if !self.dirty {
            return false;
        }
        if let Some(last) = self.last_redraw_ms {
            if now_ms.wrapping_sub(last) < self.refresh_ms {
                return false;
            }
        }
        self.dirty = false;
        self.last_redraw_ms = Some(now_ms);
        true
    }
}
