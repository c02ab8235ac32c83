//! Transport supervision
//!
//! Connection plumbing lives in the firmware; this is the policy deciding
//! how long to wait between attempts and when to give up.

/// Initial delay before the first reconnect attempt (ms)
pub const RECONNECT_INITIAL_MS: u32 = 1_000;

/// Longest delay between attempts (ms)
pub const RECONNECT_MAX_MS: u32 = 30_000;

/// Default count of consecutive failures that ends in a reset
pub const MAX_RECONNECT_FAILURES: u8 = 5;

/// What the supervisor should do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Recovery {
    /// Wait this long, then try again
    RetryAfter(u32),
    /// Give up and reset the device
    Reset,
}

/// Exponential backoff with a failure ceiling
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    failures: u8,
    max_failures: u8,
    delay_ms: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconnectPolicy {
    pub const fn new() -> Self {
        Self::with_max_failures(MAX_RECONNECT_FAILURES)
    }

    /// Policy that resets on the `max_failures`th consecutive failure
    ///
    /// The delay reaches [`RECONNECT_MAX_MS`] from the seventh attempt on,
    /// so only limits above six ever wait that long.
    pub const fn with_max_failures(max_failures: u8) -> Self {
        Self {
            failures: 0,
            max_failures,
            delay_ms: RECONNECT_INITIAL_MS,
        }
    }

    /// Record a failed attempt
    pub fn on_failure(&mut self) -> Recovery {
        self.failures = self.failures.saturating_add(1);
        if self.failures >= self.max_failures {
            return Recovery::Reset;
        }

        let delay = self.delay_ms;
        self.delay_ms = self.delay_ms.saturating_mul(2).min(RECONNECT_MAX_MS);
        Recovery::RetryAfter(delay)
    }

    /// Record a successful connect
    pub fn on_connected(&mut self) {
        *self = Self::with_max_failures(self.max_failures);
    }

    pub fn failures(&self) -> u8 {
        self.failures
    }
}
