//! Compile-time limits and tunable timing
//!
//! Capacities are constants because they size static buffers. Timing lives
//! in [`BridgeConfig`] so the firmware can override it from `bridge.toml`.

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Maximum characters in one logged line
pub const ROW_CAPACITY: usize = 32;

/// Number of line slots in the ring log
pub const RING_CAPACITY: usize = 40;

/// Lines moved per scroll step, and rows in the log viewport
pub const PAGE_LINES: usize = 8;

/// Marker prefixed to transmitted lines in the log
pub const SENT_MARKER: &str = "> ";

/// Longest text the send buffer accepts
pub const SEND_CAPACITY: usize = ROW_CAPACITY - SENT_MARKER.len();

/// Terminator written after every transmitted line
pub const LINE_TERMINATOR: &[u8] = b"\r\n";

/// Upper bound of the fast-click step multiplier
pub const MAX_STEP: u8 = 8;

/// Default idle time before a partial line is flushed (ms)
pub const IDLE_TIMEOUT_MS: u32 = 500;

/// Default window for repeated presses to count as fast clicks (ms)
pub const FAST_CLICK_WINDOW_MS: u32 = 300;

/// Default time the error overlay stays up (ms)
pub const ERROR_DISPLAY_MS: u32 = 5000;

/// Default minimum interval between display redraws (ms)
pub const DISPLAY_REFRESH_MS: u32 = 100;

/// Runtime timing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BridgeConfig {
    /// Flush a partial line after this much silence
    pub idle_timeout_ms: u32,
    /// Repeats closer than this accelerate navigation
    pub fast_click_window_ms: u32,
    /// How long an error stays on screen
    pub error_display_ms: u32,
    /// Minimum time between redraws
    pub display_refresh_ms: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: IDLE_TIMEOUT_MS,
            fast_click_window_ms: FAST_CLICK_WINDOW_MS,
            error_display_ms: ERROR_DISPLAY_MS,
            display_refresh_ms: DISPLAY_REFRESH_MS,
        }
    }
}
