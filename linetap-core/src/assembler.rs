//! Line assembly from the raw serial byte stream
//!
//! A line ends when it reaches [`ROW_CAPACITY`], when a control byte
//! (< 0x20) arrives, or when the line has been idle for longer than the
//! configured timeout.
//!
//! [`ROW_CAPACITY`]: crate::config::ROW_CAPACITY

use crate::line::Line;

/// Byte-to-line segmenter
#[derive(Debug, Clone)]
pub struct LineAssembler {
    /// Line in progress
    buffer: Line,
    /// Time the last printable byte was accepted (ms)
    last_byte_ms: u32,
    /// Idle cutoff (ms)
    idle_timeout_ms: u32,
}

impl LineAssembler {
    /// Create an assembler with the given idle cutoff
    pub const fn new(idle_timeout_ms: u32) -> Self {
        Self {
            buffer: Line::new(),
            last_byte_ms: 0,
            idle_timeout_ms,
        }
    }

    /// Feed one received byte
    ///
    /// Returns a completed line when this byte ends one. Control bytes on
    /// an empty buffer are swallowed.
    pub fn feed(&mut self, byte: u8, now_ms: u32) -> Option<Line> {
        if byte < 0x20 {
            return self.take();
        }

        self.buffer.push_byte(byte);
        self.last_byte_ms = now_ms;

        // Capacity is checked after the append so the filling byte is kept
        if self.buffer.is_full() {
            return self.take();
        }
        None
    }

    /// Flush a partial line that has been idle past the timeout
    pub fn flush_if_idle(&mut self, now_ms: u32) -> Option<Line> {
        if now_ms.wrapping_sub(self.last_byte_ms) > self.idle_timeout_ms {
            self.take()
        } else {
            None
        }
    }

    /// Drop any partial line
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Partial line not yet flushed
    pub fn pending(&self) -> &str {
        self.buffer.as_str()
    }

    fn take(&mut self) -> Option<Line> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(core::mem::take(&mut self.buffer))
    }
}
