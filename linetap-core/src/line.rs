//! Bounded printable text
//!
//! Every stored character is printable ASCII. Anything else that reaches a
//! line is replaced by `?`, and text past capacity is dropped, never an
//! error.

use core::fmt;
use heapless::String;

use crate::config::{ROW_CAPACITY, SEND_CAPACITY};

/// One row of the ring log
pub type Line = Text<ROW_CAPACITY>;

/// Content of the send buffer (leaves room for the sent marker)
pub type SendText = Text<SEND_CAPACITY>;

/// Printable ASCII string holding at most `N` characters
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Text<const N: usize>(String<N>);

impl<const N: usize> Text<N> {
    /// Create an empty text
    pub const fn new() -> Self {
        Self(String::new())
    }

    /// Build from arbitrary text, substituting and truncating as needed
    pub fn from_text(text: &str) -> Self {
        let mut out = Self::new();
        out.push_str_truncating(text);
        out
    }

    /// Append one byte
    ///
    /// Returns `false` (and drops the byte) when already full.
    pub fn push_byte(&mut self, byte: u8) -> bool {
        self.push_char(byte as char)
    }

    /// Append one character
    ///
    /// Returns `false` (and drops the character) when already full.
    pub fn push_char(&mut self, ch: char) -> bool {
        if self.is_full() {
            return false;
        }
        let ch = if ch.is_ascii_graphic() || ch == ' ' { ch } else { '?' };
        self.0.push(ch).is_ok()
    }

    /// Append as much of `text` as fits
    pub fn push_str_truncating(&mut self, text: &str) {
        for ch in text.chars() {
            if !self.push_char(ch) {
                break;
            }
        }
    }

    /// Remove the last character
    pub fn pop(&mut self) -> Option<char> {
        self.0.pop()
    }

    /// Empty the text
    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.0.len() >= N
    }

    /// Maximum number of characters
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> fmt::Debug for Text<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl<const N: usize> fmt::Display for Text<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for Text<N> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str());
    }
}
