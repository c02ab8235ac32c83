//! Screen buffer types
//!
//! A character-based screen buffer for text-mode displays.

use heapless::String;

/// Number of character rows
pub const SCREEN_ROWS: usize = 8;

/// Number of character columns
pub const SCREEN_COLS: usize = 21;

/// Screen buffer for text-mode displays
#[derive(Clone, PartialEq, Eq)]
pub struct Screen {
    /// Current display content
    lines: [String<SCREEN_COLS>; SCREEN_ROWS],
    /// Highlight (invert) region per row, `(start_col, end_col)` end exclusive
    highlights: [Option<(u8, u8)>; SCREEN_ROWS],
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// Create a new empty screen
    pub const fn new() -> Self {
        Self {
            lines: [const { String::new() }; SCREEN_ROWS],
            highlights: [None; SCREEN_ROWS],
        }
    }

    /// Clear the entire screen
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        self.highlights = [None; SCREEN_ROWS];
    }

    /// Set the content of a row, truncating to the screen width
    pub fn set_line(&mut self, row: usize, text: &str) {
        if let Some(line) = self.lines.get_mut(row) {
            line.clear();
            for ch in text.chars().take(SCREEN_COLS) {
                let _ = line.push(ch);
            }
        }
    }

    /// Set a row with text centered horizontally
    pub fn set_centered(&mut self, row: usize, text: &str) {
        let width = text.chars().count().min(SCREEN_COLS);
        let pad = (SCREEN_COLS - width) / 2;
        let mut line: String<SCREEN_COLS> = String::new();
        for _ in 0..pad {
            let _ = line.push(' ');
        }
        for ch in text.chars().take(width) {
            let _ = line.push(ch);
        }
        self.set_line(row, &line);
    }

    /// Get the content of a row
    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|s| s.as_str())
    }

    /// Highlight a whole row
    pub fn highlight_row(&mut self, row: usize) {
        self.set_highlight(row, 0, SCREEN_COLS as u8);
    }

    /// Set highlight (invert) region for a row
    pub fn set_highlight(&mut self, row: usize, start_col: u8, end_col: u8) {
        if let Some(slot) = self.highlights.get_mut(row) {
            *slot = Some((start_col, end_col.min(SCREEN_COLS as u8)));
        }
    }

    /// Get highlight region for a row
    pub fn highlight(&self, row: usize) -> Option<(u8, u8)> {
        self.highlights.get(row).copied().flatten()
    }

    /// Iterate rows
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|s| s.as_str())
    }
}

impl core::fmt::Debug for Screen {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.lines()).finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{}", line.as_str());
        }
        defmt::write!(f, "]");
    }
}
