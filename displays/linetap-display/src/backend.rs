//! Display backend trait

use crate::screen::{Screen, SCREEN_ROWS};

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Display not initialized
    NotInitialized,
}

/// Display backend trait
///
/// Hardware-agnostic interface for character displays.
pub trait DisplayBackend {
    /// Clear the entire display
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw text at the specified row and column (both 0-based)
    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError>;

    /// Invert a region on the specified row, `end_col` exclusive
    fn invert_region(&mut self, row: u8, start_col: u8, end_col: u8) -> Result<(), DisplayError>;

    /// Flush buffered content to the display
    fn flush(&mut self) -> Result<(), DisplayError>;
}

/// Push a full screen through a backend
pub fn present<B: DisplayBackend + ?Sized>(
    screen: &Screen,
    backend: &mut B,
) -> Result<(), DisplayError> {
    backend.clear()?;
    for row in 0..SCREEN_ROWS {
        if let Some(text) = screen.line(row).filter(|t| !t.is_empty()) {
            backend.draw_text(row as u8, 0, text)?;
        }
        if let Some((start, end)) = screen.highlight(row) {
            backend.invert_region(row as u8, start, end)?;
        }
    }
    backend.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;

    #[derive(Debug, PartialEq)]
    enum Op {
        Clear,
        Text(u8),
        Invert(u8),
        Flush,
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op, 32>,
    }

    impl DisplayBackend for Recorder {
        fn clear(&mut self) -> Result<(), DisplayError> {
            self.ops.push(Op::Clear).map_err(|_| DisplayError::Communication)
        }
        fn draw_text(&mut self, row: u8, _col: u8, _text: &str) -> Result<(), DisplayError> {
            self.ops.push(Op::Text(row)).map_err(|_| DisplayError::Communication)
        }
        fn invert_region(&mut self, row: u8, _s: u8, _e: u8) -> Result<(), DisplayError> {
            self.ops.push(Op::Invert(row)).map_err(|_| DisplayError::Communication)
        }
        fn flush(&mut self) -> Result<(), DisplayError> {
            self.ops.push(Op::Flush).map_err(|_| DisplayError::Communication)
        }
    }

    #[test]
    fn test_present_skips_empty_rows() {
        let mut screen = Screen::new();
        screen.set_line(0, "Hello");
        screen.set_line(2, "World");
        screen.highlight_row(2);

        let mut rec = Recorder::default();
        present(&screen, &mut rec).unwrap();

        assert_eq!(
            &rec.ops[..],
            &[Op::Clear, Op::Text(0), Op::Text(2), Op::Invert(2), Op::Flush]
        );
    }
}
