//! Display backend that encodes draw calls as companion frames

use heapless::Vec;

use linetap_display::{DisplayBackend, DisplayError};
use linetap_protocol::DisplayMessage;

/// Room for one full screen: clear, 8 text rows, 8 inverts and a flush
pub const SCREEN_FRAME_BYTES: usize = 512;

/// Collects the frames for one redraw so they go out in a single write
#[derive(Default)]
pub struct FrameSink {
    bytes: Vec<u8, SCREEN_FRAME_BYTES>,
}

impl FrameSink {
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn push(&mut self, message: DisplayMessage<'_>) -> Result<(), DisplayError> {
        let frame = message
            .to_frame()
            .and_then(|frame| frame.encode_to_vec())
            .map_err(|_| DisplayError::Communication)?;
        self.bytes
            .extend_from_slice(&frame)
            .map_err(|_| DisplayError::Communication)
    }
}

impl DisplayBackend for FrameSink {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.push(DisplayMessage::Clear)
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        self.push(DisplayMessage::Text { row, col, text })
    }

    fn invert_region(&mut self, row: u8, start_col: u8, end_col: u8) -> Result<(), DisplayError> {
        self.push(DisplayMessage::Invert {
            row,
            start_col,
            end_col,
        })
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.push(DisplayMessage::Flush)
    }
}
