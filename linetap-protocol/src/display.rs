//! Display-link messages
//!
//! The character display is a dumb terminal behind the companion. The bridge
//! sends one Clear, a Text per non-empty row, optional Inverts and a final
//! Flush for every redraw.

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};
use heapless::Vec;

pub const MSG_CLEAR: u8 = 0x20;
pub const MSG_TEXT: u8 = 0x21;
pub const MSG_INVERT: u8 = 0x22;
pub const MSG_FLUSH: u8 = 0x23;

/// Display dimensions in characters
pub const DISPLAY_ROWS: u8 = 8;
pub const DISPLAY_COLS: u8 = 21;

/// Commands sent to the display module
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMessage<'a> {
    /// Blank the off-screen buffer
    Clear,
    /// Draw text at a position
    Text { row: u8, col: u8, text: &'a str },
    /// Invert a region (selection highlight), `end_col` exclusive
    Invert { row: u8, start_col: u8, end_col: u8 },
    /// Present the off-screen buffer
    Flush,
}

impl DisplayMessage<'_> {
    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            DisplayMessage::Clear => Ok(Frame::empty(MSG_CLEAR)),
            DisplayMessage::Text { row, col, text } => {
                // Payload: [row][col][len][chars...]
                let bytes = text.as_bytes();
                let len = bytes.len().min(DISPLAY_COLS as usize);

                let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                payload
                    .extend_from_slice(&[*row, *col, len as u8])
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                payload
                    .extend_from_slice(&bytes[..len])
                    .map_err(|_| FrameError::PayloadTooLarge)?;

                Frame::new(MSG_TEXT, &payload)
            }
            DisplayMessage::Invert {
                row,
                start_col,
                end_col,
            } => Frame::new(MSG_INVERT, &[*row, *start_col, *end_col]),
            DisplayMessage::Flush => Ok(Frame::empty(MSG_FLUSH)),
        }
    }
}
