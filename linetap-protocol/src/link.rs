//! Network links carried over the companion UART
//!
//! The companion module hosts the web page and the broker session. It
//! reports each link coming up or going down and tunnels the subscriber
//! JSON in both directions. A JSON document is split into as many
//! [`MSG_LINK_DATA`] frames as needed; the last one has [`FLAG_FINAL`] set.
//!
//! ```text
//! LINK_UP      [link]
//! LINK_DOWN    [link]
//! LINK_DATA    [link][flags][bytes...]
//! LINK_CONNECT [link]                     (bridge → companion)
//! ```

use heapless::Vec;

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};

pub const MSG_LINK_UP: u8 = 0x30;
pub const MSG_LINK_DOWN: u8 = 0x31;
pub const MSG_LINK_DATA: u8 = 0x32;
pub const MSG_LINK_CONNECT: u8 = 0x33;

/// Set on the last chunk of a document
pub const FLAG_FINAL: u8 = 0x01;

/// Data bytes carried by one LINK_DATA frame
pub const CHUNK_SIZE: usize = MAX_PAYLOAD_SIZE - 2;

/// Which network client a message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkId {
    /// Browser session on the web page
    Web,
    /// Message-broker session
    Broker,
}

impl LinkId {
    pub const ALL: [LinkId; 2] = [LinkId::Web, LinkId::Broker];

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(LinkId::Web),
            1 => Some(LinkId::Broker),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Link frame decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Frame type is not a link message
    UnknownType(u8),
    /// Link byte names no known link
    UnknownLink(u8),
    /// Payload too short for its type
    Truncated,
    /// Reassembled document does not fit
    Overflow,
}

/// A decoded link frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkMessage<'a> {
    Up(LinkId),
    Down(LinkId),
    Data {
        link: LinkId,
        last: bool,
        chunk: &'a [u8],
    },
    /// Ask the companion to (re)open a link
    Connect(LinkId),
}

impl<'a> LinkMessage<'a> {
    /// Decode a frame received from the companion
    pub fn from_frame(frame: &'a Frame) -> Result<Self, LinkError> {
        let link = || {
            let byte = *frame.payload.first().ok_or(LinkError::Truncated)?;
            LinkId::from_u8(byte).ok_or(LinkError::UnknownLink(byte))
        };

        match frame.msg_type {
            MSG_LINK_UP => Ok(LinkMessage::Up(link()?)),
            MSG_LINK_DOWN => Ok(LinkMessage::Down(link()?)),
            MSG_LINK_CONNECT => Ok(LinkMessage::Connect(link()?)),
            MSG_LINK_DATA => {
                let link = link()?;
                let flags = *frame.payload.get(1).ok_or(LinkError::Truncated)?;
                Ok(LinkMessage::Data {
                    link,
                    last: flags & FLAG_FINAL != 0,
                    chunk: &frame.payload[2..],
                })
            }
            other => Err(LinkError::UnknownType(other)),
        }
    }

    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match *self {
            LinkMessage::Up(link) => Frame::new(MSG_LINK_UP, &[link.as_u8()]),
            LinkMessage::Down(link) => Frame::new(MSG_LINK_DOWN, &[link.as_u8()]),
            LinkMessage::Connect(link) => Frame::new(MSG_LINK_CONNECT, &[link.as_u8()]),
            LinkMessage::Data { link, last, chunk } => {
                let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                let flags = if last { FLAG_FINAL } else { 0 };
                payload
                    .extend_from_slice(&[link.as_u8(), flags])
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                payload
                    .extend_from_slice(chunk)
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                Ok(Frame {
                    msg_type: MSG_LINK_DATA,
                    payload,
                })
            }
        }
    }
}

/// Split a document into LINK_DATA messages
///
/// An empty document still yields one (final) message.
pub fn split(link: LinkId, data: &[u8]) -> impl Iterator<Item = LinkMessage<'_>> {
    let count = data.len().div_ceil(CHUNK_SIZE).max(1);
    (0..count).map(move |i| {
        let start = i * CHUNK_SIZE;
        let end = (start + CHUNK_SIZE).min(data.len());
        LinkMessage::Data {
            link,
            last: i + 1 == count,
            chunk: &data[start..end],
        }
    })
}

/// Collects LINK_DATA chunks back into whole documents
///
/// One document is in flight per link. A document that does not fit is
/// dropped and reported once, when its final chunk arrives.
#[derive(Debug, Clone)]
pub struct Reassembler<const N: usize> {
    buffers: [Vec<u8, N>; 2],
    discarding: [bool; 2],
    complete: [bool; 2],
}

impl<const N: usize> Default for Reassembler<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Reassembler<N> {
    pub const fn new() -> Self {
        Self {
            buffers: [Vec::new(), Vec::new()],
            discarding: [false; 2],
            complete: [false; 2],
        }
    }

    /// Add a chunk, returning the document once its final chunk is in
    ///
    /// The returned document stays valid until the next push for the
    /// same link.
    pub fn push(&mut self, link: LinkId, last: bool, chunk: &[u8]) -> Result<Option<&[u8]>, LinkError> {
        let i = link.index();
        if core::mem::take(&mut self.complete[i]) {
            self.buffers[i].clear();
        }

        if !self.discarding[i] && self.buffers[i].extend_from_slice(chunk).is_err() {
            self.buffers[i].clear();
            self.discarding[i] = true;
        }

        if !last {
            return Ok(None);
        }
        if core::mem::take(&mut self.discarding[i]) {
            self.buffers[i].clear();
            return Err(LinkError::Overflow);
        }

        self.complete[i] = true;
        Ok(Some(&self.buffers[i]))
    }

    /// Drop any partial document for `link`
    pub fn reset(&mut self, link: LinkId) {
        let i = link.index();
        self.buffers[i].clear();
        self.discarding[i] = false;
        self.complete[i] = false;
    }
}
