//! Linetap wire protocols
//!
//! - **Subscriber messages** ([`messages`], [`commands`]): small JSON
//!   documents exchanged with web and broker clients.
//!   ```text
//!   → {"type":"log","mode":"increment","text":"OK","origin":"received"}
//!   → {"type":"baud","value":9600}
//!   ← {"command":"setBaud","value":57600}
//!   ← {"command":"send","value":"AT"}
//!   ```
//! - **Companion link** ([`frame`], [`display`], [`link`]): binary frames
//!   on the UART to the companion module, which drives the character
//!   display and hosts the network links. Display messages only flow out;
//!   link messages tunnel the JSON above in both directions.
//!   ```text
//!   ┌───────┬────────┬──────┬─────────────┬──────────┐
//!   │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//!   │ 1B    │ 1B     │ 1B   │ 0–32B       │ 1B       │
//!   └───────┴────────┴──────┴─────────────┴──────────┘
//!   ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod commands;
pub mod display;
pub mod frame;
pub mod link;
pub mod messages;

pub use commands::{Command, CommandError};
pub use display::{DisplayMessage, DISPLAY_COLS, DISPLAY_ROWS};
pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_PAYLOAD_SIZE};
pub use link::{LinkError, LinkId, LinkMessage, Reassembler};
pub use messages::{LogMode, Notification, Origin};
