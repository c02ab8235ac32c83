//! Board-agnostic core logic for the Linetap serial bridge
//!
//! This crate contains everything that does not depend on a specific
//! microcontroller:
//!
//! - Line assembly from the raw serial byte stream
//! - The ring log of received and sent lines
//! - The three-button interaction state machine and on-screen keyboard
//! - Change notification to subscribers
//! - Settings record encoding and validation
//! - Screen composition
//! - The [`Bridge`](bridge::Bridge) aggregate tying it together

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod assembler;
pub mod bridge;
pub mod config;
pub mod error;
pub mod keyboard;
pub mod line;
pub mod notify;
pub mod render;
pub mod ringlog;
pub mod settings;
pub mod state;
pub mod transport;

pub use bridge::Bridge;
pub use config::BridgeConfig;
pub use error::{BridgeError, ErrorKind};
pub use line::Line;
pub use notify::{Fanout, LogEvent, Subscriber};
pub use settings::{LoadOutcome, Settings, SettingsRecord, SettingsStore};
