//! Character display abstraction for Linetap
//!
//! This crate provides:
//! - [`Screen`]: an 8×21 character buffer with per-row highlight
//! - [`DisplayBackend`]: the interface a physical display implements
//! - [`present`]: pushes a screen through any backend
//!
//! The bridge core only ever composes a [`Screen`]; how characters become
//! pixels is the backend's business.

#![no_std]

pub mod backend;
pub mod screen;

pub use backend::{present, DisplayBackend, DisplayError};
pub use screen::{Screen, SCREEN_COLS, SCREEN_ROWS};
