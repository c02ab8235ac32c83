//! Linetap Hardware Abstraction Layer
//!
//! Traits implemented by chip-specific HALs so the bridge core can drive
//! the bridged serial line, persist settings and read buttons without
//! knowing which microcontroller it runs on.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  linetap-core / linetap-firmware        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  linetap-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!            ┌─────────────────┐
//!            │ linetap-hal-    │
//!            │    rp2040       │
//!            └─────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::BaudRateControl`] - Bridged serial line
//! - [`flash::FlashStorage`] - Persistent key-value storage
//! - [`gpio::InputPin`] - Button inputs

#![no_std]
#![deny(unsafe_code)]

pub mod flash;
pub mod gpio;
pub mod uart;

pub use flash::{FlashError, FlashStorage, StorageKey};
pub use gpio::InputPin;
pub use uart::{BaudRateControl, SerialLine, UartTx};
