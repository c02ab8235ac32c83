//! RP2040-specific HAL for the Linetap serial bridge
//!
//! Implements the `linetap-hal` traits on embassy-rp peripherals:
//!
//! - Flash storage driver (implements `linetap_hal::FlashStorage`)
//! - Bridged UART transmitter with runtime baud changes
//! - Debounced front-panel buttons

#![no_std]

pub mod button;
pub mod flash;
pub mod uart;

pub use button::Button;
pub use flash::Rp2040FlashStorage;
pub use uart::BridgeUartTx;

// Re-export shared traits for convenience
pub use linetap_hal::{FlashStorage as FlashStorageTrait, StorageKey};
