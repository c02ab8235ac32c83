//! Bridged serial line transmitter
//!
//! The receive half of the buffered UART is read directly by the firmware;
//! this wraps the transmit half so the bridge core can write to it and
//! change the line rate.

use embassy_rp::uart::{BufferedUartTx, Error};
use embedded_io::Write;
use linetap_hal::{BaudRateControl, UartTx};

/// Transmit half of the bridged UART
pub struct BridgeUartTx {
    tx: BufferedUartTx,
    baudrate: u32,
}

impl BridgeUartTx {
    /// Wrap a transmitter already running at `baudrate`
    pub fn new(tx: BufferedUartTx, baudrate: u32) -> Self {
        Self { tx, baudrate }
    }
}

impl UartTx for BridgeUartTx {
    type Error = Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Error> {
        self.tx.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.tx.blocking_flush()
    }
}

impl BaudRateControl for BridgeUartTx {
    fn set_baudrate(&mut self, baudrate: u32) {
        // Reprograms the divisors shared with the receive half
        self.tx.set_baudrate(baudrate);
        self.baudrate = baudrate;
    }

    fn baudrate(&self) -> u32 {
        self.baudrate
    }
}
