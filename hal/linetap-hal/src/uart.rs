//! UART serial communication abstractions
//!
//! The bridged serial line is written synchronously from the bridge loop
//! and reconfigured at runtime when the operator picks a new baud rate.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been queued or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Wait until the hardware transmit buffer has drained
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Runtime baud rate reconfiguration
pub trait BaudRateControl {
    /// Reprogram the line to `baudrate` bits per second
    ///
    /// Bytes in flight may be lost; callers reset their receive state.
    fn set_baudrate(&mut self, baudrate: u32);

    /// Currently programmed baud rate
    fn baudrate(&self) -> u32;
}

/// A serial line the bridge can both write and reconfigure
pub trait SerialLine: UartTx + BaudRateControl {}

// Blanket implementation
impl<T: UartTx + BaudRateControl> SerialLine for T {}
