//! GPIO input abstraction used for the front-panel buttons

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }

    /// Check if an active-low button on this pin is held down
    fn is_pressed(&self) -> bool {
        self.is_low()
    }
}
