//! Front-panel buttons
//!
//! Buttons are wired active-low with the internal pull-up enabled.

use embassy_rp::gpio::{AnyPin, Input, Pull};
use embassy_rp::Peri;
use embassy_time::{Duration, Timer};
use linetap_hal::InputPin;

/// Time a level must be stable to count
pub const DEBOUNCE_MS: u64 = 20;

/// One debounced push button
pub struct Button<'d> {
    input: Input<'d>,
}

impl<'d> Button<'d> {
    pub fn new(pin: Peri<'d, AnyPin>) -> Self {
        Self {
            input: Input::new(pin, Pull::Up),
        }
    }

    /// Wait until the button is held down past the debounce time
    pub async fn wait_for_press(&mut self) {
        loop {
            self.input.wait_for_low().await;
            Timer::after(Duration::from_millis(DEBOUNCE_MS)).await;
            if self.is_pressed() {
                return;
            }
        }
    }

    /// Wait until the button has been let go past the debounce time
    pub async fn wait_for_release(&mut self) {
        loop {
            self.input.wait_for_high().await;
            Timer::after(Duration::from_millis(DEBOUNCE_MS)).await;
            if !self.is_pressed() {
                return;
            }
        }
    }
}

impl InputPin for Button<'_> {
    fn is_high(&self) -> bool {
        self.input.is_high()
    }
}
