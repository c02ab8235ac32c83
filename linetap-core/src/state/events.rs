//! Button input

/// Physical buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Prev,
    Select,
    Next,
}

/// A debounced press with its timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    pub button: Button,
    /// Monotonic time of the press (ms)
    pub at_ms: u32,
}

impl Button {
    /// Navigation direction: -1 for Prev, +1 for Next, 0 for Select
    pub fn direction(self) -> i32 {
        match self {
            Button::Prev => -1,
            Button::Select => 0,
            Button::Next => 1,
        }
    }
}
