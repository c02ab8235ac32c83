//! Timed wrapper around [`State`]

use super::clicks::FastClick;
use super::events::Button;
use super::machine::{Action, State};
use crate::config::BridgeConfig;
use crate::error::ErrorKind;
use crate::settings::BaudRate;

/// Current interaction state plus click and overlay timing
#[derive(Debug, Clone)]
pub struct Interaction {
    state: State,
    clicks: FastClick,
    error_display_ms: u32,
}

impl Interaction {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            state: State::Receiving,
            clicks: FastClick::new(config.fast_click_window_ms),
            error_display_ms: config.error_display_ms,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Current fast-click step
    pub fn step(&self) -> u8 {
        self.clicks.step()
    }

    /// Handle a press, returning the side effect to perform
    pub fn press(&mut self, button: Button, now_ms: u32, active_baud: BaudRate) -> Action {
        if self.state.is_error() {
            return Action::None;
        }

        let step = self.clicks.register(button, now_ms);
        let (next, action) = self.state.on_press(button, step, active_baud);
        self.enter(next);
        action
    }

    /// Show an error over whatever is on screen
    pub fn raise(&mut self, kind: ErrorKind, now_ms: u32) {
        let next = self.state.on_error(kind, now_ms);
        self.enter(next);
    }

    /// Expire the overlay; returns true if the state changed
    pub fn poll(&mut self, now_ms: u32) -> bool {
        let next = self.state.on_tick(now_ms, self.error_display_ms);
        if next == self.state {
            return false;
        }
        self.enter(next);
        true
    }

    fn enter(&mut self, next: State) {
        if !next.same_kind(&self.state) {
            self.clicks.reset();
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Mode;

    fn baud(value: u32) -> BaudRate {
        BaudRate::from_value(value).unwrap()
    }

    #[test]
    fn test_fast_clicks_in_baud_picker() {
        let mut ui = Interaction::new(&BridgeConfig::default());
        let active = baud(9600);

        ui.press(Button::Next, 0, active);
        assert_eq!(ui.state(), State::BaudPicker { cursor: 3 });

        ui.press(Button::Next, 100, active);
        assert_eq!(ui.step(), 1);
        ui.press(Button::Next, 200, active);
        assert_eq!(ui.step(), 2);
        assert_eq!(ui.state(), State::BaudPicker { cursor: 6 });

        let action = ui.press(Button::Select, 250, active);
        assert_eq!(action, Action::CommitBaud(baud(57600)));
        assert_eq!(ui.state(), State::Receiving);
    }

    #[test]
    fn test_slow_clicks_step_once() {
        let mut ui = Interaction::new(&BridgeConfig::default());
        let active = baud(1200);
        ui.press(Button::Next, 0, active);
        ui.press(Button::Next, 1000, active);
        ui.press(Button::Next, 1400, active);
        assert_eq!(ui.step(), 1);
        assert_eq!(ui.state(), State::BaudPicker { cursor: 2 });
    }

    #[test]
    fn test_overlay_expires_and_blocks_input() {
        let mut ui = Interaction::new(&BridgeConfig::default());
        ui.press(Button::Select, 0, baud(9600));
        ui.raise(ErrorKind::UnknownCommand, 1000);

        assert_eq!(ui.press(Button::Next, 1100, baud(9600)), Action::None);
        assert!(!ui.poll(5999));
        assert!(ui.poll(6000));
        assert_eq!(ui.state().mode(), Mode::CharacterEntry { cursor: 0 });
    }

    #[test]
    fn test_custom_overlay_duration() {
        let config = BridgeConfig {
            error_display_ms: 100,
            ..BridgeConfig::default()
        };
        let mut ui = Interaction::new(&config);
        ui.raise(ErrorKind::TransportUnavailable, 0);
        assert!(ui.poll(100));
        assert_eq!(ui.state(), State::Receiving);
    }
}
