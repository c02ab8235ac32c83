//! Interaction state definition
//!
//! Every transition is a function of the current state and one input.
//! Side effects are described by the returned [`Action`], never performed
//! here.

use super::events::Button;
use crate::error::ErrorKind;
use crate::keyboard::{wrap_cursor, Key, PALETTE_LEN};
use crate::settings::{BaudRate, BAUD_RATES};

/// A state the error overlay can return to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Live tail of the log
    Receiving,
    /// Choosing a baud rate
    BaudPicker { cursor: u8 },
    /// Composing a line on the on-screen keyboard
    CharacterEntry { cursor: u8 },
    /// Paging through history
    Scrolling,
}

/// Interaction states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Receiving,
    BaudPicker {
        cursor: u8,
    },
    CharacterEntry {
        cursor: u8,
    },
    Scrolling,
    /// Error banner; input ignored until it expires
    ErrorOverlay {
        kind: ErrorKind,
        resume: Mode,
        since_ms: u32,
    },
}

/// Side effect requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    None,
    /// Detach the log cursor from the tail
    BeginScroll,
    /// Move the log cursor by pages (negative is older)
    Scroll(i32),
    /// Snap the log cursor back to the tail
    EndScroll,
    /// Apply and persist a baud rate
    CommitBaud(BaudRate),
    /// Append a character to the send buffer
    Type(char),
    /// Remove the last character of the send buffer
    Delete,
    /// Clear the send buffer
    Discard,
    /// Transmit and clear the send buffer
    Send,
}

impl Default for State {
    fn default() -> Self {
        State::Receiving
    }
}

impl From<Mode> for State {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Receiving => State::Receiving,
            Mode::BaudPicker { cursor } => State::BaudPicker { cursor },
            Mode::CharacterEntry { cursor } => State::CharacterEntry { cursor },
            Mode::Scrolling => State::Scrolling,
        }
    }
}

impl State {
    /// Interactive mode, or the one the overlay will resume
    pub fn mode(&self) -> Mode {
        match *self {
            State::Receiving => Mode::Receiving,
            State::BaudPicker { cursor } => Mode::BaudPicker { cursor },
            State::CharacterEntry { cursor } => Mode::CharacterEntry { cursor },
            State::Scrolling => Mode::Scrolling,
            State::ErrorOverlay { resume, .. } => resume,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, State::ErrorOverlay { .. })
    }

    /// Whether `other` is the same state ignoring cursors and timers
    pub fn same_kind(&self, other: &State) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }

    /// Handle a button press moving by `step`
    pub fn on_press(self, button: Button, step: u8, active_baud: BaudRate) -> (Self, Action) {
        use Button::*;
        use State::*;

        let delta = button.direction() * step as i32;

        match (self, button) {
            (Receiving, Select) => (CharacterEntry { cursor: 0 }, Action::None),
            (Receiving, Next) => (
                BaudPicker {
                    cursor: active_baud.index() as u8,
                },
                Action::None,
            ),
            (Receiving, Prev) => (Scrolling, Action::BeginScroll),

            (BaudPicker { cursor }, Prev | Next) => {
                let cursor = wrap_cursor(cursor as usize, delta, BAUD_RATES.len()) as u8;
                (BaudPicker { cursor }, Action::None)
            }
            (BaudPicker { cursor }, Select) => match BaudRate::from_index(cursor as usize) {
                Some(rate) => (Receiving, Action::CommitBaud(rate)),
                None => (Receiving, Action::None),
            },

            (CharacterEntry { cursor }, Prev | Next) => {
                let cursor = wrap_cursor(cursor as usize, delta, PALETTE_LEN) as u8;
                (CharacterEntry { cursor }, Action::None)
            }
            (CharacterEntry { cursor }, Select) => match Key::at(cursor as usize) {
                Key::Char(ch) => (self, Action::Type(ch)),
                Key::Space => (self, Action::Type(' ')),
                Key::Delete => (self, Action::Delete),
                Key::Cancel => (Receiving, Action::Discard),
                Key::Send => (Receiving, Action::Send),
            },

            // Scrolling moves one page per press regardless of step
            (Scrolling, Prev | Next) => (Scrolling, Action::Scroll(button.direction())),
            (Scrolling, Select) => (Receiving, Action::EndScroll),

            (ErrorOverlay { .. }, _) => (self, Action::None),
        }
    }

    /// Enter (or refresh) the error overlay
    ///
    /// A second error replaces the message and restarts the timer but keeps
    /// the state to resume.
    pub fn on_error(self, kind: ErrorKind, now_ms: u32) -> Self {
        State::ErrorOverlay {
            kind,
            resume: self.mode(),
            since_ms: now_ms,
        }
    }

    /// Leave the overlay once it has been shown long enough
    pub fn on_tick(self, now_ms: u32, error_display_ms: u32) -> Self {
        match self {
            State::ErrorOverlay {
                resume, since_ms, ..
            } if now_ms.wrapping_sub(since_ms) >= error_display_ms => resume.into(),
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baud(value: u32) -> BaudRate {
        BaudRate::from_value(value).unwrap()
    }

    #[test]
    fn test_receiving_entries() {
        let active = baud(9600);
        assert_eq!(
            State::Receiving.on_press(Button::Select, 1, active),
            (State::CharacterEntry { cursor: 0 }, Action::None)
        );
        assert_eq!(
            State::Receiving.on_press(Button::Next, 1, active),
            (State::BaudPicker { cursor: 3 }, Action::None)
        );
        assert_eq!(
            State::Receiving.on_press(Button::Prev, 1, active),
            (State::Scrolling, Action::BeginScroll)
        );
    }

    #[test]
    fn test_baud_picker_wraps() {
        let active = baud(115200);
        let (state, _) = State::BaudPicker { cursor: 7 }.on_press(Button::Next, 2, active);
        assert_eq!(state, State::BaudPicker { cursor: 1 });
        let (state, _) = State::BaudPicker { cursor: 0 }.on_press(Button::Prev, 1, active);
        assert_eq!(state, State::BaudPicker { cursor: 7 });
    }

    #[test]
    fn test_baud_picker_commit() {
        let (state, action) =
            State::BaudPicker { cursor: 6 }.on_press(Button::Select, 1, baud(9600));
        assert_eq!(state, State::Receiving);
        assert_eq!(action, Action::CommitBaud(baud(57600)));
    }

    #[test]
    fn test_keyboard_keys() {
        let active = baud(9600);
        let at = |cursor: u8| State::CharacterEntry { cursor };

        assert_eq!(at(0).on_press(Button::Select, 1, active), (at(0), Action::Type('A')));
        assert_eq!(at(85).on_press(Button::Select, 1, active), (at(85), Action::Type(' ')));
        assert_eq!(at(86).on_press(Button::Select, 1, active), (at(86), Action::Delete));
        assert_eq!(
            at(87).on_press(Button::Select, 1, active),
            (State::Receiving, Action::Discard)
        );
        assert_eq!(
            at(88).on_press(Button::Select, 1, active),
            (State::Receiving, Action::Send)
        );
        assert_eq!(at(0).on_press(Button::Prev, 4, active).0, at(85));
    }

    #[test]
    fn test_scrolling() {
        let active = baud(9600);
        assert_eq!(
            State::Scrolling.on_press(Button::Prev, 4, active),
            (State::Scrolling, Action::Scroll(-1))
        );
        assert_eq!(
            State::Scrolling.on_press(Button::Next, 1, active),
            (State::Scrolling, Action::Scroll(1))
        );
        assert_eq!(
            State::Scrolling.on_press(Button::Select, 1, active),
            (State::Receiving, Action::EndScroll)
        );
    }

    #[test]
    fn test_error_from_any_state() {
        let states = [
            State::Receiving,
            State::BaudPicker { cursor: 2 },
            State::CharacterEntry { cursor: 40 },
            State::Scrolling,
        ];

        for state in states {
            let next = state.on_error(ErrorKind::MalformedRequest, 100);
            assert_eq!(
                next,
                State::ErrorOverlay {
                    kind: ErrorKind::MalformedRequest,
                    resume: state.mode(),
                    since_ms: 100,
                }
            );
            assert_eq!(next.on_tick(5100, 5000), state);
        }
    }

    #[test]
    fn test_nested_error_keeps_resume() {
        let first = State::Scrolling.on_error(ErrorKind::TransportUnavailable, 0);
        let second = first.on_error(ErrorKind::UnknownCommand, 3000);
        assert_eq!(
            second,
            State::ErrorOverlay {
                kind: ErrorKind::UnknownCommand,
                resume: Mode::Scrolling,
                since_ms: 3000,
            }
        );
        assert!(second.on_tick(5000, 5000).is_error());
        assert_eq!(second.on_tick(8000, 5000), State::Scrolling);
    }

    #[test]
    fn test_overlay_ignores_buttons() {
        let overlay = State::Receiving.on_error(ErrorKind::MalformedRequest, 0);
        for button in [Button::Prev, Button::Select, Button::Next] {
            assert_eq!(
                overlay.on_press(button, 1, baud(9600)),
                (overlay, Action::None)
            );
        }
    }
}
