//! Three-button interaction model
//!
//! The machine is explicit and finite. [`State::on_press`] and friends are
//! pure; [`Interaction`] adds timing (fast clicks, overlay expiry) and
//! hands the resulting [`Action`] to the bridge to carry out.

pub mod clicks;
pub mod events;
pub mod interaction;
pub mod machine;

pub use clicks::FastClick;
pub use events::{Button, ButtonEvent};
pub use interaction::Interaction;
pub use machine::{Action, Mode, State};
