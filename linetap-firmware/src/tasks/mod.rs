//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod bridge;
pub mod broker;
pub mod buttons;
pub mod companion_rx;
pub mod companion_tx;
pub mod settings;

pub use bridge::bridge_task;
pub use broker::broker_supervisor_task;
pub use buttons::button_task;
pub use companion_rx::companion_rx_task;
pub use companion_tx::companion_tx_task;
pub use settings::settings_task;

use embassy_time::Instant;

/// Milliseconds since boot, wrapping
pub fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}
