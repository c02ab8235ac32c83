//! Front-panel button tasks, one per button

use defmt::*;

use linetap_core::state::{Button, ButtonEvent};
use linetap_hal_rp2040::Button as PanelButton;

use super::now_ms;
use crate::channels::BUTTON_CHANNEL;

#[embassy_executor::task(pool_size = 3)]
pub async fn button_task(mut input: PanelButton<'static>, button: Button) {
    info!("{:?} button task started", button);

    loop {
        input.wait_for_press().await;
        let at_ms = now_ms();
        debug!("{:?} pressed at {} ms", button, at_ms);
        BUTTON_CHANNEL.send(ButtonEvent { button, at_ms }).await;

        // One event per press, however long it is held
        input.wait_for_release().await;
    }
}
