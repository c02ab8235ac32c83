//! Broker link supervisor
//!
//! The companion opens the broker session on its own at boot. Once that
//! session drops, this task decides when to ask for a reconnect and, after
//! too many failures, resets the board.

use defmt::*;
use embassy_time::{with_timeout, Duration, Timer};

use linetap_core::transport::{ReconnectPolicy, Recovery};
use linetap_protocol::LinkId;

use crate::channels::{is_link_up, Outbound, BROKER_LINK, OUTBOUND_CHANNEL};

/// How long the companion gets to report a reconnect attempt's result
const CONNECT_TIMEOUT_MS: u64 = 10_000;

#[embassy_executor::task]
pub async fn broker_supervisor_task(reset_on_failure: bool, max_failures: u8) {
    info!("Broker supervisor started");

    let mut policy = ReconnectPolicy::with_max_failures(max_failures);
    wait_for(true).await;
    info!("Broker link established");

    loop {
        wait_for(false).await;
        warn!("Broker link lost");

        loop {
            match policy.on_failure() {
                Recovery::RetryAfter(delay_ms) => {
                    debug!(
                        "Broker reconnect attempt {} in {} ms",
                        policy.failures(),
                        delay_ms
                    );
                    Timer::after(Duration::from_millis(delay_ms as u64)).await;

                    if !is_link_up(LinkId::Broker) {
                        OUTBOUND_CHANNEL.send(Outbound::Connect(LinkId::Broker)).await;
                    }
                    let timeout = Duration::from_millis(CONNECT_TIMEOUT_MS);
                    if with_timeout(timeout, wait_for(true)).await.is_ok() {
                        info!("Broker link re-established");
                        policy.on_connected();
                        break;
                    }
                }
                Recovery::Reset => {
                    if reset_on_failure {
                        error!("Broker unreachable after {} attempts, resetting", policy.failures());
                        // Let the log drain
                        Timer::after(Duration::from_millis(100)).await;
                        cortex_m::peripheral::SCB::sys_reset();
                    }
                    warn!("Broker unreachable, starting over");
                    policy = ReconnectPolicy::with_max_failures(max_failures);
                }
            }
        }
    }
}

/// Wait until the broker link reports `up`
async fn wait_for(up: bool) {
    if is_link_up(LinkId::Broker) == up {
        return;
    }
    while BROKER_LINK.wait().await != up {}
}
