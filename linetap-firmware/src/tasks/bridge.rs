//! Bridge task
//!
//! Sole owner of the [`Bridge`]. Serial bytes, button presses, link
//! traffic and the tick are multiplexed here; every other task reaches the
//! bridge through a channel.

use defmt::*;
use embassy_futures::select::{select4, Either4};
use embassy_rp::uart::BufferedUartRx;
use embassy_time::{Duration, Timer};
use embedded_io_async::Read;

use linetap_core::notify::{Fanout, Subscriber};
use linetap_core::render::draw_splash;
use linetap_core::state::Action;
use linetap_core::{Bridge, BridgeConfig, ErrorKind, LoadOutcome, SettingsStore};
use linetap_hal::SerialLine;
use linetap_hal_rp2040::BridgeUartTx;
use linetap_protocol::LinkId;

use super::now_ms;
use super::settings::QueuedStore;
use crate::channels::{
    is_link_up, outbound_free, with_resync, Inbound, BUTTON_CHANNEL, INBOUND_CHANNEL, SCREEN_BUFFER,
    SCREEN_UPDATE, STORAGE_FAULT,
};
use crate::subscribers::{reply_error, LinkSubscriber};

/// Serial bytes read per wakeup
const RX_CHUNK: usize = 64;

/// Upper bound on time between idle/overlay/redraw checks
const TICK_MS: u64 = 20;

/// How long the boot splash stays up
const SPLASH_MS: u64 = 1_000;

/// Queue slots a replay needs: the full log and the baud rate
const REPLAY_MESSAGES: usize = 2;

#[embassy_executor::task]
pub async fn bridge_task(
    mut rx: BufferedUartRx,
    tx: BridgeUartTx,
    outcome: LoadOutcome,
    config: BridgeConfig,
) {
    info!("Bridge task started");

    show_splash(outcome.settings.baud_rate.value()).await;

    let mut web = LinkSubscriber::new(LinkId::Web);
    let mut broker = LinkSubscriber::new(LinkId::Broker);
    let mut subscribers: [&mut dyn Subscriber; 2] = [&mut web, &mut broker];

    let mut bridge = Bridge::boot(
        tx,
        QueuedStore,
        Fanout::new(&mut subscribers),
        outcome,
        &config,
        now_ms(),
    );

    let mut buf = [0u8; RX_CHUNK];

    loop {
        let event = select4(
            rx.read(&mut buf),
            BUTTON_CHANNEL.receive(),
            INBOUND_CHANNEL.receive(),
            Timer::after(Duration::from_millis(TICK_MS)),
        )
        .await;
        let now = now_ms();

        match event {
            Either4::First(Ok(n)) => {
                trace!("Serial RX: {} bytes", n);
                bridge.feed_serial(&buf[..n], now);
            }
            Either4::First(Err(e)) => {
                warn!("Serial read error: {:?}", e);
            }
            Either4::Second(press) => {
                let action = bridge.press(press.button, press.at_ms);
                debug!("{:?} -> {:?} ({:?})", press.button, action, bridge.state());
                if let Action::CommitBaud(rate) = action {
                    info!("Baud rate set to {} from the panel", rate.value());
                }
            }
            Either4::Third(inbound) => {
                handle_inbound(&mut bridge, inbound, now);
            }
            Either4::Fourth(()) => {}
        }

        if STORAGE_FAULT.signaled() {
            STORAGE_FAULT.reset();
            bridge.raise_error(ErrorKind::StorageIntegrityFailure, now);
        }

        bridge.poll(now);
        resync_links(&bridge);

        if bridge.take_redraw(now) {
            {
                let mut screen = SCREEN_BUFFER.lock().await;
                bridge.render(&mut screen);
            }
            SCREEN_UPDATE.signal(());
        }
    }
}

async fn show_splash(baud: u32) {
    {
        let mut screen = SCREEN_BUFFER.lock().await;
        draw_splash(&mut screen, baud);
    }
    SCREEN_UPDATE.signal(());
    Timer::after(Duration::from_millis(SPLASH_MS)).await;
}

/// Replay the log to links that missed an update, once the queue has room
fn resync_links<U, St, S>(bridge: &Bridge<U, St, S>)
where
    U: SerialLine,
    St: SettingsStore,
    S: Subscriber,
{
    for link in LinkId::ALL {
        if is_link_up(link)
            && with_resync(link, |r| r.is_stale())
            && outbound_free() >= REPLAY_MESSAGES
        {
            debug!("Resending full log to {}", link);
            bridge.replay(&mut LinkSubscriber::new(link));
        }
    }
}

fn handle_inbound<U, St, S>(bridge: &mut Bridge<U, St, S>, inbound: Inbound, now: u32)
where
    U: SerialLine,
    St: SettingsStore,
    S: Subscriber,
{
    match inbound {
        Inbound::Connected(link) => {
            info!("{} link up, replaying {} lines", link, bridge.log().history_len());
            bridge.replay(&mut LinkSubscriber::new(link));
        }
        Inbound::Disconnected(link) => {
            warn!("{} link down", link);
            if link == LinkId::Broker {
                bridge.raise_error(ErrorKind::TransportUnavailable, now);
            }
        }
        Inbound::Request { from, payload } => {
            let settings = bridge.settings();
            match bridge.handle_request(&payload, now) {
                Ok(()) => {
                    if bridge.settings() != settings {
                        info!("Baud rate set to {} by {}", bridge.settings().baud_rate.value(), from);
                    }
                }
                Err(e) => {
                    warn!("Request from {} rejected: {:?}", from, e);
                    if from != LinkId::Broker {
                        reply_error(from, e.kind());
                    }
                }
            }
        }
        Inbound::Oversized(from) => {
            warn!("Oversized request from {}", from);
            bridge.raise_error(ErrorKind::MalformedRequest, now);
            if from != LinkId::Broker {
                reply_error(from, ErrorKind::MalformedRequest);
            }
        }
    }
}
