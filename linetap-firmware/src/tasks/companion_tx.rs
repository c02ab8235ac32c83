//! Companion UART transmit task
//!
//! Sends screen updates and link traffic to the companion module.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use linetap_display::present;
use linetap_protocol::link::split;
use linetap_protocol::{Frame, FrameError, LinkId, LinkMessage};

use crate::channels::{Outbound, OUTBOUND_CHANNEL, SCREEN_BUFFER, SCREEN_UPDATE};
use crate::companion::FrameSink;

#[embassy_executor::task]
pub async fn companion_tx_task(mut tx: BufferedUartTx) {
    info!("Companion TX task started");

    loop {
        match select(SCREEN_UPDATE.wait(), OUTBOUND_CHANNEL.receive()).await {
            Either::First(()) => send_screen_update(&mut tx).await,
            Either::Second(Outbound::Json { link, text }) => {
                send_document(&mut tx, link, text.as_bytes()).await;
            }
            Either::Second(Outbound::Connect(link)) => {
                debug!("Asking companion to connect {}", link);
                send_frame(&mut tx, LinkMessage::Connect(link).to_frame()).await;
            }
        }
    }
}

/// Send current screen content to the display
async fn send_screen_update(tx: &mut BufferedUartTx) {
    let mut sink = FrameSink::new();
    {
        let screen = SCREEN_BUFFER.lock().await;
        if let Err(e) = present(&screen, &mut sink) {
            warn!("Failed to encode screen: {:?}", e);
            return;
        }
    }

    if let Err(e) = tx.write_all(sink.as_bytes()).await {
        warn!("Failed to send screen frames: {:?}", e);
    } else {
        trace!("Screen update sent ({} bytes)", sink.as_bytes().len());
    }
}

/// Send one JSON document as a run of LINK_DATA frames
async fn send_document(tx: &mut BufferedUartTx, link: LinkId, data: &[u8]) {
    trace!("{} <- {} bytes", link, data.len());
    for message in split(link, data) {
        if !send_frame(tx, message.to_frame()).await {
            break;
        }
    }
}

async fn send_frame(tx: &mut BufferedUartTx, frame: Result<Frame, FrameError>) -> bool {
    let bytes = match frame.and_then(|frame| frame.encode_to_vec()) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to encode link frame: {:?}", e);
            return false;
        }
    };

    match tx.write_all(&bytes).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to send link frame: {:?}", e);
            false
        }
    }
}
