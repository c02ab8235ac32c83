//! Companion UART receive task
//!
//! Parses link frames from the companion, tracks which links are up and
//! forwards complete requests to the bridge task.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;
use heapless::Vec;

use linetap_protocol::{Frame, FrameParser, LinkError, LinkId, LinkMessage, Reassembler};

use crate::channels::{set_link_up, Inbound, BROKER_LINK, INBOUND_CHANNEL, REQUEST_CAPACITY};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

#[embassy_executor::task]
pub async fn companion_rx_task(mut rx: BufferedUartRx) {
    info!("Companion RX task started");

    let mut parser = FrameParser::new();
    let mut reassembler = Reassembler::<REQUEST_CAPACITY>::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) => {
                trace!("Companion RX: {} bytes", n);
                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => handle_frame(&frame, &mut reassembler).await,
                        Ok(None) => {}
                        Err(e) => warn!("Companion frame error: {:?}", e),
                    }
                }
            }
            Err(e) => {
                warn!("Companion read error: {:?}", e);
            }
        }
    }
}

async fn handle_frame(frame: &Frame, reassembler: &mut Reassembler<REQUEST_CAPACITY>) {
    match LinkMessage::from_frame(frame) {
        Ok(LinkMessage::Up(link)) => {
            link_changed(link, true, reassembler);
            INBOUND_CHANNEL.send(Inbound::Connected(link)).await;
        }
        Ok(LinkMessage::Down(link)) => {
            link_changed(link, false, reassembler);
            INBOUND_CHANNEL.send(Inbound::Disconnected(link)).await;
        }
        Ok(LinkMessage::Data { link, last, chunk }) => {
            let inbound = match reassembler.push(link, last, chunk) {
                Ok(None) => return,
                Ok(Some(document)) => match Vec::from_slice(document) {
                    Ok(payload) => Inbound::Request {
                        from: link,
                        payload,
                    },
                    Err(_) => Inbound::Oversized(link),
                },
                Err(LinkError::Overflow) => Inbound::Oversized(link),
                Err(e) => {
                    warn!("Dropping {} request: {:?}", link, e);
                    return;
                }
            };
            INBOUND_CHANNEL.send(inbound).await;
        }
        Ok(LinkMessage::Connect(link)) => {
            warn!("Unexpected connect request for {} from companion", link);
        }
        Err(e) => {
            warn!("Ignoring companion frame: {:?}", e);
        }
    }
}

fn link_changed<const N: usize>(link: LinkId, up: bool, reassembler: &mut Reassembler<N>) {
    set_link_up(link, up);
    reassembler.reset(link);
    if link == LinkId::Broker {
        BROKER_LINK.signal(up);
    }
}
