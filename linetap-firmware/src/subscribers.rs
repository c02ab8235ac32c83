//! Bridge subscribers for the network links
//!
//! Notifications are serialized here and queued for the companion task.
//! A link that is down gets nothing; it receives a full replay when it
//! comes back. A link that missed a log update because the queue was full
//! gets a full replay once there is room.

use defmt::*;

use linetap_core::notify::{LogEvent, Subscriber};
use linetap_core::ErrorKind;
use linetap_protocol::{LinkId, Notification};

use crate::channels::{is_link_up, with_resync, Outbound, OUTBOUND_CHANNEL};

/// Queues notifications for one network link
pub struct LinkSubscriber {
    link: LinkId,
}

impl LinkSubscriber {
    pub const fn new(link: LinkId) -> Self {
        Self { link }
    }

    fn publish(&self, notification: &Notification<'_>) {
        if is_link_up(self.link) {
            send_to(self.link, notification);
        }
    }
}

impl Subscriber for LinkSubscriber {
    fn on_log_event(&mut self, event: &LogEvent<'_>) {
        let link = self.link;
        if !is_link_up(link) || !with_resync(link, |r| r.admits(event.mode)) {
            return;
        }

        let delivered = send_to(
            link,
            &Notification::Log {
                mode: event.mode,
                text: event.text,
                origin: event.origin,
            },
        );
        with_resync(link, |r| r.record(event.mode, delivered));
    }

    fn on_baud_change(&mut self, baud: u32) {
        self.publish(&Notification::Baud { value: baud });
    }

    fn on_error(&mut self, kind: ErrorKind) {
        // Broker clients have no screen; web clients only hear about
        // errors in their own requests
        if self.link == LinkId::Broker {
            self.publish(&Notification::Error {
                message: kind.message(),
            });
        }
    }
}

/// Tell the sender of a failed request what went wrong
pub fn reply_error(link: LinkId, kind: ErrorKind) {
    send_to(
        link,
        &Notification::Error {
            message: kind.message(),
        },
    );
}

/// Queue a notification, returning whether it was queued
fn send_to(link: LinkId, notification: &Notification<'_>) -> bool {
    let text = match notification.to_json() {
        Ok(text) => text,
        Err(_) => {
            warn!("Failed to serialize notification for {}", link);
            return false;
        }
    };

    if OUTBOUND_CHANNEL
        .try_send(Outbound::Json { link, text })
        .is_err()
    {
        warn!("Outbound queue full, dropping message for {}", link);
        return false;
    }
    true
}
