//! Outbound notifications for web and broker subscribers

use alloc::string::String;
use serde::Serialize;

/// Whether a log message carries the whole history or one new line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    /// Complete history, sent once to a newly connected subscriber
    Full,
    /// A single freshly appended line
    Increment,
}

/// Direction a logged line travelled on the serial wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Assembled from bytes received on the line
    Received,
    /// Transmitted by the bridge
    Sent,
}

/// Message pushed to every subscriber
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Notification<'a> {
    /// Ring log content changed
    Log {
        mode: LogMode,
        text: &'a str,
        origin: Origin,
    },
    /// Active baud rate, also sent as acknowledgement of a setBaud request
    Baud { value: u32 },
    /// Reply to a sender whose request was rejected
    Error { message: &'a str },
}

impl Notification<'_> {
    /// Serialize to a JSON document
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
