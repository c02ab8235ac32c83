//! Error kinds surfaced to the operator

use linetap_hal::FlashError;
use linetap_protocol::CommandError;

use crate::settings::SettingsError;

/// Recoverable fault shown on the error overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// Stored settings were unreadable or could not be written
    StorageIntegrityFailure,
    /// Request was not valid JSON or had bad fields
    MalformedRequest,
    /// A network transport lost its connection
    TransportUnavailable,
    /// Request named a command that does not exist
    UnknownCommand,
}

impl ErrorKind {
    /// Overlay text, fits one display row
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::StorageIntegrityFailure => "Settings store failed",
            ErrorKind::MalformedRequest => "Malformed request",
            ErrorKind::TransportUnavailable => "Transport offline",
            ErrorKind::UnknownCommand => "Unknown command",
        }
    }
}

/// Error returned by bridge operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeError {
    /// Persisting settings failed
    Storage(FlashError),
    /// Stored settings rejected
    Settings(SettingsError),
    /// Inbound request rejected
    Command(CommandError),
    /// Baud rate outside the selectable list
    InvalidBaudRate(u32),
    /// Serial transmit failed
    Uart,
}

impl BridgeError {
    /// Overlay category for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::Storage(_) | BridgeError::Settings(_) => {
                ErrorKind::StorageIntegrityFailure
            }
            BridgeError::Command(CommandError::Unknown) => ErrorKind::UnknownCommand,
            BridgeError::Command(CommandError::Malformed) | BridgeError::InvalidBaudRate(_) => {
                ErrorKind::MalformedRequest
            }
            BridgeError::Uart => ErrorKind::TransportUnavailable,
        }
    }
}

impl From<FlashError> for BridgeError {
    fn from(e: FlashError) -> Self {
        BridgeError::Storage(e)
    }
}

impl From<SettingsError> for BridgeError {
    fn from(e: SettingsError) -> Self {
        BridgeError::Settings(e)
    }
}

impl From<CommandError> for BridgeError {
    fn from(e: CommandError) -> Self {
        BridgeError::Command(e)
    }
}
