//! Persisted bridge settings
//!
//! The only persistent setting is the baud rate. It is stored as a fixed
//! 8-byte record:
//!
//! ```text
//! ┌──────────────┬──────────────┐
//! │ CRC32 (LE)   │ BAUD (LE)    │
//! │ 4B           │ 4B           │
//! └──────────────┴──────────────┘
//! ```
//!
//! The CRC covers everything after itself. A record that fails the check
//! or names a rate outside [`BAUD_RATES`] counts as absent.

use linetap_hal::FlashError;

use crate::error::ErrorKind;

/// Selectable baud rates, in picker order
pub const BAUD_RATES: [u32; 8] = [1200, 2400, 4800, 9600, 19200, 38400, 57600, 115200];

/// Rate used when no valid settings are stored
pub const DEFAULT_BAUD_RATE: u32 = 115200;

/// Size of the persisted record
pub const RECORD_LEN: usize = 8;

/// A baud rate known to be one of [`BAUD_RATES`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaudRate(u8);

impl BaudRate {
    /// Look up a rate by its value
    pub fn from_value(value: u32) -> Option<Self> {
        BAUD_RATES
            .iter()
            .position(|&rate| rate == value)
            .map(|index| Self(index as u8))
    }

    /// Look up a rate by its position in [`BAUD_RATES`]
    pub fn from_index(index: usize) -> Option<Self> {
        (index < BAUD_RATES.len()).then_some(Self(index as u8))
    }

    /// Bits per second
    pub fn value(self) -> u32 {
        BAUD_RATES[self.0 as usize]
    }

    /// Position in [`BAUD_RATES`]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for BaudRate {
    fn default() -> Self {
        // DEFAULT_BAUD_RATE is the last entry
        Self((BAUD_RATES.len() - 1) as u8)
    }
}

/// Settings owned by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    pub baud_rate: BaudRate,
}

/// Why a stored record was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Stored data is not [`RECORD_LEN`] bytes
    InvalidLength,
    /// CRC does not match the payload
    ChecksumMismatch,
    /// CRC matches but the rate is not selectable
    InvalidBaudRate,
}

/// Checksummed on-flash form of [`Settings`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsRecord([u8; RECORD_LEN]);

impl SettingsRecord {
    /// Encode settings, computing the checksum
    pub fn encode(settings: &Settings) -> Self {
        let mut bytes = [0u8; RECORD_LEN];
        bytes[4..].copy_from_slice(&settings.baud_rate.value().to_le_bytes());
        let crc = crc32(&bytes[4..]);
        bytes[..4].copy_from_slice(&crc.to_le_bytes());
        Self(bytes)
    }

    /// Wrap raw bytes read back from storage
    pub fn from_bytes(data: &[u8]) -> Result<Self, SettingsError> {
        let bytes: [u8; RECORD_LEN] = data.try_into().map_err(|_| SettingsError::InvalidLength)?;
        Ok(Self(bytes))
    }

    /// Check the stored CRC against the payload
    pub fn verify(&self) -> bool {
        self.stored_crc() == crc32(&self.0[4..])
    }

    /// Validate and decode
    pub fn decode(&self) -> Result<Settings, SettingsError> {
        if !self.verify() {
            return Err(SettingsError::ChecksumMismatch);
        }
        let value = u32::from_le_bytes([self.0[4], self.0[5], self.0[6], self.0[7]]);
        let baud_rate = BaudRate::from_value(value).ok_or(SettingsError::InvalidBaudRate)?;
        Ok(Settings { baud_rate })
    }

    pub fn as_bytes(&self) -> &[u8; RECORD_LEN] {
        &self.0
    }

    fn stored_crc(&self) -> u32 {
        u32::from_le_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }
}

/// Result of interpreting whatever storage returned at boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoadOutcome {
    /// Settings to run with
    pub settings: Settings,
    /// Storage must be rewritten with `settings`
    pub needs_save: bool,
    /// Error to surface to the operator, if any
    pub error: Option<ErrorKind>,
}

impl LoadOutcome {
    /// Decide boot settings from a storage read
    ///
    /// A missing record is a normal first boot; anything unreadable or
    /// corrupt falls back to the default and is reported.
    pub fn from_read(read: Result<&[u8], FlashError>) -> Self {
        let decoded = match read {
            Ok(data) => SettingsRecord::from_bytes(data).and_then(|record| record.decode()),
            Err(FlashError::NotFound) => {
                return Self {
                    settings: Settings::default(),
                    needs_save: true,
                    error: None,
                };
            }
            Err(_) => Err(SettingsError::ChecksumMismatch),
        };

        match decoded {
            Ok(settings) => Self {
                settings,
                needs_save: false,
                error: None,
            },
            Err(_) => Self {
                settings: Settings::default(),
                needs_save: true,
                error: Some(ErrorKind::StorageIntegrityFailure),
            },
        }
    }
}

/// Persistence used by the bridge when the baud rate changes
pub trait SettingsStore {
    /// Commit a record
    fn save(&mut self, record: &SettingsRecord) -> Result<(), FlashError>;
}

/// CRC-32 (IEEE 802.3, reflected)
pub fn crc32(data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB88320;
    let mut crc: u32 = 0xFFFFFFFF;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    !crc
}
