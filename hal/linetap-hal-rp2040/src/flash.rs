//! Settings partition on the RP2040's external flash
//!
//! The last 64 KiB of flash hold a sequential-storage map. Only the
//! settings record lives there today; the map format leaves room for more
//! keys without a migration.

use core::ops::Range;

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use sequential_storage::cache::NoCache;
use sequential_storage::{erase_all, map, Error};

pub use linetap_hal::flash::{FlashError, StorageKey};

/// Flash size on the Pico
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Size of the settings partition at the end of flash
pub const SETTINGS_PARTITION_SIZE: usize = 64 * 1024;

/// Flash range for the settings partition
pub const SETTINGS_RANGE: Range<u32> = ((FLASH_SIZE - SETTINGS_PARTITION_SIZE) as u32)..(FLASH_SIZE as u32);

/// Scratch space for one stored item (key, header and value)
const ITEM_BUFFER_SIZE: usize = 64;

type SettingsFlash<'d> = Flash<'d, FLASH, Async, FLASH_SIZE>;

/// `linetap_hal::FlashStorage` over the settings partition
pub struct Rp2040FlashStorage<'d> {
    flash: SettingsFlash<'d>,
    cache: NoCache,
    scratch: [u8; ITEM_BUFFER_SIZE],
}

impl<'d> Rp2040FlashStorage<'d> {
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
            cache: NoCache::new(),
            scratch: [0; ITEM_BUFFER_SIZE],
        }
    }
}

/// A damaged map is a storage problem the caller can fix by erasing; a
/// failed flash operation is not
fn classify<E>(error: Error<E>) -> FlashError {
    match error {
        Error::Storage { .. } => FlashError::Flash,
        _ => FlashError::Storage,
    }
}

impl linetap_hal::FlashStorage for Rp2040FlashStorage<'_> {
    async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let item = map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            SETTINGS_RANGE,
            &mut self.cache,
            &mut self.scratch,
            &key,
        )
        .await
        .map_err(classify)?
        .ok_or(FlashError::NotFound)?;

        let target = buffer
            .get_mut(..item.len())
            .ok_or(FlashError::BufferTooSmall)?;
        target.copy_from_slice(item);
        Ok(item.len())
    }

    async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        map::store_item(
            &mut self.flash,
            SETTINGS_RANGE,
            &mut self.cache,
            &mut self.scratch,
            &key,
            &data,
        )
        .await
        .map_err(classify)
    }

    async fn erase_all(&mut self) -> Result<(), FlashError> {
        erase_all(&mut self.flash, SETTINGS_RANGE)
            .await
            .map_err(|_| FlashError::Flash)
    }
}
