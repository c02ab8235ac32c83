//! Settings persistence task
//!
//! The bridge only queues the record; this task owns the flash and does
//! the slow write in the background.

use defmt::*;

use linetap_core::{SettingsRecord, SettingsStore};
use linetap_hal::{FlashError, FlashStorage, StorageKey};
use linetap_hal_rp2040::Rp2040FlashStorage;

use crate::channels::{SETTINGS_SAVE, STORAGE_FAULT};

/// Hands records to [`settings_task`]
///
/// Only the newest pending record is kept, so a burst of baud changes
/// costs one flash write.
pub struct QueuedStore;

impl SettingsStore for QueuedStore {
    fn save(&mut self, record: &SettingsRecord) -> Result<(), FlashError> {
        SETTINGS_SAVE.signal(*record);
        Ok(())
    }
}

#[embassy_executor::task]
pub async fn settings_task(mut storage: Rp2040FlashStorage<'static>) {
    info!("Settings task started");

    loop {
        let record = SETTINGS_SAVE.wait().await;
        debug!("Saving settings record {:?}", record.as_bytes());

        match save(&mut storage, &record).await {
            Ok(()) => {
                info!("Settings saved");
            }
            Err(e) => {
                error!("Failed to save settings: {:?}", e);
                STORAGE_FAULT.signal(());
            }
        }
    }
}

/// Write the record, wiping the partition once if it is unusable
async fn save<F: FlashStorage>(storage: &mut F, record: &SettingsRecord) -> Result<(), FlashError> {
    match storage.write(StorageKey::Settings, record.as_bytes()).await {
        Err(FlashError::Storage) => {
            warn!("Settings partition unusable, erasing");
            storage.erase_all().await?;
            storage.write(StorageKey::Settings, record.as_bytes()).await
        }
        result => result,
    }
}
