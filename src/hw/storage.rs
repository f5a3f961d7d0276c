//! Persistent user settings.
//!
//! Uses the nRF52840's internal flash via `sequential-storage` so the
//! sound toggle and brightness survive a power cycle. The record format
//! lives in `badge::settings`; this module only moves bytes.
//!
//! Storage layout:
//!   - One key-value map over `STORAGE_FLASH_PAGE_COUNT` pages.
//!   - Key `KEY_SETTINGS` holds the latest settings record; older records
//!     are garbage collected by `sequential-storage`.

use super::Error;
use badge::config::{STORAGE_FLASH_PAGE_COUNT, STORAGE_FLASH_PAGE_START};
use badge::settings::SETTINGS_RECORD_SIZE;
use badge::Settings;
use core::ops::Range;
use defmt::{error, info};
use embedded_storage_async::nor_flash::NorFlash;
use sequential_storage::cache::NoCache;
use sequential_storage::map::{fetch_item, store_item};

/// Flash page size for nRF52840 (4 KB).
const FLASH_PAGE_SIZE: u32 = 4096;

const STORAGE_RANGE: Range<u32> = STORAGE_FLASH_PAGE_START * FLASH_PAGE_SIZE
    ..(STORAGE_FLASH_PAGE_START + STORAGE_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE;

const KEY_SETTINGS: u8 = 0x01;

/// Scratch space for `sequential-storage`: key + record, word aligned.
const SCRATCH_SIZE: usize = 32;

/// Read the stored settings. Missing or unreadable records fall back to
/// defaults; a corrupt store is not worth refusing to boot over.
pub async fn load_settings(flash: &mut impl NorFlash) -> Settings {
    let mut buf = [0u8; SCRATCH_SIZE];

    match fetch_item::<u8, &[u8], _>(
        flash,
        STORAGE_RANGE,
        &mut NoCache::new(),
        &mut buf,
        &KEY_SETTINGS,
    )
    .await
    {
        Ok(Some(data)) => match Settings::deserialize(data) {
            Some(settings) => {
                info!("Loaded settings: {}", settings);
                settings
            }
            None => {
                info!("Stored settings have a foreign layout, using defaults");
                Settings::default()
            }
        },
        Ok(None) => {
            info!("No settings in flash, using defaults");
            Settings::default()
        }
        Err(e) => {
            error!("{}: {:?}", Error::Storage, defmt::Debug2Format(&e));
            Settings::default()
        }
    }
}

pub async fn save_settings(flash: &mut impl NorFlash, settings: &Settings) -> Result<(), Error> {
    let mut buf = [0u8; SCRATCH_SIZE];
    let mut record = [0u8; SETTINGS_RECORD_SIZE];
    let len = settings.serialize(&mut record);
    let item = &record[..len];

    store_item::<u8, &[u8], _>(
        flash,
        STORAGE_RANGE,
        &mut NoCache::new(),
        &mut buf,
        &KEY_SETTINGS,
        &item,
    )
    .await
    .map_err(|e| {
        error!("Flash write error: {:?}", defmt::Debug2Format(&e));
        Error::Storage
    })?;

    info!("Saved settings: {}", settings);
    Ok(())
}
