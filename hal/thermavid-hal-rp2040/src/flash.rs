//! Camera parameters on the RP2350 flash
//!
//! A sequential-storage map in the top 64 KB of flash, one item per
//! [`StorageKey`].

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use embedded_storage_async::nor_flash::NorFlash;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

pub use thermavid_hal::flash::{FlashError, StorageKey};

/// 4MB flash on the Pico 2
pub const FLASH_SIZE: usize = 4 * 1024 * 1024;
pub const PARAM_PARTITION_SIZE: usize = 64 * 1024;
pub const PARAM_PARTITION_START: usize = FLASH_SIZE - PARAM_PARTITION_SIZE;

/// Flash range for the parameter partition
pub const PARAM_RANGE: core::ops::Range<u32> = (PARAM_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Scratch size for one map item (key, header and a small value)
const ITEM_BUFFER_SIZE: usize = 64;

/// The on-board flash in async DMA mode
pub type BoardFlash<'d> = Flash<'d, FLASH, Async, FLASH_SIZE>;

/// Parameter storage on a NOR flash
///
/// Defaults to the on-board flash; any async `NorFlash` with the
/// partition in range works.
pub struct RpFlashStorage<F = BoardFlash<'static>> {
    flash: F,
}

impl<'d> RpFlashStorage<BoardFlash<'d>> {
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self::from_flash(Flash::new(flash, dma))
    }
}

impl<F: NorFlash> RpFlashStorage<F> {
    pub fn from_flash(flash: F) -> Self {
        Self { flash }
    }

    async fn fetch<'b>(&mut self, key: StorageKey, scratch: &'b mut [u8]) -> Result<Option<&'b [u8]>, FlashError> {
        map::fetch_item::<StorageKey, &[u8], _>(&mut self.flash, PARAM_RANGE, &mut NoCache::new(), scratch, &key)
            .await
            .map_err(storage_error)
    }
}

fn storage_error<E>(e: sequential_storage::Error<E>) -> FlashError {
    match e {
        sequential_storage::Error::Storage { .. } => FlashError::Flash,
        sequential_storage::Error::FullStorage { .. } => FlashError::Full,
        sequential_storage::Error::Corrupted { .. } => FlashError::Corrupted,
        _ => FlashError::Storage,
    }
}

impl<F: NorFlash> thermavid_hal::FlashStorage for RpFlashStorage<F> {
    async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let mut scratch = [0u8; ITEM_BUFFER_SIZE];
        let data = self.fetch(key, &mut scratch).await?.ok_or(FlashError::NotFound)?;
        if buffer.len() < data.len() {
            return Err(FlashError::BufferTooSmall);
        }
        buffer[..data.len()].copy_from_slice(data);
        Ok(data.len())
    }

    async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        let mut scratch = [0u8; ITEM_BUFFER_SIZE];
        map::store_item(
            &mut self.flash,
            PARAM_RANGE,
            &mut NoCache::new(),
            &mut scratch,
            &key,
            &data,
        )
        .await
        .map_err(storage_error)
    }
}
