//! Parameter flash
//!
//! The camera persists four small user settings. Each one lives under its
//! own key so a single edit rewrites a few bytes, not a whole config blob.

/// Key of one persisted camera parameter
///
/// The discriminant is the on-flash key byte. Renumbering a key orphans
/// the value stored under it, so new parameters take the next free byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// Palette polarity and extrema marker selector (menu slot 0)
    PaletteMarker = 0,
    /// Scene emissivity, percent
    Emissivity = 1,
    /// Temperature units, 0 imperial / 1 metric
    Units = 2,
    /// Upscale strategy, 0 duplicate / 1 interpolate
    Interpolation = 3,
}

impl StorageKey {
    /// Every key, in menu order
    pub const ALL: [StorageKey; 4] = [
        StorageKey::PaletteMarker,
        StorageKey::Emissivity,
        StorageKey::Units,
        StorageKey::Interpolation,
    ];

    /// On-flash key byte
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Key for an on-flash key byte, if it names a parameter
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }
}

/// Parameter flash failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// The device itself failed; nothing stored can be trusted
    Flash,
    /// The wear-levelling layer rejected the operation
    Storage,
    /// No value stored under this key yet (first boot)
    NotFound,
    /// Stored value longer than the caller's buffer
    BufferTooSmall,
    /// Stored item failed its integrity check
    Corrupted,
    /// Partition full and could not be compacted
    Full,
}

/// Wear-levelled key/value store for camera parameters
///
/// Values are a handful of bytes. A write either lands completely or
/// leaves the previous value readable.
pub trait FlashStorage {
    /// Copy the value stored under `key` into `buffer`, returning its length
    fn read(
        &mut self,
        key: StorageKey,
        buffer: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, FlashError>>;

    /// Replace the value stored under `key`
    fn write(
        &mut self,
        key: StorageKey,
        data: &[u8],
    ) -> impl core::future::Future<Output = Result<(), FlashError>>;
}

#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for StorageKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        let slot = buffer
            .first_mut()
            .ok_or(sequential_storage::map::SerializationError::BufferTooSmall)?;
        *slot = self.as_u8();
        Ok(1)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        let byte = buffer
            .first()
            .ok_or(sequential_storage::map::SerializationError::BufferTooSmall)?;
        StorageKey::from_u8(*byte)
            .map(|key| (key, 1))
            .ok_or(sequential_storage::map::SerializationError::InvalidFormat)
    }
}
