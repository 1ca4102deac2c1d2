//! Flash-backed parameter store
//!
//! Keeps a RAM copy of every parameter and writes through to flash on
//! change. Each value is stored under its own key as a postcard-encoded
//! `i32`. Missing or invalid entries are replaced by their defaults;
//! per-key failures are logged and the default is used instead.

use thermavid_hal::{FlashError, FlashStorage};

use super::{ParamId, ParameterSet};

/// Largest encoded value (postcard varint i32)
const MAX_VALUE_SIZE: usize = 5;

/// Parameter store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Flash operation failed
    Flash(FlashError),
    /// Stored bytes did not decode
    Deserialize,
    /// Value could not be encoded
    Serialize,
    /// Value outside the parameter's legal range
    OutOfRange(ParamId, i32),
}

impl From<FlashError> for StoreError {
    fn from(e: FlashError) -> Self {
        StoreError::Flash(e)
    }
}

impl StoreError {
    /// The storage device itself is unusable
    pub fn is_device_failure(&self) -> bool {
        matches!(self, StoreError::Flash(FlashError::Flash))
    }
}

/// Cached parameter store over a flash backend
pub struct ParameterStore<F: FlashStorage> {
    flash: F,
    cache: ParameterSet,
}

impl<F: FlashStorage> ParameterStore<F> {
    /// Load every parameter, creating defaults on first run
    ///
    /// Fails only when the flash device is unusable.
    pub async fn open(flash: F) -> Result<Self, StoreError> {
        let mut store = Self {
            flash,
            cache: ParameterSet::default(),
        };

        for id in ParamId::ALL {
            match store.load(id).await {
                Ok(value) if id.range().contains(&value) => {
                    debug!("Loaded {:?} = {}", id, value);
                    store.cache.set(id, value);
                }
                Ok(value) => {
                    warn!("Stored {:?} = {} out of range, resetting", id, value);
                    store.write_default(id).await;
                }
                Err(StoreError::Flash(FlashError::NotFound)) => {
                    info!("Creating default for {:?}", id);
                    store.write_default(id).await;
                }
                Err(e) if e.is_device_failure() => {
                    error!("Parameter storage unavailable");
                    return Err(e);
                }
                Err(e) => {
                    warn!("Failed to load {:?}: {:?}, using default", id, e);
                    store.write_default(id).await;
                }
            }
        }

        Ok(store)
    }

    /// Cached value of `id`
    pub fn get(&self, id: ParamId) -> i32 {
        self.cache.get(id)
    }

    /// Snapshot of every cached value
    pub fn snapshot(&self) -> ParameterSet {
        self.cache
    }

    /// Update `id` and write it through to flash
    ///
    /// The cached value changes even if the flash write fails, so the
    /// running camera keeps the user's choice until power-off.
    pub async fn set(&mut self, id: ParamId, value: i32) -> Result<(), StoreError> {
        if !id.range().contains(&value) {
            return Err(StoreError::OutOfRange(id, value));
        }
        if self.cache.get(id) == value {
            return Ok(());
        }

        self.cache.set(id, value);
        self.save(id, value).await?;
        info!("Saved {:?} = {}", id, value);
        Ok(())
    }

    /// Release the backend (for re-opening over the same storage)
    pub fn into_inner(self) -> F {
        self.flash
    }

    async fn load(&mut self, id: ParamId) -> Result<i32, StoreError> {
        let mut buffer = [0u8; MAX_VALUE_SIZE];
        let len = self.flash.read(id.key(), &mut buffer).await?;
        postcard::from_bytes(&buffer[..len]).map_err(|_| StoreError::Deserialize)
    }

    async fn save(&mut self, id: ParamId, value: i32) -> Result<(), StoreError> {
        let mut buffer = [0u8; MAX_VALUE_SIZE];
        let bytes = postcard::to_slice(&value, &mut buffer).map_err(|_| StoreError::Serialize)?;
        self.flash.write(id.key(), bytes).await?;
        Ok(())
    }

    async fn write_default(&mut self, id: ParamId) {
        let value = id.default_value();
        self.cache.set(id, value);
        if let Err(e) = self.save(id, value).await {
            warn!("Failed to store default for {:?}: {:?}", id, e);
        }
    }
}
