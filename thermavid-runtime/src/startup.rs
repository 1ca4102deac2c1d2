//! Bring-up sequence and irrecoverable failures
//!
//! Frame and display buffers are placed in statics and handed out exactly
//! once. A second allocation, an unusable parameter store or a failed
//! peripheral are startup failures: they are reported as a fault code and
//! the failing loop stops making progress while the control loop keeps
//! blinking the code.

use static_cell::ConstStaticCell;

use thermavid_core::control::Notification;
use thermavid_core::frame::{FrameConsumer, FrameProducer, RawFrame};
use thermavid_core::params::ParameterStore;
use thermavid_core::FaultCode;
use thermavid_hal::FlashStorage;
use thermavid_video::{Compositor, DisplayFrame};

use crate::channels::Channels;

static RAW_FRAMES: ConstStaticCell<[RawFrame; 2]> = ConstStaticCell::new([RawFrame::new(), RawFrame::new()]);
static DISPLAY_FRAMES: ConstStaticCell<[DisplayFrame; 2]> =
    ConstStaticCell::new([DisplayFrame::new(), DisplayFrame::new()]);
static COMPOSITOR: ConstStaticCell<Compositor> = ConstStaticCell::new(Compositor::new());

/// Irrecoverable bring-up failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartupError {
    /// Bus controller (SPI/I2C) failed to initialize
    Bus,
    /// Peripheral or storage failed to initialize
    Peripheral,
    /// Buffers could not be allocated
    Memory,
}

impl StartupError {
    pub fn fault_code(self) -> FaultCode {
        match self {
            StartupError::Bus => FaultCode::BusInit,
            StartupError::Peripheral => FaultCode::PeripheralInit,
            StartupError::Memory => FaultCode::MemoryInit,
        }
    }
}

/// Buffers owned by the render loop
pub struct RenderBuffers {
    /// Render end of the raw frame exchange
    pub consumer: FrameConsumer,
    /// Composited output frames, indexed by raw frame slot
    pub display: &'static mut [DisplayFrame; 2],
    pub compositor: &'static mut Compositor,
}

/// Buffers owned by the running pipeline
pub struct Resources {
    /// Acquisition end of the raw frame exchange
    pub producer: FrameProducer,
    pub render: RenderBuffers,
}

impl Resources {
    /// Take the static buffers and wire the frame exchange
    ///
    /// Succeeds once per boot; later calls fail with [`StartupError::Memory`].
    pub fn allocate(channels: &'static Channels) -> Result<Self, StartupError> {
        let raw = RAW_FRAMES.try_take().ok_or(StartupError::Memory)?;
        let display = DISPLAY_FRAMES.try_take().ok_or(StartupError::Memory)?;
        let compositor = COMPOSITOR.try_take().ok_or(StartupError::Memory)?;
        Ok(Self::from_buffers(channels, raw, display, compositor))
    }

    /// Wire caller-provided buffers
    pub fn from_buffers(
        channels: &'static Channels,
        raw: &'static mut [RawFrame; 2],
        display: &'static mut [DisplayFrame; 2],
        compositor: &'static mut Compositor,
    ) -> Self {
        let (producer, consumer) = channels.frames.split(raw);
        Self {
            producer,
            render: RenderBuffers {
                consumer,
                display,
                compositor,
            },
        }
    }
}

/// Open the parameter store, creating defaults on first run
pub async fn open_store<F: FlashStorage>(flash: F) -> Result<ParameterStore<F>, StartupError> {
    ParameterStore::open(flash).await.map_err(|e| {
        error!("Parameter store unavailable: {:?}", e);
        StartupError::Peripheral
    })
}

/// Allocate buffers and open the store, then report startup complete
pub async fn bring_up<F: FlashStorage>(
    channels: &'static Channels,
    flash: F,
) -> Result<(Resources, ParameterStore<F>), StartupError> {
    let resources = Resources::allocate(channels)?;
    let store = open_store(flash).await?;

    info!("Startup complete");
    channels.notify(Notification::StartupComplete);
    Ok((resources, store))
}

/// Report a startup failure and stop forward progress
pub async fn halt(channels: &Channels, error: StartupError) -> ! {
    error!("Startup failed: {:?}", error);
    channels.notify(Notification::FaultRaised(error.fault_code()));
    loop {
        core::future::pending::<()>().await;
    }
}
