//! Thermal sensor link

use core::future::Future;

use crate::fault::FaultCode;
use crate::frame::{RawFrame, StatusFlags};

/// Which side of the sensor link failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorErrorKind {
    /// Register/command channel
    Control,
    /// Image stream
    Stream,
}

impl SensorErrorKind {
    /// Fault code reported when this kind of failure escalates
    pub fn fault_code(self) -> FaultCode {
        match self {
            SensorErrorKind::Control => FaultCode::SensorControl,
            SensorErrorKind::Stream => FaultCode::SensorStream,
        }
    }
}

/// Sensor driver error
pub trait SensorError: core::fmt::Debug {
    fn kind(&self) -> SensorErrorKind;
}

impl SensorError for SensorErrorKind {
    fn kind(&self) -> SensorErrorKind {
        *self
    }
}

/// What the sensor reported about itself during initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorInfo {
    /// Sensor reports calibrated temperatures
    pub radiometric: bool,
}

/// Convert an emissivity percentage to the sensor's 1/8192 fixed-point scale
pub fn emissivity_to_sensor_scale(percent: u8) -> u16 {
    (percent.min(100) as u32 * 8192 / 100) as u16
}

/// Thermal sensor link
///
/// Covers the image stream and the control channel of one sensor. The
/// segment framing, CRC and register protocol live behind this trait.
pub trait SensorLink {
    type Error: SensorError;

    /// Configure the sensor (gain mode, telemetry, radiometry)
    fn initialize(&mut self) -> impl Future<Output = Result<SensorInfo, Self::Error>>;

    /// Wait for the frame-ready level, returning a microsecond timestamp
    ///
    /// Blocks with no timeout; liveness comes from the missed-frame count.
    fn wait_frame_ready(&mut self) -> impl Future<Output = u32>;

    /// Pull one image segment
    ///
    /// Returns `Ok(true)` when this segment completed a valid frame.
    fn transfer_segment(&mut self, timestamp_us: u32) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Copy the last completed frame and its telemetry into `frame`
    fn fetch_frame(&mut self, frame: &mut RawFrame);

    /// Set scene emissivity in percent
    ///
    /// Drivers write [`emissivity_to_sensor_scale`]`(percent)` to the
    /// sensor's radiometry control.
    fn set_emissivity(&mut self, percent: u8) -> impl Future<Output = Result<(), Self::Error>>;

    /// Read the current status word
    fn query_status_flags(&mut self) -> impl Future<Output = Result<StatusFlags, Self::Error>>;

    /// Drive the hardware reset line
    fn set_reset(&mut self, asserted: bool);
}
