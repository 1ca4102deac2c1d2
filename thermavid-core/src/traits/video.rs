//! Analog video generator

use core::future::Future;

/// Broadcast standard of the composite output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VideoStandard {
    Ntsc,
    Pal,
}

impl VideoStandard {
    /// Decode the format-select strap: high selects NTSC, low PAL
    pub fn from_sense(high: bool) -> Self {
        if high {
            VideoStandard::Ntsc
        } else {
            VideoStandard::Pal
        }
    }
}

/// Frame buffer pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    /// One byte per pixel, 0 black to 255 white
    Gray8,
}

impl PixelFormat {
    /// Frame buffer bytes for one pixel
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
        }
    }
}

/// Video generator that scans out a frame buffer
pub trait VideoOutput {
    type Error: core::fmt::Debug;

    /// Start scan-out
    fn initialize(
        &mut self,
        width: u16,
        height: u16,
        format: PixelFormat,
        standard: VideoStandard,
    ) -> Result<(), Self::Error>;

    /// The buffer being scanned out
    fn frame_buffer(&mut self) -> &mut [u8];

    /// Wait for the start of vertical blanking
    fn wait_vsync(&mut self) -> impl Future<Output = ()>;
}
