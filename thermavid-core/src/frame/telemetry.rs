//! Per-frame telemetry record

/// Minimum or maximum sample and where it was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Extremum {
    pub value: u16,
    pub x: u16,
    pub y: u16,
}

impl Extremum {
    pub const fn new(value: u16, x: u16, y: u16) -> Self {
        Self { value, x, y }
    }
}

/// Spot-measurement region in sensor coordinates (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpotRegion {
    pub x1: u16,
    pub y1: u16,
    pub x2: u16,
    pub y2: u16,
}

impl SpotRegion {
    pub const fn new(x1: u16, y1: u16, x2: u16, y2: u16) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Region width in sensor pixels
    pub fn width(&self) -> u16 {
        self.x2.saturating_sub(self.x1) + 1
    }

    /// Region height in sensor pixels
    pub fn height(&self) -> u16 {
        self.y2.saturating_sub(self.y1) + 1
    }

    /// Region centre, rounded down
    pub fn center(&self) -> (u16, u16) {
        ((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }
}

/// Decoded sensor status word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusFlags(u32);

impl StatusFlags {
    const FFC_DESIRED: u32 = 1 << 3;
    const FFC_STATE_SHIFT: u32 = 4;
    const FFC_STATE_MASK: u32 = 0b11;
    const FFC_STATE_IN_PROGRESS: u32 = 0b10;
    const AGC_STATE: u32 = 1 << 12;
    const SHUTTER_LOCKOUT: u32 = 1 << 15;
    const OVERTEMP_SHUTDOWN_IMMINENT: u32 = 1 << 20;

    /// Wrap a raw status word
    pub const fn from_word(word: u32) -> Self {
        Self(word)
    }

    /// Assemble the status word from its two 16-bit telemetry halves
    pub const fn from_halves(low: u16, high: u16) -> Self {
        Self(((high as u32) << 16) | low as u32)
    }

    pub fn word(&self) -> u32 {
        self.0
    }

    /// Sensor-side gain control is producing 8-bit output
    pub fn agc_enabled(&self) -> bool {
        self.0 & Self::AGC_STATE != 0
    }

    /// Sensor wants a flat-field correction
    pub fn ffc_desired(&self) -> bool {
        self.0 & Self::FFC_DESIRED != 0
    }

    /// Flat-field correction running (stream may stall)
    pub fn ffc_in_progress(&self) -> bool {
        (self.0 >> Self::FFC_STATE_SHIFT) & Self::FFC_STATE_MASK == Self::FFC_STATE_IN_PROGRESS
    }

    pub fn shutter_locked(&self) -> bool {
        self.0 & Self::SHUTTER_LOCKOUT != 0
    }

    pub fn overtemp_shutdown_imminent(&self) -> bool {
        self.0 & Self::OVERTEMP_SHUTDOWN_IMMINENT != 0
    }
}

/// Telemetry sent with each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Telemetry {
    /// Coldest sample
    pub min: Extremum,
    /// Hottest sample
    pub max: Extremum,
    /// Spot-measurement region
    pub spot: SpotRegion,
    /// Spot mean in fixed-point Kelvin (see `tlinear_high_res`)
    pub spot_mean: u16,
    /// Radiometric resolution: 0.01 K per count when set, 0.1 K otherwise
    pub tlinear_high_res: bool,
    /// Sensor reports calibrated temperatures
    pub radiometric: bool,
    /// Decoded status word
    pub status: StatusFlags,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl Telemetry {
    pub const fn new() -> Self {
        Self {
            min: Extremum::new(0, 0, 0),
            max: Extremum::new(0, 0, 0),
            spot: SpotRegion::new(0, 0, 0, 0),
            spot_mean: 0,
            tlinear_high_res: false,
            radiometric: false,
            status: StatusFlags::from_word(0),
        }
    }

    /// Shortcut for the AGC bit of the status word
    pub fn agc_enabled(&self) -> bool {
        self.status.agc_enabled()
    }
}
