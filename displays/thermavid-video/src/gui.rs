//! Per-frame display state

use thermavid_core::frame::Telemetry;
use thermavid_core::params::ParameterSet;

/// What the compositor draws for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GuiState {
    /// Invert the image (hot is dark)
    pub black_hot: bool,
    /// Draw min/max markers
    pub min_max_enable: bool,
    /// Draw the spotmeter box and reading
    pub spotmeter_enable: bool,
    /// Weighted upscale instead of pixel duplication
    pub interpolate: bool,
    /// Show Celsius instead of Fahrenheit
    pub metric: bool,
    /// Samples are already 8-bit sensor AGC output
    pub agc_enabled: bool,
    /// Sensor reports calibrated temperatures
    pub radiometric: bool,
    /// Telemetry temperatures are 0.01 K per count
    pub high_res: bool,
}

impl GuiState {
    /// Combine the current parameter values with this frame's telemetry
    pub fn derive(params: &ParameterSet, telemetry: &Telemetry) -> Self {
        Self {
            black_hot: params.black_hot(),
            min_max_enable: params.markers_enabled(),
            spotmeter_enable: params.markers_enabled(),
            interpolate: params.interpolate(),
            metric: params.metric(),
            agc_enabled: telemetry.agc_enabled(),
            radiometric: telemetry.radiometric,
            high_res: telemetry.tlinear_high_res,
        }
    }

    /// Spotmeter applies only when the sensor can measure temperature
    pub fn show_spotmeter(&self) -> bool {
        self.spotmeter_enable && self.radiometric
    }
}
