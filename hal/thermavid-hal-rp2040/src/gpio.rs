//! GPIO wrappers

use embassy_rp::gpio::{Input, Level, Output, Pin, Pull};
use embassy_rp::Peri;

use thermavid_core::traits::VideoStandard;
use thermavid_hal::{InputPin, OutputPin};

/// Input pin for the shared HAL traits
pub struct RpInput<'d> {
    pin: Input<'d>,
}

impl<'d> RpInput<'d> {
    /// Input with the internal pull-up (idle-high, active-low switches)
    pub fn pull_up(pin: Peri<'d, impl Pin>) -> Self {
        Self {
            pin: Input::new(pin, Pull::Up),
        }
    }

    /// Input without internal pull
    pub fn floating(pin: Peri<'d, impl Pin>) -> Self {
        Self {
            pin: Input::new(pin, Pull::None),
        }
    }
}

impl InputPin for RpInput<'_> {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}

/// Output pin for the shared HAL traits
pub struct RpOutput<'d> {
    pin: Output<'d>,
}

impl<'d> RpOutput<'d> {
    pub fn new(pin: Peri<'d, impl Pin>, initial: bool) -> Self {
        let level = if initial { Level::High } else { Level::Low };
        Self {
            pin: Output::new(pin, level),
        }
    }
}

impl OutputPin for RpOutput<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }
}

/// Sample the video-standard strap once; high selects NTSC
pub fn sense_video_standard(pin: Peri<'_, impl Pin>) -> VideoStandard {
    let sense = RpInput::pull_up(pin);
    VideoStandard::from_sense(sense.is_high())
}
