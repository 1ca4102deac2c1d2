//! Status LED output

use thermavid_hal::OutputPin;

/// Status LED colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedColor {
    Off,
    Red,
    /// Red and green together
    Yellow,
    Green,
}

impl LedColor {
    /// (red, green) channel levels
    pub fn channels(self) -> (bool, bool) {
        match self {
            LedColor::Off => (false, false),
            LedColor::Red => (true, false),
            LedColor::Yellow => (true, true),
            LedColor::Green => (false, true),
        }
    }
}

/// Anything that can display a [`LedColor`]
pub trait StatusLed {
    fn show(&mut self, color: LedColor);
}

/// Bi-color LED on two GPIO outputs
pub struct DualColorLed<R: OutputPin, G: OutputPin> {
    red: R,
    green: G,
    /// Channels are lit when driven low
    active_low: bool,
}

impl<R: OutputPin, G: OutputPin> DualColorLed<R, G> {
    /// Create the LED and switch it off
    pub fn new(red: R, green: G, active_low: bool) -> Self {
        let mut led = Self {
            red,
            green,
            active_low,
        };
        led.show(LedColor::Off);
        led
    }

    pub fn release(self) -> (R, G) {
        (self.red, self.green)
    }
}

impl<R: OutputPin, G: OutputPin> StatusLed for DualColorLed<R, G> {
    fn show(&mut self, color: LedColor) {
        let (red, green) = color.channels();
        self.red.set_state(red != self.active_low);
        self.green.set_state(green != self.active_low);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Pin(bool);

    impl OutputPin for Pin {
        fn set_high(&mut self) {
            self.0 = true;
        }

        fn set_low(&mut self) {
            self.0 = false;
        }
    }

    #[test]
    fn test_yellow_lights_both() {
        let mut led = DualColorLed::new(Pin::default(), Pin::default(), false);
        led.show(LedColor::Yellow);
        let (r, g) = led.release();
        assert!(r.0 && g.0);
    }

    #[test]
    fn test_active_low_inverts() {
        let mut led = DualColorLed::new(Pin::default(), Pin::default(), true);
        led.show(LedColor::Green);
        let (r, g) = led.release();
        assert!(r.0, "red off means high");
        assert!(!g.0, "green on means low");
    }
}
