//! Mode button debouncer

/// Debounced button event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonPress {
    /// Released before the long-press countdown ran out
    Short,
    /// Held until the countdown ran out (fires while still held)
    Long,
}

/// Two-sample button debouncer with short/long press detection
///
/// Sampled once per control tick. An edge is accepted only when two
/// consecutive samples agree.
#[derive(Debug, Clone)]
pub struct ButtonDebouncer {
    long_press_ticks: u16,
    prev_sample: bool,
    down: bool,
    countdown: u16,
}

impl ButtonDebouncer {
    pub fn new(long_press_ticks: u16) -> Self {
        Self {
            long_press_ticks,
            prev_sample: false,
            down: false,
            countdown: 0,
        }
    }

    /// Button currently considered held
    pub fn is_down(&self) -> bool {
        self.down
    }

    /// Feed one sample (`true` = pressed)
    pub fn sample(&mut self, pressed: bool) -> Option<ButtonPress> {
        let mut released = false;

        if pressed && self.prev_sample && !self.down {
            self.down = true;
            self.countdown = self.long_press_ticks;
        } else if !pressed && !self.prev_sample && self.down {
            self.down = false;
            released = true;
        }
        self.prev_sample = pressed;

        if self.down && self.countdown != 0 {
            self.countdown -= 1;
            if self.countdown == 0 {
                return Some(ButtonPress::Long);
            }
        }

        if released && self.countdown != 0 {
            self.countdown = 0;
            return Some(ButtonPress::Short);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(d: &mut ButtonDebouncer, pressed: bool, ticks: usize) -> (usize, usize) {
        let mut short = 0;
        let mut long = 0;
        for _ in 0..ticks {
            match d.sample(pressed) {
                Some(ButtonPress::Short) => short += 1,
                Some(ButtonPress::Long) => long += 1,
                None => {}
            }
        }
        (short, long)
    }

    #[test]
    fn test_single_sample_glitch_ignored() {
        let mut d = ButtonDebouncer::new(60);
        assert_eq!(d.sample(true), None);
        assert_eq!(d.sample(false), None);
        assert_eq!(feed(&mut d, false, 10), (0, 0));
        assert!(!d.is_down());
    }

    #[test]
    fn test_short_press() {
        let mut d = ButtonDebouncer::new(60);
        assert_eq!(feed(&mut d, true, 5), (0, 0));
        assert!(d.is_down());
        assert_eq!(d.sample(false), None);
        assert_eq!(d.sample(false), Some(ButtonPress::Short));
        assert_eq!(feed(&mut d, false, 10), (0, 0));
    }

    #[test]
    fn test_long_press_fires_while_held() {
        let mut d = ButtonDebouncer::new(60);
        // Press recognized on the second sample, countdown runs from there
        assert_eq!(feed(&mut d, true, 60), (0, 0));
        assert_eq!(d.sample(true), Some(ButtonPress::Long));
        assert!(d.is_down());
    }

    #[test]
    fn test_long_press_held_then_released() {
        let mut d = ButtonDebouncer::new(60);
        assert_eq!(feed(&mut d, true, 200), (0, 1));
        assert_eq!(feed(&mut d, false, 5), (0, 0));
    }

    #[test]
    fn test_repeated_short_presses() {
        let mut d = ButtonDebouncer::new(60);
        for _ in 0..3 {
            assert_eq!(feed(&mut d, true, 4), (0, 0));
            assert_eq!(feed(&mut d, false, 4), (1, 0));
        }
    }
}
