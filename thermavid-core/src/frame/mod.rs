//! Raw sensor frame model
//!
//! A [`RawFrame`] is one complete sensor image: 160x120 16-bit samples plus
//! the telemetry record the sensor sends alongside. Two frames exist for the
//! lifetime of the camera and circulate between the acquisition and render
//! loops through a [`FrameExchange`].

mod exchange;
mod telemetry;

pub use exchange::{FrameConsumer, FrameExchange, FrameProducer, FrameRef, Publish, ReadyFrame};
pub use telemetry::{Extremum, SpotRegion, StatusFlags, Telemetry};

/// Sensor width in pixels
pub const SENSOR_WIDTH: usize = 160;

/// Sensor height in pixels
pub const SENSOR_HEIGHT: usize = 120;

/// Samples per frame
pub const SENSOR_PIXELS: usize = SENSOR_WIDTH * SENSOR_HEIGHT;

/// Which half of the ping-pong pair a buffer is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    Ping,
    Pong,
}

impl Slot {
    /// The opposite slot
    pub fn other(self) -> Self {
        match self {
            Slot::Ping => Slot::Pong,
            Slot::Pong => Slot::Ping,
        }
    }

    /// Array index for per-slot storage
    pub fn index(self) -> usize {
        match self {
            Slot::Ping => 0,
            Slot::Pong => 1,
        }
    }
}

/// One raw sensor frame
#[derive(Clone)]
pub struct RawFrame {
    slot: Slot,
    pixels: [u16; SENSOR_PIXELS],
    /// Telemetry that arrived with the samples
    pub telemetry: Telemetry,
}

impl Default for RawFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl RawFrame {
    /// Create a zeroed frame
    pub const fn new() -> Self {
        Self {
            slot: Slot::Ping,
            pixels: [0; SENSOR_PIXELS],
            telemetry: Telemetry::new(),
        }
    }

    /// The ping-pong slot this buffer occupies
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// All samples, row-major
    pub fn pixels(&self) -> &[u16; SENSOR_PIXELS] {
        &self.pixels
    }

    /// Mutable samples, row-major
    pub fn pixels_mut(&mut self) -> &mut [u16; SENSOR_PIXELS] {
        &mut self.pixels
    }

    /// One sensor row
    pub fn row(&self, y: usize) -> &[u16] {
        &self.pixels[y * SENSOR_WIDTH..(y + 1) * SENSOR_WIDTH]
    }

    /// Sample at (x, y)
    pub fn sample(&self, x: usize, y: usize) -> u16 {
        self.pixels[y * SENSOR_WIDTH + x]
    }

    /// Recompute min/max value and location from the samples
    ///
    /// For sensors that do not report extrema in their telemetry. Ties keep
    /// the first occurrence in row-major order.
    pub fn update_extrema(&mut self) {
        let mut min = Extremum::new(u16::MAX, 0, 0);
        let mut max = Extremum::new(0, 0, 0);

        for (i, &value) in self.pixels.iter().enumerate() {
            let x = (i % SENSOR_WIDTH) as u16;
            let y = (i / SENSOR_WIDTH) as u16;
            if value < min.value {
                min = Extremum::new(value, x, y);
            }
            if value > max.value {
                max = Extremum::new(value, x, y);
            }
        }

        self.telemetry.min = min;
        self.telemetry.max = max;
    }
}
