//! Display frame buffer

use core::convert::Infallible;

use embedded_graphics::pixelcolor::{Gray8, GrayColor};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use thermavid_core::frame::{SENSOR_HEIGHT, SENSOR_WIDTH};

/// Upscale factor in both axes
pub const SCALE: usize = 2;

/// Output width in pixels
pub const DISPLAY_WIDTH: usize = SENSOR_WIDTH * SCALE;

/// Output height in pixels
pub const DISPLAY_HEIGHT: usize = SENSOR_HEIGHT * SCALE;

/// Bytes per display frame
pub const DISPLAY_PIXELS: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT;

/// Foreground gray for overlay text
pub const TEXT_COLOR: Gray8 = Gray8::new(250);

/// Background gray behind overlay text
pub const TEXT_BACKGROUND: Gray8 = Gray8::new(120);

pub const WHITE: Gray8 = Gray8::new(255);
pub const BLACK: Gray8 = Gray8::new(0);

/// One 8-bit grayscale output frame
#[derive(Clone)]
pub struct DisplayFrame {
    pixels: [u8; DISPLAY_PIXELS],
}

impl Default for DisplayFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayFrame {
    pub const fn new() -> Self {
        Self {
            pixels: [0; DISPLAY_PIXELS],
        }
    }

    /// Row-major bytes, ready for the video generator
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8; DISPLAY_PIXELS] {
        &mut self.pixels
    }

    /// Pixel at (x, y)
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * DISPLAY_WIDTH + x]
    }

    /// Set a pixel; out-of-bounds writes are ignored
    pub fn set(&mut self, x: i32, y: i32, value: u8) {
        if (0..DISPLAY_WIDTH as i32).contains(&x) && (0..DISPLAY_HEIGHT as i32).contains(&y) {
            self.pixels[y as usize * DISPLAY_WIDTH + x as usize] = value;
        }
    }

    /// Copy into a scan-out buffer, truncating to the shorter length
    pub fn copy_to(&self, dst: &mut [u8]) {
        let len = dst.len().min(self.pixels.len());
        dst[..len].copy_from_slice(&self.pixels[..len]);
    }
}

impl OriginDimensions for DisplayFrame {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH as u32, DISPLAY_HEIGHT as u32)
    }
}

impl DrawTarget for DisplayFrame {
    type Color = Gray8;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set(point.x, point.y, color.luma());
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };

        let luma = color.luma();
        for y in area.top_left.y..=bottom_right.y {
            let row = y as usize * DISPLAY_WIDTH;
            let start = row + area.top_left.x as usize;
            let end = row + bottom_right.x as usize + 1;
            self.pixels[start..end].fill(luma);
        }
        Ok(())
    }
}
