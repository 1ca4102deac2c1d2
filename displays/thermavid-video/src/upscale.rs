//! Sensor-to-display reconstruction
//!
//! Raw samples are first normalized to 8 bits ([`normalize`]), then scaled
//! 2x by either [`duplicate`] or [`interpolate`]. Both apply the black-hot
//! palette as a final inversion.
//!
//! Interpolation places each source sample's 2x2 output block half a
//! pixel off the source grid and blends neighbors with fixed integer
//! weights:
//!
//! - corners copy their source sample
//! - edges blend two samples 3:1 toward the nearer one (divide by 4)
//! - interior pixels blend four samples 5:1:1:1 toward the nearest (divide by 8)

use thermavid_core::frame::{RawFrame, SENSOR_HEIGHT, SENSOR_PIXELS, SENSOR_WIDTH};

use crate::canvas::{DisplayFrame, DISPLAY_HEIGHT, DISPLAY_WIDTH, SCALE};

/// Edge blend: nearer-sample weight and divisor
const EDGE_NEAR: u16 = 3;
const EDGE_DIV: u16 = 4;

/// Interior blend: nearest-sample weight and divisor
const INNER_NEAR: u16 = 5;
const INNER_DIV: u16 = 8;

/// 8-bit samples at sensor resolution
pub type NormalizedFrame = [u8; SENSOR_PIXELS];

/// Normalize raw samples to 0..=255
///
/// AGC output is already 8-bit and only its low byte is kept. Otherwise
/// each sample is scaled linearly over the frame's telemetry min/max,
/// clipping at both ends; a flat frame uses a span of 1.
pub fn normalize(frame: &RawFrame, agc: bool, out: &mut NormalizedFrame) {
    if agc {
        for (dst, &src) in out.iter_mut().zip(frame.pixels().iter()) {
            *dst = (src & 0xFF) as u8;
        }
        return;
    }

    let min = frame.telemetry.min.value as u32;
    let max = frame.telemetry.max.value as u32;
    let span = max.saturating_sub(min).max(1);

    for (dst, &src) in out.iter_mut().zip(frame.pixels().iter()) {
        *dst = normalize_sample(src as u32, min, span);
    }
}

fn normalize_sample(value: u32, min: u32, span: u32) -> u8 {
    if value < min {
        return 0;
    }
    ((value - min) * 255 / span).min(255) as u8
}

/// Replicate each sample into a 2x2 block
pub fn duplicate(src: &NormalizedFrame, dst: &mut DisplayFrame, black_hot: bool) {
    let mask = polarity_mask(black_hot);
    let out = dst.pixels_mut();

    for (sy, row) in src.chunks_exact(SENSOR_WIDTH).enumerate() {
        for dy in 0..SCALE {
            let line = (sy * SCALE + dy) * DISPLAY_WIDTH;
            for (sx, &value) in row.iter().enumerate() {
                let x = line + sx * SCALE;
                out[x..x + SCALE].fill(value ^ mask);
            }
        }
    }
}

/// Weighted 2x upscale
pub fn interpolate(src: &NormalizedFrame, dst: &mut DisplayFrame, black_hot: bool) {
    let mask = polarity_mask(black_hot);
    let s = |x: usize, y: usize| src[y * SENSOR_WIDTH + x] as u16;
    let last_x = SENSOR_WIDTH - 1;
    let last_y = SENSOR_HEIGHT - 1;
    let out = dst.pixels_mut();
    let mut put = |x: usize, y: usize, value: u16| {
        out[y * DISPLAY_WIDTH + x] = value as u8 ^ mask;
    };

    // Corners
    put(0, 0, s(0, 0));
    put(DISPLAY_WIDTH - 1, 0, s(last_x, 0));
    put(0, DISPLAY_HEIGHT - 1, s(0, last_y));
    put(DISPLAY_WIDTH - 1, DISPLAY_HEIGHT - 1, s(last_x, last_y));

    // Top and bottom rows
    for (sy, oy) in [(0, 0), (last_y, DISPLAY_HEIGHT - 1)] {
        for sx in 0..last_x {
            let (a, b) = (s(sx, sy), s(sx + 1, sy));
            put(2 * sx + 1, oy, edge(a, b));
            put(2 * sx + 2, oy, edge(b, a));
        }
    }

    // Left and right columns
    for (sx, ox) in [(0, 0), (last_x, DISPLAY_WIDTH - 1)] {
        for sy in 0..last_y {
            let (a, c) = (s(sx, sy), s(sx, sy + 1));
            put(ox, 2 * sy + 1, edge(a, c));
            put(ox, 2 * sy + 2, edge(c, a));
        }
    }

    // Interior: each 2x2 output block between four source samples
    for sy in 0..last_y {
        for sx in 0..last_x {
            let a = s(sx, sy);
            let b = s(sx + 1, sy);
            let c = s(sx, sy + 1);
            let d = s(sx + 1, sy + 1);
            let (ox, oy) = (2 * sx + 1, 2 * sy + 1);
            put(ox, oy, inner(a, b, c, d));
            put(ox + 1, oy, inner(b, a, c, d));
            put(ox, oy + 1, inner(c, a, b, d));
            put(ox + 1, oy + 1, inner(d, a, b, c));
        }
    }
}

/// Two-sample blend weighted toward `near`
fn edge(near: u16, far: u16) -> u16 {
    (EDGE_NEAR * near + far) / EDGE_DIV
}

/// Four-sample blend weighted toward `near`
fn inner(near: u16, b: u16, c: u16, d: u16) -> u16 {
    (INNER_NEAR * near + b + c + d) / INNER_DIV
}

fn polarity_mask(black_hot: bool) -> u8 {
    if black_hot {
        0xFF
    } else {
        0x00
    }
}
