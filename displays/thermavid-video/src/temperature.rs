//! Temperature conversion
//!
//! Radiometric telemetry is fixed-point Kelvin at 0.01 K or 0.1 K per
//! count. Everything here works in hundredths of a degree (`_x100`) to
//! stay in integer math.

use core::fmt::Write;

use heapless::String;

/// 0 °C in hundredths of a Kelvin
const ZERO_CELSIUS_X100: i32 = 27_315;

/// Longest formatted reading, e.g. "-460°F"
pub const MAX_READING_LEN: usize = 12;

/// Convert raw telemetry counts to hundredths of a degree Celsius
pub fn kelvin_counts_to_centi_celsius(counts: u16, high_res: bool) -> i32 {
    let kelvin_x100 = if high_res {
        counts as i32
    } else {
        counts as i32 * 10
    };
    kelvin_x100 - ZERO_CELSIUS_X100
}

/// Convert hundredths of a degree Celsius to hundredths of a degree Fahrenheit
pub fn centi_celsius_to_centi_fahrenheit(celsius_x100: i32) -> i32 {
    celsius_x100 * 9 / 5 + 3200
}

/// Round hundredths of a degree to whole degrees (half up)
pub fn display_degrees(value_x100: i32) -> i32 {
    (value_x100 + 50).div_euclid(100)
}

/// Format a spot reading for the overlay, e.g. "27°C"
pub fn format_reading(counts: u16, high_res: bool, metric: bool) -> String<MAX_READING_LEN> {
    let celsius_x100 = kelvin_counts_to_centi_celsius(counts, high_res);
    let (value_x100, unit) = if metric {
        (celsius_x100, 'C')
    } else {
        (centi_celsius_to_centi_fahrenheit(celsius_x100), 'F')
    };

    let mut text = String::new();
    // At most 6 digits, sign, degree sign and unit: always fits
    let _ = write!(text, "{}\u{b0}{}", display_degrees(value_x100), unit);
    text
}
