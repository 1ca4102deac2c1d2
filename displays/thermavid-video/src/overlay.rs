//! Overlays drawn over the reconstructed image
//!
//! All coordinates are display pixels. Every mark is drawn white with a
//! black outline one pixel outside it so it stays visible on either palette.

use embedded_graphics::mono_font::iso_8859_1::{FONT_9X15, FONT_9X15_BOLD};
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::Gray8;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle, Triangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyle, TextStyleBuilder};

use thermavid_core::frame::{Extremum, SpotRegion};

use crate::canvas::{BLACK, DISPLAY_HEIGHT, DISPLAY_WIDTH, SCALE, TEXT_BACKGROUND, TEXT_COLOR, WHITE};

/// Smallest spotmeter box side
pub const SPOT_MIN_SIZE: u32 = 10;

/// Marker triangle height and base width
pub const MARKER_SIZE: i32 = 10;

/// Gap between the spotmeter box and its reading
const SPOT_TEXT_GAP: i32 = 3;

/// Padding around the parameter label background
const LABEL_PADDING: u32 = 3;

/// Spotmeter box in display coordinates
pub fn spot_box(spot: &SpotRegion) -> Rectangle {
    let scale = SCALE as i32;
    let (left, width) = widen(spot.x1 as i32 * scale, (spot.x2 as i32 + 1) * scale - 1);
    let (top, height) = widen(spot.y1 as i32 * scale, (spot.y2 as i32 + 1) * scale - 1);
    Rectangle::new(Point::new(left, top), Size::new(width, height))
}

/// Grow `lo..=hi` around its centre to at least `SPOT_MIN_SIZE`
fn widen(lo: i32, hi: i32) -> (i32, u32) {
    let size = (hi - lo + 1).max(1) as u32;
    if size >= SPOT_MIN_SIZE {
        return (lo, size);
    }
    let center = (lo + hi + 1) / 2;
    (center - SPOT_MIN_SIZE as i32 / 2, SPOT_MIN_SIZE)
}

/// Display position of a sensor pixel's centre
fn sensor_point(x: u16, y: u16) -> Point {
    let scale = SCALE as i32;
    Point::new(x as i32 * scale + scale / 2, y as i32 * scale + scale / 2)
}

fn reading_style() -> MonoTextStyle<'static, Gray8> {
    MonoTextStyleBuilder::new()
        .font(&FONT_9X15_BOLD)
        .text_color(TEXT_COLOR)
        .background_color(TEXT_BACKGROUND)
        .build()
}

fn centered(baseline: Baseline) -> TextStyle {
    TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(baseline)
        .build()
}

/// Draw the spotmeter box and its reading
///
/// The reading goes below the box in the upper half of the frame and
/// above it in the lower half, so it never runs off the edge.
pub fn draw_spotmeter<D>(target: &mut D, spot: &SpotRegion, reading: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Gray8>,
{
    let inner = spot_box(spot);
    let outer = inner.offset(1);

    inner
        .into_styled(PrimitiveStyle::with_stroke(WHITE, 1))
        .draw(target)?;
    outer
        .into_styled(PrimitiveStyle::with_stroke(BLACK, 1))
        .draw(target)?;

    let center = outer.center();
    let (position, baseline) = if center.y < DISPLAY_HEIGHT as i32 / 2 {
        let below = outer.top_left.y + outer.size.height as i32 + SPOT_TEXT_GAP;
        (Point::new(center.x, below), Baseline::Top)
    } else {
        let above = outer.top_left.y - SPOT_TEXT_GAP;
        (Point::new(center.x, above), Baseline::Bottom)
    };

    Text::with_text_style(reading, position, reading_style(), centered(baseline)).draw(target)?;
    Ok(())
}

/// Draw a downward triangle at the coldest pixel and an upward one at the hottest
pub fn draw_extrema_markers<D>(target: &mut D, min: &Extremum, max: &Extremum) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Gray8>,
{
    draw_marker(target, sensor_point(min.x, min.y), -1)?;
    draw_marker(target, sensor_point(max.x, max.y), 1)
}

/// Triangle with its tip on `tip`; `direction` -1 extends the base upward
/// (pointing down), 1 extends it downward (pointing up)
fn draw_marker<D>(target: &mut D, tip: Point, direction: i32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Gray8>,
{
    let half = MARKER_SIZE / 2;
    let base_y = tip.y + direction * MARKER_SIZE;

    Triangle::new(
        tip,
        Point::new(tip.x - half, base_y),
        Point::new(tip.x + half, base_y),
    )
    .into_styled(PrimitiveStyle::with_stroke(WHITE, 1))
    .draw(target)?;

    let outline_base = base_y + direction;
    Triangle::new(
        Point::new(tip.x, tip.y - direction * 2),
        Point::new(tip.x - half - 2, outline_base),
        Point::new(tip.x + half + 2, outline_base),
    )
    .into_styled(PrimitiveStyle::with_stroke(BLACK, 1))
    .draw(target)?;

    Ok(())
}

/// Where the parameter label is drawn (text box plus padding)
pub fn label_bounds(text: &str) -> Rectangle {
    label_text(text).bounding_box().offset(LABEL_PADDING as i32)
}

fn label_text(text: &str) -> Text<'_, MonoTextStyle<'static, Gray8>> {
    let style = MonoTextStyle::new(&FONT_9X15, TEXT_COLOR);
    let anchor = Point::new(DISPLAY_WIDTH as i32 / 2, DISPLAY_HEIGHT as i32 / 3);
    Text::with_text_style(text, anchor, style, centered(Baseline::Middle))
}

/// Draw the menu label centred in the upper third over an opaque patch
pub fn draw_parameter_label<D>(target: &mut D, text: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Gray8>,
{
    target.fill_solid(&label_bounds(text), TEXT_BACKGROUND)?;
    label_text(text).draw(target)?;
    Ok(())
}
